// HTTP handlers for review endpoints

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Json,
};

use crate::reviews::{
    CountReviewsRequest, CreateReviewRequest, CreatedReviewResponse, ReviewCounts, ReviewError,
    ReviewListQuery, ReviewListResponse,
};
use crate::reviews::service::WRONG_QUERY;
use crate::AppState;

/// Create a new review
/// POST /reviews
#[utoipa::path(
    post,
    path = "/reviews",
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review created", body = CreatedReviewResponse),
        (status = 500, description = "Validation, lookup, duplicate or internal failure", body = ErrorResponse)
    ),
    tag = "reviews"
)]
pub async fn create_review_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateReviewRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedReviewResponse>), ReviewError> {
    // A body that is absent or not a JSON object carries none of the fields
    let request = match payload {
        Ok(Json(request)) => request,
        Err(JsonRejection::MissingJsonContentType(_)) | Err(JsonRejection::JsonDataError(_)) => {
            CreateReviewRequest::default()
        }
        Err(e) => return Err(ReviewError::Validation(e.body_text())),
    };

    let id = state.review_service.create_review(request).await?;

    Ok((StatusCode::CREATED, Json(CreatedReviewResponse { id })))
}

/// List reviews of a movie, newest first
/// GET /reviews?movie=&size=&from=
#[utoipa::path(
    get,
    path = "/reviews",
    params(ReviewListQuery),
    responses(
        (status = 200, description = "Page of reviews", body = ReviewListResponse),
        (status = 500, description = "Missing or invalid query parameters", body = ErrorResponse)
    ),
    tag = "reviews"
)]
pub async fn list_movie_reviews_handler(
    State(state): State<AppState>,
    query: Result<Query<ReviewListQuery>, QueryRejection>,
) -> Result<Json<ReviewListResponse>, ReviewError> {
    let Query(query) = query.map_err(|e| {
        tracing::debug!("Unreadable query string: {}", e.body_text());
        ReviewError::Validation(WRONG_QUERY.to_string())
    })?;
    let reviews = state.review_service.list_movie_reviews(&query).await?;

    Ok(Json(ReviewListResponse { reviews }))
}

/// Count reviews for a batch of movies
/// POST /reviews/_count
#[utoipa::path(
    post,
    path = "/reviews/_count",
    request_body = CountReviewsRequest,
    responses(
        (status = 200, description = "Review count keyed by movie id", body = HashMap<String, i64>, example = json!({"1": 5, "2": 2})),
        (status = 400, description = "movieIds is not a non-empty array", body = ErrorResponse),
        (status = 500, description = "Internal failure", body = ErrorResponse)
    ),
    tag = "reviews"
)]
pub async fn count_reviews_handler(
    State(state): State<AppState>,
    payload: Result<Json<CountReviewsRequest>, JsonRejection>,
) -> Result<Json<ReviewCounts>, ReviewError> {
    // An unreadable body carries no movieIds at all
    let request = payload.map(|Json(request)| request).unwrap_or_default();

    let counts = state
        .review_service
        .count_reviews(request.movie_ids.as_ref())
        .await?;

    Ok(Json(counts))
}
