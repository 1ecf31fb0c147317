use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use std::collections::BTreeMap;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Domain model representing a stored review
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    pub movie_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for POST /reviews
///
/// Fields stay untyped so that missing and wrong-typed values can be
/// reported with their own messages instead of a generic JSON rejection.
/// Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateReviewRequest {
    #[schema(value_type = String, example = "New Review")]
    pub title: Option<Value>,
    #[schema(value_type = String, example = "Some text")]
    pub text: Option<Value>,
    #[serde(rename = "movieId")]
    #[schema(value_type = i64, example = 1)]
    pub movie_id: Option<Value>,
}

/// A review that passed field validation and is ready to persist
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct NewReview {
    #[validate(length(min = 1, message = "Title, text and movieId are required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Title, text and movieId are required"))]
    pub text: String,
    #[validate(range(min = 1, message = "MovieID should be a positive integer"))]
    pub movie_id: i64,
}

/// Response body for a successful POST /reviews
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatedReviewResponse {
    pub id: Uuid,
}

/// Raw query string of GET /reviews, coerced to numbers by the service
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReviewListQuery {
    /// Movie identifier
    pub movie: Option<String>,
    /// Maximum number of reviews to return
    pub size: Option<String>,
    /// 1-based position of the first review to return
    pub from: Option<String>,
}

/// Numeric pagination parameters after coercion
#[derive(Debug, Clone, Copy, PartialEq, Validate)]
pub struct ReviewPage {
    #[validate(range(min = 1, message = "Wrong movieID"))]
    pub movie: i64,
    #[validate(range(min = 1, message = "Size should be a number and not less than 1"))]
    pub size: i64,
    #[validate(range(min = 1, message = "From should be number and not less than 1"))]
    pub from: i64,
}

impl ReviewPage {
    /// Number of matching reviews skipped before the page starts
    pub fn skip(&self) -> i64 {
        self.from - 1
    }
}

/// Review as exposed by GET /reviews (no `updatedAt`)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewInfo {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    pub movie_id: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Review> for ReviewInfo {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            title: review.title,
            text: review.text,
            movie_id: review.movie_id,
            created_at: review.created_at,
        }
    }
}

/// Response body for GET /reviews
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReviewListResponse {
    pub reviews: Vec<ReviewInfo>,
}

/// Request body for POST /reviews/_count
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CountReviewsRequest {
    #[serde(rename = "movieIds")]
    #[schema(value_type = Vec<i64>, example = json!([1, 2]))]
    pub movie_ids: Option<Value>,
}

/// Review count per requested movie id, serialized as a flat JSON object
pub type ReviewCounts = BTreeMap<i64, i64>;
