use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use crate::reviews::{
    CreateReviewRequest, MovieExistenceChecker, NewReview, ReviewCounts, ReviewError, ReviewInfo,
    ReviewListQuery, ReviewPage, ReviewStore,
};
use crate::validation::{coerce_query_integer, first_message, is_blank, json_integer};

const REQUIRED_FIELDS: &str = "Title, text and movieId are required";
pub(crate) const WRONG_QUERY: &str = "Missing or wrong params in query";
const MOVIE_IDS_NOT_ARRAY: &str = "MovieIds must be an array";
const MOVIE_IDS_NOT_INTEGERS: &str = "MovieIds must be an array of integers";

/// Service layer for review business logic
#[derive(Clone)]
pub struct ReviewService {
    store: Arc<dyn ReviewStore>,
    movies: Arc<dyn MovieExistenceChecker>,
}

impl ReviewService {
    pub fn new(store: Arc<dyn ReviewStore>, movies: Arc<dyn MovieExistenceChecker>) -> Self {
        Self { store, movies }
    }

    /// Create a new review and return its id
    ///
    /// This method:
    /// 1. Checks presence and types of title, text and movieId
    /// 2. Confirms the movie with the Movie service
    /// 3. Rejects an identical (title, text, movieId) review
    /// 4. Persists the review
    pub async fn create_review(&self, request: CreateReviewRequest) -> Result<Uuid, ReviewError> {
        let review = parse_new_review(&request)?;

        if !self.movies.exists(review.movie_id).await? {
            return Err(ReviewError::MovieNotFound(review.movie_id));
        }

        if let Some(existing) = self.store.find_duplicate(&review).await? {
            tracing::error!(
                "Review with title: {}, text: {} and movieId: {} already exists. Review: {}",
                review.title,
                review.text,
                review.movie_id,
                existing.id
            );
            return Err(ReviewError::DuplicateReview);
        }

        let created = self.store.insert(&review).await?;
        tracing::info!(
            "Created review {} for movie {}",
            created.id,
            created.movie_id
        );

        Ok(created.id)
    }

    /// Page through the reviews of one movie, newest first
    pub async fn list_movie_reviews(
        &self,
        query: &ReviewListQuery,
    ) -> Result<Vec<ReviewInfo>, ReviewError> {
        let page = parse_review_page(query)?;

        let reviews = self
            .store
            .find_by_movie(page.movie, page.skip(), page.size)
            .await?;

        tracing::debug!(
            "Found {} reviews for movie {} (size {}, from {})",
            reviews.len(),
            page.movie,
            page.size,
            page.from
        );

        Ok(reviews.into_iter().map(ReviewInfo::from).collect())
    }

    /// Count reviews for every requested movie id, zero when none exist
    pub async fn count_reviews(&self, movie_ids: Option<&Value>) -> Result<ReviewCounts, ReviewError> {
        let movie_ids = parse_movie_ids(movie_ids)?;
        tracing::info!("Counting reviews for movieIds: {:?}", movie_ids);

        let grouped = self.store.count_by_movies(&movie_ids).await?;
        Ok(merge_counts(&movie_ids, grouped))
    }
}

/// Checks a create request in the order callers rely on for messages
fn parse_new_review(request: &CreateReviewRequest) -> Result<NewReview, ReviewError> {
    let title = request.title.as_ref();
    let text = request.text.as_ref();
    let movie_id = request.movie_id.as_ref();

    if is_blank(title) || is_blank(text) || is_blank(movie_id) {
        return Err(ReviewError::Validation(REQUIRED_FIELDS.to_string()));
    }

    let title = match title {
        Some(Value::String(s)) => s.clone(),
        _ => {
            return Err(ReviewError::Validation(
                "Title should be in string format".to_string(),
            ))
        }
    };
    let text = match text {
        Some(Value::String(s)) => s.clone(),
        _ => {
            return Err(ReviewError::Validation(
                "Text should be in string format".to_string(),
            ))
        }
    };
    let movie_id = match movie_id {
        Some(value @ Value::Number(_)) => json_integer(value).ok_or_else(|| {
            ReviewError::Validation("MovieID should be a positive integer".to_string())
        })?,
        _ => {
            return Err(ReviewError::Validation(
                "MovieID should be a number".to_string(),
            ))
        }
    };

    let review = NewReview {
        title,
        text,
        movie_id,
    };
    review.validate().map_err(|errors| {
        ReviewError::Validation(
            first_message(&errors, &["title", "text", "movie_id"])
                .unwrap_or_else(|| errors.to_string()),
        )
    })?;

    Ok(review)
}

/// Coerces and range-checks the list query parameters
fn parse_review_page(query: &ReviewListQuery) -> Result<ReviewPage, ReviewError> {
    let movie = coerce_query_integer(query.movie.as_deref());
    let size = coerce_query_integer(query.size.as_deref());
    let from = coerce_query_integer(query.from.as_deref());

    let (Some(movie), Some(size), Some(from)) = (movie, size, from) else {
        return Err(ReviewError::Validation(WRONG_QUERY.to_string()));
    };

    let page = ReviewPage { movie, size, from };
    page.validate().map_err(|errors| {
        ReviewError::Validation(
            first_message(&errors, &["movie", "size", "from"]).unwrap_or_else(|| errors.to_string()),
        )
    })?;

    Ok(page)
}

/// Extracts a non-empty list of integer movie ids
fn parse_movie_ids(value: Option<&Value>) -> Result<Vec<i64>, ReviewError> {
    let items = match value {
        Some(Value::Array(items)) if !items.is_empty() => items,
        _ => return Err(ReviewError::InvalidInput(MOVIE_IDS_NOT_ARRAY.to_string())),
    };

    items
        .iter()
        .map(|item| {
            json_integer(item)
                .ok_or_else(|| ReviewError::InvalidInput(MOVIE_IDS_NOT_INTEGERS.to_string()))
        })
        .collect()
}

/// One entry per requested id; grouped counts override the zero default
pub fn merge_counts(movie_ids: &[i64], grouped: Vec<(i64, i64)>) -> ReviewCounts {
    let mut counts: ReviewCounts = movie_ids.iter().map(|id| (*id, 0)).collect();
    for (movie_id, count) in grouped {
        if let Some(slot) = counts.get_mut(&movie_id) {
            *slot = count;
        }
    }
    counts
}
