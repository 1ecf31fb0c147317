use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Errors produced by the review endpoints
#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    /// Missing, empty or wrong-typed field, or bad pagination parameter
    #[error("{0}")]
    Validation(String),

    /// The Movie service did not confirm the movie
    #[error("Movie with id {0} not found")]
    MovieNotFound(i64),

    /// A review with the same title, text and movie already exists
    #[error("Review already exists")]
    DuplicateReview,

    /// Malformed batch-count request
    #[error("{0}")]
    InvalidInput(String),

    /// The Movie service could not be reached
    #[error("Movie service request failed: {0}")]
    MovieService(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for ReviewError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                ReviewError::DuplicateReview
            }
            _ => ReviewError::Database(err),
        }
    }
}

impl ReviewError {
    /// HTTP status reported to the caller
    ///
    /// Only a malformed batch-count body is a 400; every other failure,
    /// client-caused or not, is reported as 500.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ReviewError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error kind
    pub fn code(&self) -> &'static str {
        match self {
            ReviewError::Validation(_) => "VALIDATION_ERROR",
            ReviewError::MovieNotFound(_) => "MOVIE_NOT_FOUND",
            ReviewError::DuplicateReview => "DUPLICATE_REVIEW",
            ReviewError::InvalidInput(_) => "BAD_REQUEST",
            ReviewError::MovieService(_) => "MOVIE_SERVICE_ERROR",
            ReviewError::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Message safe to return to the client
    pub fn client_message(&self) -> String {
        match self {
            ReviewError::Database(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        }
    }
}

/// Error body returned by every review endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "VALIDATION_ERROR")]
    pub error: String,
    #[schema(example = "Title, text and movieId are required")]
    pub message: String,
}

impl IntoResponse for ReviewError {
    fn into_response(self) -> Response {
        match &self {
            ReviewError::Database(_) | ReviewError::MovieService(_) => {
                tracing::error!("Request failed: {:?}", self);
            }
            _ => tracing::warn!("Request rejected: {}", self),
        }

        let body = ErrorResponse {
            error: self.code().to_string(),
            message: self.client_message(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}
