use async_trait::async_trait;
use sqlx::PgPool;

use crate::reviews::{NewReview, Review, ReviewError};

/// Storage operations the review service depends on
#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Persist a new review; the store assigns id and timestamps
    async fn insert(&self, review: &NewReview) -> Result<Review, ReviewError>;

    /// Find a review with exactly this title, text and movie id
    async fn find_duplicate(&self, review: &NewReview) -> Result<Option<Review>, ReviewError>;

    /// Reviews of one movie, newest first, skipping `skip` and capped at `limit`
    async fn find_by_movie(
        &self,
        movie_id: i64,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Review>, ReviewError>;

    /// `(movie_id, count)` for each of `movie_ids` that has at least one review
    async fn count_by_movies(&self, movie_ids: &[i64]) -> Result<Vec<(i64, i64)>, ReviewError>;
}

/// PostgreSQL-backed review store
#[derive(Clone)]
pub struct PgReviewRepository {
    pool: PgPool,
}

impl PgReviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewStore for PgReviewRepository {
    async fn insert(&self, review: &NewReview) -> Result<Review, ReviewError> {
        // A unique index violation surfaces as DuplicateReview
        let review = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (title, text, movie_id)
            VALUES ($1, $2, $3)
            RETURNING id, title, text, movie_id, created_at, updated_at
            "#,
        )
        .bind(&review.title)
        .bind(&review.text)
        .bind(review.movie_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(review)
    }

    async fn find_duplicate(&self, review: &NewReview) -> Result<Option<Review>, ReviewError> {
        let existing = sqlx::query_as::<_, Review>(
            r#"
            SELECT id, title, text, movie_id, created_at, updated_at
            FROM reviews
            WHERE title = $1 AND text = $2 AND movie_id = $3
            LIMIT 1
            "#,
        )
        .bind(&review.title)
        .bind(&review.text)
        .bind(review.movie_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(existing)
    }

    async fn find_by_movie(
        &self,
        movie_id: i64,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Review>, ReviewError> {
        let reviews = sqlx::query_as::<_, Review>(
            r#"
            SELECT id, title, text, movie_id, created_at, updated_at
            FROM reviews
            WHERE movie_id = $1
            ORDER BY created_at DESC
            OFFSET $2
            LIMIT $3
            "#,
        )
        .bind(movie_id)
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    async fn count_by_movies(&self, movie_ids: &[i64]) -> Result<Vec<(i64, i64)>, ReviewError> {
        let counts: Vec<(i64, i64)> = sqlx::query_as(
            r#"
            SELECT movie_id, COUNT(*)
            FROM reviews
            WHERE movie_id = ANY($1)
            GROUP BY movie_id
            "#,
        )
        .bind(movie_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }
}
