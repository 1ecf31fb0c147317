// In-process stand-ins for the review store and the Movie service

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::reviews::{MovieExistenceChecker, NewReview, Review, ReviewError, ReviewStore};

/// Vec-backed store that enforces the same uniqueness as the database index
#[derive(Default)]
pub struct InMemoryReviewStore {
    reviews: Mutex<Vec<Review>>,
    /// When set, `find_duplicate` never reports a match
    skip_duplicate_check: bool,
}

impl InMemoryReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose pre-insert duplicate lookup always misses,
    /// as when two identical requests race
    pub fn racing() -> Self {
        Self {
            skip_duplicate_check: true,
            ..Self::default()
        }
    }

    /// Insert a review with an explicit creation time
    pub fn seed(&self, title: &str, text: &str, movie_id: i64, created_at: DateTime<Utc>) -> Uuid {
        let review = Review {
            id: Uuid::new_v4(),
            title: title.to_string(),
            text: text.to_string(),
            movie_id,
            created_at,
            updated_at: created_at,
        };
        let id = review.id;
        self.reviews.lock().unwrap().push(review);
        id
    }

    /// Seed `count` reviews for a movie, one minute apart
    pub fn seed_many(&self, movie_id: i64, count: usize) {
        let start = Utc::now() - Duration::days(1);
        for i in 0..count {
            self.seed(
                &format!("Review {}-{}", movie_id, i),
                &format!("Text {}", i),
                movie_id,
                start + Duration::minutes(i as i64),
            );
        }
    }

    pub fn len(&self) -> usize {
        self.reviews.lock().unwrap().len()
    }
}

fn same_triple(review: &Review, candidate: &NewReview) -> bool {
    review.title == candidate.title
        && review.text == candidate.text
        && review.movie_id == candidate.movie_id
}

#[async_trait]
impl ReviewStore for InMemoryReviewStore {
    async fn insert(&self, review: &NewReview) -> Result<Review, ReviewError> {
        let mut reviews = self.reviews.lock().unwrap();
        if reviews.iter().any(|r| same_triple(r, review)) {
            return Err(ReviewError::DuplicateReview);
        }

        // Keep creation times strictly increasing so ordering is deterministic
        let now = Utc::now();
        let created_at = match reviews.iter().map(|r| r.created_at).max() {
            Some(latest) if latest >= now => latest + Duration::milliseconds(1),
            _ => now,
        };

        let stored = Review {
            id: Uuid::new_v4(),
            title: review.title.clone(),
            text: review.text.clone(),
            movie_id: review.movie_id,
            created_at,
            updated_at: created_at,
        };
        reviews.push(stored.clone());
        Ok(stored)
    }

    async fn find_duplicate(&self, review: &NewReview) -> Result<Option<Review>, ReviewError> {
        if self.skip_duplicate_check {
            return Ok(None);
        }
        let reviews = self.reviews.lock().unwrap();
        Ok(reviews.iter().find(|r| same_triple(r, review)).cloned())
    }

    async fn find_by_movie(
        &self,
        movie_id: i64,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Review>, ReviewError> {
        let mut matching: Vec<Review> = self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.movie_id == movie_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(matching
            .into_iter()
            .skip(skip as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count_by_movies(&self, movie_ids: &[i64]) -> Result<Vec<(i64, i64)>, ReviewError> {
        let wanted: HashSet<i64> = movie_ids.iter().copied().collect();
        let mut counts: Vec<(i64, i64)> = Vec::new();
        for review in self.reviews.lock().unwrap().iter() {
            if !wanted.contains(&review.movie_id) {
                continue;
            }
            match counts.iter_mut().find(|(id, _)| *id == review.movie_id) {
                Some((_, count)) => *count += 1,
                None => counts.push((review.movie_id, 1)),
            }
        }
        Ok(counts)
    }
}

/// Store whose every operation fails as if the database were unreachable
pub struct UnavailableStore;

#[async_trait]
impl ReviewStore for UnavailableStore {
    async fn insert(&self, _review: &NewReview) -> Result<Review, ReviewError> {
        Err(ReviewError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn find_duplicate(&self, _review: &NewReview) -> Result<Option<Review>, ReviewError> {
        Err(ReviewError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn find_by_movie(
        &self,
        _movie_id: i64,
        _skip: i64,
        _limit: i64,
    ) -> Result<Vec<Review>, ReviewError> {
        Err(ReviewError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn count_by_movies(&self, _movie_ids: &[i64]) -> Result<Vec<(i64, i64)>, ReviewError> {
        Err(ReviewError::Database(sqlx::Error::PoolTimedOut))
    }
}

/// Movie service stand-in answering from a fixed id set and recording lookups
#[derive(Default)]
pub struct StubMovieChecker {
    known: HashSet<i64>,
    lookups: Mutex<Vec<i64>>,
}

impl StubMovieChecker {
    pub fn with_movies(ids: &[i64]) -> Self {
        Self {
            known: ids.iter().copied().collect(),
            lookups: Mutex::new(Vec::new()),
        }
    }

    pub fn lookups(&self) -> Vec<i64> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl MovieExistenceChecker for StubMovieChecker {
    async fn exists(&self, movie_id: i64) -> Result<bool, ReviewError> {
        self.lookups.lock().unwrap().push(movie_id);
        Ok(self.known.contains(&movie_id))
    }
}
