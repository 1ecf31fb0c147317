use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};

use crate::reviews::ReviewError;

/// Confirms that a movie id is known to the Movie service
#[async_trait]
pub trait MovieExistenceChecker: Send + Sync {
    async fn exists(&self, movie_id: i64) -> Result<bool, ReviewError>;
}

/// Looks movies up over HTTP at `{base_url}/api/movie/{id}`
#[derive(Clone)]
pub struct HttpMovieChecker {
    client: Client,
    base_url: String,
}

impl HttpMovieChecker {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn movie_url(&self, movie_id: i64) -> String {
        format!("{}/api/movie/{}", self.base_url, movie_id)
    }
}

#[async_trait]
impl MovieExistenceChecker for HttpMovieChecker {
    async fn exists(&self, movie_id: i64) -> Result<bool, ReviewError> {
        let url = self.movie_url(movie_id);
        tracing::debug!("Looking up movie at {}", url);

        let response = self
            .client
            .get(&url)
            .header(header::CONTENT_TYPE, "application/json;charset=UTF-8")
            .send()
            .await
            .map_err(|e| ReviewError::MovieService(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::debug!("Movie service answered {} for movie {}", status, movie_id);
        }

        Ok(status == StatusCode::OK)
    }
}
