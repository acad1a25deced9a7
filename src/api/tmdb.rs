//! TMDB (The Movie Database) API client
//!
//! Provides discovery, search, details and video lists for movies.
//! API docs: https://developer.themoviedb.org/docs

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{AuthMode, Session};
use crate::models::{MovieDetail, MovieSummary, Video};

/// Path for the default popularity-sorted listing
pub const POPULAR_PATH: &str = "/discover/movie?sort_by=popularity.desc";

/// TMDB API error types
#[derive(Error, Debug)]
pub enum TmdbError {
    #[error("401 {}", auth_missing_message(.0))]
    AuthMissing(AuthMode),

    #[error("{status} {message}")]
    Http { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

fn auth_missing_message(mode: &AuthMode) -> &'static str {
    match mode {
        AuthMode::Bearer => "Missing TMDb V4 token. Please set a valid token.",
        AuthMode::ApiKey => "Missing TMDb API key. Please set a valid key.",
    }
}

impl TmdbError {
    /// HTTP-like status for classification (401 for missing credentials)
    pub fn status(&self) -> Option<u16> {
        match self {
            TmdbError::AuthMissing(_) => Some(401),
            TmdbError::Http { status, .. } => Some(*status),
            TmdbError::Network(e) => e.status().map(|s| s.as_u16()),
            TmdbError::InvalidResponse(_) => None,
        }
    }

    /// True when the user should be asked for credentials
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Human-readable message without the status prefix
    pub fn message(&self) -> String {
        match self {
            TmdbError::AuthMissing(mode) => auth_missing_message(mode).to_string(),
            TmdbError::Http { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// TMDB API client
pub struct TmdbClient {
    session: Session,
    client: reqwest::Client,
    max_retries: u32,
}

impl TmdbClient {
    /// Create a new TMDB client for the given session
    pub fn new(session: Session) -> Self {
        Self {
            session,
            client: reqwest::Client::new(),
            max_retries: 3,
        }
    }

    /// Create a client with a custom base URL (for testing)
    pub fn with_base_url(session: Session, base_url: impl Into<String>) -> Self {
        let mut session = session;
        session.base_url = base_url.into();
        Self::new(session)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Auth mode used when the caller doesn't pick one
    pub fn default_mode(&self) -> AuthMode {
        self.session.credentials.default_mode()
    }

    /// Build the request URL for `path` under the given auth mode
    pub fn build_url(&self, path: &str, mode: AuthMode) -> String {
        build_url(
            &self.session.base_url,
            path,
            mode,
            self.session.credentials.api_key().unwrap_or_default(),
        )
    }

    /// GET `path` and decode the JSON body.
    ///
    /// Fails with `AuthMissing` before touching the network when the
    /// selected mode has no credential.
    pub async fn fetch<T: DeserializeOwned>(&self, path: &str, mode: AuthMode) -> Result<T, TmdbError> {
        let credential = self
            .session
            .credentials
            .for_mode(mode)
            .ok_or(TmdbError::AuthMissing(mode))?;

        let url = self.build_url(path, mode);
        let mut retries = 0;

        loop {
            debug!(path, %mode, "tmdb request");
            let mut request = self.client.get(&url).header("Accept", "application/json");
            if mode == AuthMode::Bearer {
                request = request
                    .header("Authorization", format!("Bearer {}", credential))
                    .header("Content-Type", "application/json;charset=utf-8");
            }

            let response = request.send().await?;
            let status = response.status();

            if status.is_success() {
                let body = response.text().await?;
                return serde_json::from_str(&body)
                    .map_err(|e| TmdbError::InvalidResponse(format!("JSON parse error: {}", e)));
            }

            if status == StatusCode::TOO_MANY_REQUESTS && retries + 1 < self.max_retries {
                retries += 1;

                // Get Retry-After header or default to exponential backoff
                let wait_secs = response
                    .headers()
                    .get("Retry-After")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(2u64.pow(retries));

                warn!(path, wait_secs, "rate limited by TMDB, retrying");
                tokio::time::sleep(Duration::from_secs(wait_secs)).await;
                continue;
            }

            let body = response.text().await.unwrap_or_default();
            let message = error_message(status, &body);
            warn!(path, status = status.as_u16(), %message, "tmdb request failed");
            return Err(TmdbError::Http {
                status: status.as_u16(),
                message,
            });
        }
    }

    /// Popularity-sorted discovery listing
    pub async fn discover_popular(&self) -> Result<Vec<MovieSummary>, TmdbError> {
        let page: Page<MovieSummary> = self.fetch(POPULAR_PATH, self.default_mode()).await?;
        Ok(page.results)
    }

    /// Search movies by title
    pub async fn search_movies(&self, term: &str) -> Result<Vec<MovieSummary>, TmdbError> {
        let path = format!("/search/movie?query={}", urlencoding::encode(term));
        let page: Page<MovieSummary> = self.fetch(&path, self.default_mode()).await?;
        Ok(page.results)
    }

    /// Get movie details by ID
    pub async fn movie_detail(&self, id: u64) -> Result<MovieDetail, TmdbError> {
        self.fetch(&format!("/movie/{}", id), self.default_mode())
            .await
    }

    /// Get the video list for a movie
    pub async fn movie_videos(&self, id: u64) -> Result<Vec<Video>, TmdbError> {
        let page: Page<Video> = self
            .fetch(&format!("/movie/{}/videos", id), self.default_mode())
            .await?;
        Ok(page.results)
    }

    /// Details and videos fetched concurrently; the first failure wins
    pub async fn preview(&self, id: u64) -> Result<(MovieDetail, Vec<Video>), TmdbError> {
        tokio::try_join!(self.movie_detail(id), self.movie_videos(id))
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Join base and path, appending `api_key` for query-key auth.
///
/// Absolute `http` paths are used verbatim. The key is not appended
/// twice when the path already carries one.
pub fn build_url(base_url: &str, path: &str, mode: AuthMode, api_key: &str) -> String {
    if path.starts_with("http") {
        return path.to_string();
    }

    let mut url = format!("{}{}", base_url, path);
    if mode == AuthMode::ApiKey && !path.contains("api_key=") {
        url.push(if path.contains('?') { '&' } else { '?' });
        url.push_str("api_key=");
        url.push_str(api_key);
    }
    url
}

/// Error message from a failed response: body `status_message`,
/// else the status reason, else "Unknown error"
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.status_message)
        .filter(|m| !m.is_empty())
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| "Unknown error".to_string())
}

// =============================================================================
// Response Structures (internal deserialization)
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct Page<T> {
    #[serde(default)]
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    status_message: Option<String>,
}
