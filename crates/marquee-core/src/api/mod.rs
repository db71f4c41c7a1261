//! Movie database access.
//!
//! [`MovieSearch`] is the seam between the search pipeline and the remote
//! movie database; [`OmdbClient`] is the production implementation.

mod omdb;

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;

use crate::models::{MovieDetails, MovieId, MovieSummary};

pub use omdb::{parse_details_response, parse_search_response, OmdbClient};

/// Message used when the API rejects a search without saying why.
pub const DEFAULT_NO_RESULTS_MESSAGE: &str = "No results found";
/// Message used when the API rejects a lookup without saying why.
pub const DEFAULT_NOT_FOUND_MESSAGE: &str = "Movie not found";

#[derive(Debug, Error)]
pub enum ApiError {
    /// The API answered a search with an empty/false response.
    #[error("{0}")]
    NoResults(String),
    /// The API does not know the requested identifier.
    #[error("{0}")]
    NotFound(String),
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Movie API returned HTTP {status}: {message}")]
    Http { status: u16, message: String },
    #[error("Failed to parse movie API response: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid movie API configuration: {0}")]
    InvalidConfiguration(String),
}

impl ApiError {
    /// Whether the failure happened on the way to or from the API, as
    /// opposed to the API answering negatively.
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Http { .. })
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Search and lookup against a movie database.
pub trait MovieSearch: Send + Sync + 'static {
    /// Titles matching `query`, in the order the API returns them.
    fn search(&self, query: &str) -> impl Future<Output = ApiResult<Vec<MovieSummary>>> + Send;

    /// Full record for one title.
    fn details(&self, id: &MovieId) -> impl Future<Output = ApiResult<MovieDetails>> + Send;
}

impl<S: MovieSearch> MovieSearch for Arc<S> {
    fn search(&self, query: &str) -> impl Future<Output = ApiResult<Vec<MovieSummary>>> + Send {
        S::search(self, query)
    }

    fn details(&self, id: &MovieId) -> impl Future<Output = ApiResult<MovieDetails>> + Send {
        S::details(self, id)
    }
}
