use std::io;

use marquee_core::api::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] marquee_core::Error),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Search query cannot be empty")]
    EmptySearchQuery,
    #[error("Search query must be at least {0} characters")]
    QueryTooShort(usize),
    #[error("{0}")]
    SearchFailed(String),
    #[error("Search was interrupted before it finished")]
    SearchInterrupted,
    #[error("No result #{0} in the current list")]
    NoSuchResult(usize),
    #[error("Configuration error: {0}")]
    Config(String),
}
