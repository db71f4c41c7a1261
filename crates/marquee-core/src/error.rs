//! Error types for marquee-core

use thiserror::Error;

/// Result type alias using marquee-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in marquee-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// `SQLite` error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
