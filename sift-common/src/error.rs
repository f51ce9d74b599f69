//! Common error types for SIFT

use thiserror::Error;

/// Common result type for SIFT operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the SIFT crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON review log or report (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested state file or directory entry not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Degenerate label sequence, bad threshold or malformed curve
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
