//! Common error types for the people registry

use thiserror::Error;

/// Common result type for people registry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the registry crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Storage statement exceeded its time budget
    #[error("Timed out: {0}")]
    Timeout(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}
