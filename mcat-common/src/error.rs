//! Common error types for mcat

use thiserror::Error;

/// Common result type for catalogue operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors shared by the catalogue crates
#[derive(Error, Debug)]
pub enum Error {
    /// Catalogue database error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Filesystem error while preparing folders or reading config
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be read or is malformed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalogue record (or format) does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Value outside the accepted vocabulary
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
