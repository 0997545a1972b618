//! Error types for Rill.

use thiserror::Error;

/// Result type alias for Rill operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Rill.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Protocol errors
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// API version outside the registered range
    #[error("Unsupported version: {0}")]
    UnsupportedVersion(String),

    /// Invalid input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Transaction timeout rejected by the broker
    #[error("Invalid transaction timeout: {0} ms")]
    InvalidTransactionTimeout(i32),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),

    /// Other errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
