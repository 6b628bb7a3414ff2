//! Error types for the arena core library.

use thiserror::Error;

/// Result type alias using the arena `Error`.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for store and configuration operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Persisted document exists but cannot be decoded
    #[error("Corrupt store document {path}: {source}")]
    CorruptStore {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
