//! Error types for jar backends.

use thiserror::Error;

/// Errors that can occur while querying a credential jar.
#[derive(Debug, Error)]
pub enum JarError {
    /// Database error from a SQLite-backed jar.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend-specific failure.
    #[error("jar backend error: {0}")]
    Backend(String),
}

/// Result type for jar operations.
pub type Result<T> = std::result::Result<T, JarError>;
