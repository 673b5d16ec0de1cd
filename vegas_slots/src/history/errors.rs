//! Spin history error types.

use thiserror::Error;

/// Spin history errors
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored reel label no longer parses
    #[error("Corrupt spin record {id}: {reason}")]
    CorruptRecord { id: i64, reason: String },
}

impl HistoryError {
    /// Get a client-safe error message that doesn't leak sensitive information
    pub fn client_message(&self) -> String {
        "Internal server error".to_string()
    }
}

/// Result type for history operations
pub type HistoryResult<T> = Result<T, HistoryError>;
