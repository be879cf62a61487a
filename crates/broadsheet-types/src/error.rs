//! Error types for broadsheet.

use thiserror::Error;

/// Result type alias for broadsheet operations.
pub type Result<T> = std::result::Result<T, BroadsheetError>;

/// Errors that can occur while fetching and materializing articles.
#[derive(Error, Debug)]
pub enum BroadsheetError {
    /// No API credential was supplied.
    #[error("Missing API credential: {reason}")]
    MissingCredential {
        /// What was consulted and found empty.
        reason: String,
    },

    /// A query was constructed with invalid parameters.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Fetching a page failed.
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Building or writing a table failed.
    #[error("Format error: {0}")]
    Format(String),

    /// Writing to the database failed.
    #[error("Store error: {0}")]
    Store(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
