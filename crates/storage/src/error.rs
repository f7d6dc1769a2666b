//! Storage error types

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StorageError {
    /// Backend could not be reached
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query or statement failed
    #[error("Query error: {0}")]
    Query(String),

    /// An article with this slug already exists
    #[error("Duplicate slug: {0}")]
    DuplicateSlug(String),

    /// Stored value could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
