//! Content error types

use storage::StorageError;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ContentError {
    /// The generation backend has no API key
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    /// Transport failure, including timeouts
    #[error("Connection error: {0}")]
    Connection(String),

    /// Non-success HTTP status from the backend
    #[error("Generator returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The backend answered without any text
    #[error("Generator returned no content")]
    EmptyResponse,

    /// Unknown macro topic
    #[error("Unknown topic: {0}")]
    UnknownTopic(String),

    /// Content store write failed
    #[error("Publish failed: {0}")]
    Publish(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, ContentError>;
