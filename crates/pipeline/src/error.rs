//! Pipeline error types

use content::ContentError;
use storage::StorageError;
use thiserror::Error;

/// Terminal failure of a pipeline run
///
/// Only `Configuration`, `Unauthorized` and `InvalidRequest` map to non-200
/// statuses; every downstream failure is reported as `ok: false`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// Missing secret or provider key
    #[error("{0}")]
    Configuration(String),

    #[error("Unauthorized")]
    Unauthorized,

    /// Malformed request body or parameter
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Market data or news provider failure
    #[error("Upstream fetch failed: {0}")]
    UpstreamFetch(String),

    #[error("Generation failed: {0}")]
    Generation(String),

    /// Content store write failure
    #[error("Publish failed: {0}")]
    Publish(String),

    /// Content store read failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// The run was cancelled before publishing
    #[error("Pipeline run cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, PipelineError>;

impl PipelineError {
    /// HTTP status for this error
    pub fn status_code(&self) -> u16 {
        match self {
            PipelineError::Configuration(_) => 500,
            PipelineError::Unauthorized => 401,
            PipelineError::InvalidRequest(_) => 400,
            _ => 200,
        }
    }
}

impl From<ContentError> for PipelineError {
    fn from(err: ContentError) -> Self {
        match err {
            ContentError::NotConfigured(what) => {
                PipelineError::Configuration(format!("{what} is not configured"))
            }
            ContentError::UnknownTopic(topic) => {
                PipelineError::InvalidRequest(format!("unknown topic {topic:?}"))
            }
            ContentError::Publish(e) => PipelineError::Publish(e.to_string()),
            other => PipelineError::Generation(other.to_string()),
        }
    }
}

impl From<StorageError> for PipelineError {
    fn from(err: StorageError) -> Self {
        PipelineError::Storage(err.to_string())
    }
}

impl From<common::Error> for PipelineError {
    fn from(err: common::Error) -> Self {
        PipelineError::InvalidRequest(err.to_string())
    }
}
