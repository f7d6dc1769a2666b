//! Market data error types

use thiserror::Error;

/// Errors from market data and news providers
#[derive(Error, Debug, Clone)]
pub enum MarketDataError {
    /// Provider credentials are not configured
    #[error("Missing credentials for {0}")]
    MissingCredentials(&'static str),

    /// Transport failure, including timeouts
    #[error("Connection error: {0}")]
    Connection(String),

    /// Non-success HTTP status from the provider
    #[error("Provider returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body did not match the expected shape
    #[error("Failed to decode provider response: {0}")]
    Decode(String),

    /// Every leg of a snapshot fetch failed
    #[error("Data not available: {0}")]
    DataNotAvailable(String),
}

pub type Result<T> = std::result::Result<T, MarketDataError>;
