//! Common error types for Tickerwire

use thiserror::Error;

/// Common error type used across Tickerwire crates
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A ticker symbol failed validation
    #[error("Invalid symbol: {0:?}")]
    InvalidSymbol(String),
}

/// Result type alias using the common Error type
pub type Result<T> = std::result::Result<T, Error>;
