//! HTTP adapters for external providers

#[cfg(feature = "client")]
pub mod alpaca;

#[cfg(feature = "client")]
pub mod newsapi;

#[cfg(feature = "client")]
pub(crate) fn map_transport(e: reqwest::Error) -> crate::MarketDataError {
    if e.is_timeout() {
        crate::MarketDataError::Connection(format!("request timed out: {}", e))
    } else {
        crate::MarketDataError::Connection(e.to_string())
    }
}
