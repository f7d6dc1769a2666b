//! Market data and world news sources
//!
//! Two collaborator boundaries live here:
//!
//! - [`MarketDataClient`]: latest bar, previous close and ticker headlines,
//!   assembled into a [`MarketSnapshot`](common::MarketSnapshot) with
//!   per-leg degradation
//! - [`WorldNewsClient`]: general headlines by category, gathered and
//!   deduplicated by [`gather_world_news`]
//!
//! # Feature Flags
//!
//! - `client` - Enable the Alpaca and NewsAPI HTTP adapters

pub mod clients;
pub mod error;
pub mod snapshot;
pub mod world;

pub use error::{MarketDataError, Result};
pub use snapshot::{fetch_snapshot, MarketDataClient, StaticMarketDataClient, DEFAULT_NEWS_LIMIT};
pub use world::{
    filter_breaking, gather_world_news, NewsCategory, StaticWorldNewsClient, WorldNewsClient,
    BREAKING_KEYWORDS,
};

#[cfg(feature = "client")]
pub use clients::alpaca::AlpacaClient;

#[cfg(feature = "client")]
pub use clients::newsapi::NewsApiClient;
