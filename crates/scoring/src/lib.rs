//! Signal scoring for Tickerwire
//!
//! [`SignalScorer`] turns a [`MarketSnapshot`](common::MarketSnapshot) into a
//! [`StockScore`]: five weighted indicators (momentum, volume, news
//! sentiment, intraday range, trend) aggregated into a score in
//! `[-100, 100]`, a buy/hold/sell rating and a confidence level.
//!
//! Scoring is pure and performs no I/O. Markdown presentation of a score is
//! kept separate in [`format`].

pub mod format;
pub mod scorer;
pub mod signals;
pub mod types;

pub use format::format_rating_markdown;
pub use scorer::SignalScorer;
pub use types::{Confidence, Rating, Signal, SignalResult, StockScore};
