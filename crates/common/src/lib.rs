//! Common types and utilities for Tickerwire
//!
//! This crate provides the domain types shared by every Tickerwire crate:
//! market snapshots, news items, tracked tickers and articles.
//!
//! # Modules
//!
//! - [`error`] - Common error types
//! - [`types`] - Shared domain types (MarketSnapshot, Ticker, Article, etc.)
//! - [`time`] - UTC calendar-day windows

pub mod error;
pub mod time;
pub mod types;

pub use error::{Error, Result};
pub use time::UtcDayWindow;
pub use types::*;
