//! Ticker scheduling for routine coverage
//!
//! [`TickerScheduler`] decides which tracked ticker is covered next and
//! counts how many routine articles were already published today. The
//! daily cap itself is applied by the caller.

mod scheduler;

pub use scheduler::{order_for_coverage, DailyCount, TickerScheduler};
