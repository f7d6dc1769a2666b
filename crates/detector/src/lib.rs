//! Breaking event detection
//!
//! Scans a watchlist, applies threshold rules to each symbol's snapshot and
//! ranks the qualifying symbols. Snapshots are fetched with bounded
//! concurrency; ranking is deterministic regardless of completion order.

pub mod detector;
pub mod rules;
pub mod templates;
pub mod types;

pub use detector::{BreakingEventDetector, DetectorConfig};
pub use rules::evaluate;
pub use templates::{event_excerpt, event_title};
pub use types::{BreakingNewsEvent, Severity};
