//! Persistence for tracked tickers and published articles
//!
//! Two async traits describe what the pipelines need from storage:
//! [`TickerStore`] for the routine rotation and [`ArticleStore`] for
//! publishing and the daily quota. [`InMemoryContentStore`] backs both for
//! tests and single-process runs; `PostgresContentStore` (feature
//! `postgres`) is the durable backend.

pub mod error;
pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod traits;

pub use error::{Result, StorageError};
pub use memory::InMemoryContentStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresContentStore;
pub use traits::{ArticleStore, ContentStore, TickerStore};
