//! Observability for Tickerwire
//!
//! - Structured logging via tracing
//! - Prometheus metrics for pipeline runs and upstream fetches
//!
//! ```ignore
//! use observability::{init_logging, LogFormat};
//!
//! init_logging("tickerwire", LogFormat::Json)?;
//! observability::init_metrics(9090)?;
//! ```

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, LogFormat};
pub use metrics::{init_metrics, PipelineMetrics, RunTimer};
