//! HTTP surface for the pipelines
//!
//! Every pipeline endpoint authenticates the caller before reading the body,
//! runs on a child of the server's shutdown token and answers with the
//! pipeline's JSON outcome. Errors render as `{ok: false, error}`.

pub mod handlers;
pub mod models;
pub mod routes;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::orchestrator::Orchestrator;

pub use routes::{create_router, pipeline_routes};

/// Shared state for the pipeline handlers
pub struct ApiState {
    pub orchestrator: Arc<Orchestrator>,
    /// Configured shared secret; `None` fails every pipeline call closed
    pub cron_secret: Option<String>,
    /// Parent of the per-request cancellation tokens
    pub shutdown: CancellationToken,
}

impl ApiState {
    pub fn new(orchestrator: Arc<Orchestrator>, cron_secret: Option<String>, shutdown: CancellationToken) -> Self {
        Self {
            orchestrator,
            cron_secret,
            shutdown,
        }
    }
}
