//! Prometheus metrics for pipeline runs
//!
//! Names exported:
//!
//! * `pipeline_runs_total{pipeline, outcome}`
//! * `pipeline_run_duration_seconds{pipeline}`
//! * `pipeline_fallbacks_total{pipeline}`
//! * `breaking_events_detected_total`
//! * `upstream_fetch_failures_total{source}`

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Start the Prometheus exporter, serving `/metrics` on `port`
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;

    tracing::info!(%addr, "Metrics server listening");
    Ok(())
}

/// Metric helpers scoped to one pipeline kind
///
/// Recording is a no-op until a recorder is installed, so this is safe to use
/// in tests.
#[derive(Debug, Clone)]
pub struct PipelineMetrics {
    pipeline: &'static str,
}

impl PipelineMetrics {
    pub fn new(pipeline: &'static str) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &'static str {
        self.pipeline
    }

    /// Count a terminal outcome (`created`, `skipped`, `failed`)
    pub fn record_outcome(&self, outcome: &'static str) {
        counter!("pipeline_runs_total", "pipeline" => self.pipeline, "outcome" => outcome)
            .increment(1);
    }

    /// Count a placeholder substituted for generated content
    pub fn record_fallback(&self) {
        counter!("pipeline_fallbacks_total", "pipeline" => self.pipeline).increment(1);
    }

    pub fn record_breaking_events(&self, count: usize) {
        counter!("breaking_events_detected_total").increment(count as u64);
    }

    /// Start timing a run; duration is recorded when the timer drops
    pub fn start_run(&self) -> RunTimer {
        RunTimer {
            pipeline: self.pipeline,
            start: Instant::now(),
        }
    }
}

/// Count a failed call to an external source (`market_data`, `world_news`, `generation`)
pub fn record_upstream_failure(source: &'static str) {
    counter!("upstream_fetch_failures_total", "source" => source).increment(1);
}

/// Records `pipeline_run_duration_seconds` on drop
pub struct RunTimer {
    pipeline: &'static str,
    start: Instant,
}

impl Drop for RunTimer {
    fn drop(&mut self) {
        histogram!("pipeline_run_duration_seconds", "pipeline" => self.pipeline)
            .record(self.start.elapsed().as_secs_f64());
    }
}
