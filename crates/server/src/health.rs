//! `/health` endpoint

use axum::{extract::State, response::Json, routing::get, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: String,
    pub uptime_seconds: u64,
    /// Named readiness flags, e.g. whether a secret is configured
    pub checks: BTreeMap<String, bool>,
}

/// Shared state for the health handler
#[derive(Debug, Clone)]
pub struct HealthState {
    pub service_name: String,
    pub version: String,
    pub start_time: Instant,
    pub checks: BTreeMap<String, bool>,
}

impl HealthState {
    pub fn new(service_name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            version: version.into(),
            start_time: Instant::now(),
            checks: BTreeMap::new(),
        }
    }

    pub fn with_check(mut self, name: impl Into<String>, ok: bool) -> Self {
        self.checks.insert(name.into(), ok);
        self
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// `ok` when every check passes, `degraded` otherwise
    pub fn snapshot(&self) -> HealthStatus {
        let healthy = self.checks.values().all(|ok| *ok);
        HealthStatus {
            status: if healthy { "ok" } else { "degraded" }.to_string(),
            service: self.service_name.clone(),
            version: self.version.clone(),
            timestamp: Utc::now().to_rfc3339(),
            uptime_seconds: self.uptime_seconds(),
            checks: self.checks.clone(),
        }
    }
}

pub async fn health_handler(State(state): State<Arc<HealthState>>) -> Json<HealthStatus> {
    Json(state.snapshot())
}

pub fn health_routes(state: Arc<HealthState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[test]
    fn test_degraded_when_any_check_fails() {
        let state = HealthState::new("tickerwire", "0.1.0")
            .with_check("cron_secret", true)
            .with_check("generation_key", false);

        let status = state.snapshot();
        assert_eq!(status.status, "degraded");
        assert_eq!(status.checks.get("cron_secret"), Some(&true));
    }

    #[tokio::test]
    async fn test_health_route() {
        let state = Arc::new(HealthState::new("tickerwire", "0.1.0").with_check("cron_secret", true));
        let response = health_routes(state)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["service"], "tickerwire");
        assert_eq!(json["checks"]["cron_secret"], true);
    }
}
