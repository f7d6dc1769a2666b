//! API routes for the pipelines

use axum::routing::{get, post};
use axum::Router;
use server::{health_routes, HealthState};
use std::sync::Arc;

use crate::api::handlers::*;
use crate::api::ApiState;

/// Pipeline and score routes
pub fn pipeline_routes(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/pipelines/routine", post(run_routine))
        .route("/pipelines/breaking", post(run_breaking))
        .route("/pipelines/world-news", post(run_world_news))
        .route("/pipelines/macro", post(run_macro))
        .route("/scores/:symbol", get(get_score))
        .with_state(state)
}

/// Full application router: pipelines plus `/health`
pub fn create_router(state: ApiState, health: HealthState) -> Router {
    pipeline_routes(Arc::new(state)).merge(health_routes(Arc::new(health)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipelines::tests::{fixture, Fixture};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tokio_util::sync::CancellationToken;
    use tower::ServiceExt;

    const SECRET: &str = "s3cret";

    fn router_with(fixture: Fixture, secret: Option<&str>, shutdown: CancellationToken) -> Router {
        let state = ApiState::new(
            Arc::new(fixture.orchestrator),
            secret.map(String::from),
            shutdown,
        );
        create_router(state, HealthState::new("tickerwire", "test").with_check("cron_secret", secret.is_some()))
    }

    fn router(secret: Option<&str>) -> Router {
        router_with(fixture(|_| {}), secret, CancellationToken::new())
    }

    fn post_request(uri: &str, header: Option<(&str, &str)>, body: &str) -> Request<Body> {
        let mut builder = Request::builder().method("POST").uri(uri);
        if let Some((name, value)) = header {
            builder = builder.header(name, value);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_missing_secret_is_unauthorized() {
        let (status, body) = send(router(Some(SECRET)), post_request("/pipelines/routine", None, "")).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["ok"], false);
        assert_eq!(body["error"], "Unauthorized");
    }

    #[tokio::test]
    async fn test_wrong_secret_does_not_leak() {
        let (status, body) = send(
            router(Some(SECRET)),
            post_request("/pipelines/breaking", Some(("x-cron-secret", "guess")), ""),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(!body.to_string().contains(SECRET));
    }

    #[tokio::test]
    async fn test_unconfigured_secret_fails_closed() {
        let (status, body) = send(
            router(None),
            post_request("/pipelines/world-news", Some(("x-cron-secret", SECRET)), ""),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["ok"], false);
    }

    #[tokio::test]
    async fn test_routine_with_bearer_secret() {
        let (status, body) = send(
            router(Some(SECRET)),
            post_request("/pipelines/routine", Some(("authorization", "Bearer s3cret")), ""),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
        assert_eq!(body["created"], true);
        assert_eq!(body["aiGenerated"], true);
        assert!(body["article"]["slug"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_quoted_header_secret_accepted() {
        let (status, body) = send(
            router(Some(SECRET)),
            post_request(
                "/pipelines/routine",
                Some(("x-cron-secret", "\"s3cret\"")),
                r#"{"symbol": "msft"}"#,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["article"]["symbol"], "MSFT");
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let (status, body) = send(
            router(Some(SECRET)),
            post_request("/pipelines/routine", Some(("x-cron-secret", SECRET)), "{not json"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["ok"], false);

        let (status, _) = send(
            router(Some(SECRET)),
            post_request("/pipelines/routine", Some(("x-cron-secret", SECRET)), r#"{"ticker": "AAPL"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_auth_checked_before_body() {
        let (status, _) = send(router(Some(SECRET)), post_request("/pipelines/macro", None, "{not json")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_breaking_report_shape() {
        let (status, body) = send(
            router(Some(SECRET)),
            post_request("/pipelines/breaking", Some(("x-cron-secret", SECRET)), ""),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
        assert_eq!(body["detected"], 3);
        assert_eq!(body["created"], 3);
        assert_eq!(body["events"].as_array().unwrap().len(), 3);
        assert_eq!(body["articles"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_world_news_sources_used() {
        let (status, body) = send(
            router(Some(SECRET)),
            post_request("/pipelines/world-news", Some(("x-cron-secret", SECRET)), ""),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["created"], true);
        assert_eq!(body["sourcesUsed"], 3);
    }

    #[tokio::test]
    async fn test_macro_unknown_topic_is_bad_request() {
        let (status, body) = send(
            router(Some(SECRET)),
            post_request("/pipelines/macro", Some(("x-cron-secret", SECRET)), r#"{"topic": "weather"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["ok"], false);
    }

    #[tokio::test]
    async fn test_shutdown_reports_cancelled_run() {
        let shutdown = CancellationToken::new();
        shutdown.cancel();

        let (status, body) = send(
            router_with(fixture(|_| {}), Some(SECRET), shutdown),
            post_request("/pipelines/macro", Some(("x-cron-secret", SECRET)), ""),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], false);
    }

    #[tokio::test]
    async fn test_score_route() {
        let request = Request::builder().uri("/scores/aapl").body(Body::empty()).unwrap();
        let (status, body) = send(router(Some(SECRET)), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["symbol"], "AAPL");
        assert!(body["score"]["score"].is_number());
        assert!(body["markdown"].as_str().unwrap().contains("Rating"));
    }

    #[tokio::test]
    async fn test_health_route_merged() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(router(None), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["checks"]["cron_secret"], false);
    }
}
