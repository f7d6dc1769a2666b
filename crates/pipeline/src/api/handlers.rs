//! API handlers for the pipeline endpoints

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::Json;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

use crate::api::models::ScoreResponse;
use crate::api::ApiState;
use crate::auth::{authorize, presented_secret, SECRET_HEADER};
use crate::error::{PipelineError, Result};
use crate::orchestrator::stage;
use crate::outcome::{BreakingReport, MacroArticle, Outcome, RoutineArticle, Stage, WorldNewsArticle};
use crate::pipelines::{MacroRequest, RoutineRequest};

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

fn check_secret(state: &ApiState, headers: &HeaderMap) -> Result<()> {
    stage(Stage::Authenticating);
    let presented = presented_secret(
        header_value(headers, SECRET_HEADER),
        header_value(headers, AUTHORIZATION.as_str()),
    );
    authorize(state.cron_secret.as_deref(), presented)
}

/// Empty bodies mean "no overrides"
fn parse_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| PipelineError::InvalidRequest(e.to_string()))
}

/// Routine pipeline handler
pub async fn run_routine(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Outcome<RoutineArticle>>> {
    check_secret(&state, &headers)?;
    let request: RoutineRequest = parse_body(&body)?;
    debug!(?request, "Routine request accepted");

    let cancel = state.shutdown.child_token();
    let outcome = state.orchestrator.run_routine(request, &cancel).await?;
    Ok(Json(outcome))
}

/// Breaking pipeline handler
pub async fn run_breaking(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
) -> Result<Json<BreakingReport>> {
    check_secret(&state, &headers)?;

    let cancel = state.shutdown.child_token();
    let report = state.orchestrator.run_breaking(&cancel).await?;
    Ok(Json(report))
}

/// World news pipeline handler
pub async fn run_world_news(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
) -> Result<Json<Outcome<WorldNewsArticle>>> {
    check_secret(&state, &headers)?;

    let cancel = state.shutdown.child_token();
    let outcome = state.orchestrator.run_world_news(&cancel).await?;
    Ok(Json(outcome))
}

/// Macro pipeline handler
pub async fn run_macro(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Outcome<MacroArticle>>> {
    check_secret(&state, &headers)?;
    let request: MacroRequest = parse_body(&body)?;

    let cancel = state.shutdown.child_token();
    let outcome = state.orchestrator.run_macro(request, &cancel).await?;
    Ok(Json(outcome))
}

/// Score one symbol on demand
pub async fn get_score(
    State(state): State<Arc<ApiState>>,
    Path(symbol): Path<String>,
) -> Result<Json<ScoreResponse>> {
    let symbol = common::normalize_symbol(&symbol)?;

    let cancel = state.shutdown.child_token();
    let snapshot = state.orchestrator.snapshot(&symbol, &cancel).await?;
    let score = state.orchestrator.scorer().score(&snapshot);
    let markdown = scoring::format_rating_markdown(&score);

    Ok(Json(ScoreResponse {
        ok: true,
        symbol,
        score,
        markdown,
    }))
}
