//! Response bodies that are not pipeline outcomes

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use scoring::StockScore;
use serde::Serialize;

use crate::error::PipelineError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: String,
}

/// On-demand rating for one symbol
#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub ok: bool,
    pub symbol: String,
    pub score: StockScore,
    pub markdown: String,
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorResponse {
            ok: false,
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
