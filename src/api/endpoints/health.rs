//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::types::ApiContext;
use crate::config;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub months: usize,
    pub trained_at: String,
}

/// `GET /api/health` — liveness plus a hint at model freshness.
pub async fn check(State(ctx): State<ApiContext>) -> Json<HealthResponse> {
    let snapshot = ctx.state.snapshot();
    Json(HealthResponse {
        status: "ok",
        version: config::APP_VERSION,
        months: snapshot.month_index.len(),
        trained_at: snapshot.trained_at.to_rfc3339(),
    })
}
