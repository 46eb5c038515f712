//! Merge-and-retrain endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;

#[derive(Serialize)]
pub struct MergeResponse {
    pub status: &'static str,
    pub merged_demand_groups: usize,
    pub medicines: Vec<String>,
    pub months_count: usize,
}

/// `POST /api/analytics/merge_and_retrain` — fold pending demand
/// events into history, then rebuild every model. Takes no body.
/// Passes are serialized; a concurrent call waits its turn and then
/// finds an empty log.
pub async fn run(State(ctx): State<ApiContext>) -> Result<Json<MergeResponse>, ApiError> {
    let report = ctx.state.merge_and_retrain().await?;
    Ok(Json(MergeResponse {
        status: "ok",
        merged_demand_groups: report.merged_demand_groups,
        medicines: report.snapshot.medicines.clone(),
        months_count: report.snapshot.month_index.len(),
    }))
}
