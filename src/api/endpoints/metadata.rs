//! Catalog and month metadata endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::types::ApiContext;

#[derive(Serialize)]
pub struct MetadataResponse {
    pub medicines: Vec<String>,
    pub diseases: Vec<String>,
    pub months: Vec<String>,
}

/// `GET /api/analytics/metadata` — everything a client needs to build
/// its pickers. Idempotent between writes.
pub async fn fetch(State(ctx): State<ApiContext>) -> Json<MetadataResponse> {
    let snapshot = ctx.state.snapshot();
    Json(MetadataResponse {
        medicines: snapshot.medicines.clone(),
        diseases: snapshot.diseases.clone(),
        months: snapshot.month_index.labels().to_vec(),
    })
}
