//! Medicine demand forecast endpoint.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::analytics::MonthInput;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;

#[derive(Deserialize)]
pub struct DemandRequest {
    pub month: Option<MonthInput>,
}

#[derive(Serialize)]
pub struct DemandResponse {
    pub month: Option<MonthInput>,
    pub predictions: Vec<DemandPrediction>,
}

#[derive(Serialize)]
pub struct DemandPrediction {
    pub medicine: String,
    pub predicted_demand: u32,
}

/// `POST /api/predict/demand` — per-medicine demand for a month.
///
/// An absent or malformed body is treated as an absent month, which
/// resolves to the invalid-input response carrying the known labels.
pub async fn predict(
    State(ctx): State<ApiContext>,
    body: Option<Json<DemandRequest>>,
) -> Result<Json<DemandResponse>, ApiError> {
    let month = body.and_then(|Json(req)| req.month);
    let snapshot = ctx.state.snapshot();
    let Some(position) = snapshot.month_index.resolve(month.as_ref()) else {
        return Err(ApiError::UnresolvedMonth {
            available_months: snapshot.month_index.labels().to_vec(),
        });
    };

    let predictions = snapshot
        .medicines
        .iter()
        .map(|medicine| DemandPrediction {
            medicine: medicine.clone(),
            predicted_demand: snapshot.predict_demand(medicine, position),
        })
        .collect();

    Ok(Json(DemandResponse { month, predictions }))
}
