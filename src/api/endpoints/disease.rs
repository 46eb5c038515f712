//! Disease trend forecast endpoint.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::analytics::MonthInput;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;

#[derive(Deserialize)]
pub struct DiseaseRequest {
    pub month: Option<MonthInput>,
}

#[derive(Serialize)]
pub struct DiseaseResponse {
    pub month: Option<MonthInput>,
    pub predictions: Vec<DiseasePrediction>,
}

#[derive(Serialize)]
pub struct DiseasePrediction {
    pub disease: String,
    pub predicted_cases: u32,
}

/// `POST /api/predict/disease` — per-disease case counts for a month.
pub async fn predict(
    State(ctx): State<ApiContext>,
    body: Option<Json<DiseaseRequest>>,
) -> Result<Json<DiseaseResponse>, ApiError> {
    let month = body.and_then(|Json(req)| req.month);
    let snapshot = ctx.state.snapshot();
    let Some(position) = snapshot.month_index.resolve(month.as_ref()) else {
        return Err(ApiError::UnresolvedMonth {
            available_months: snapshot.month_index.labels().to_vec(),
        });
    };

    let predictions = snapshot
        .diseases
        .iter()
        .map(|disease| DiseasePrediction {
            disease: disease.clone(),
            predicted_cases: snapshot.predict_cases(disease, position),
        })
        .collect();

    Ok(Json(DiseaseResponse { month, predictions }))
}
