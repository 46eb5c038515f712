//! Patient readmission risk endpoint.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::analytics::features::RiskFeatures;
use crate::analytics::risk::{rule_based_score, RISK_THRESHOLD};
use crate::api::error::ApiError;
use crate::api::types::ApiContext;

#[derive(Default, Deserialize)]
pub struct RiskRequest {
    pub age: Option<f64>,
    #[serde(rename = "isSmoker")]
    pub is_smoker: Option<bool>,
    pub hr: Option<f64>,
    pub bp: Option<String>,
    pub condition: Option<String>,
}

#[derive(Serialize)]
pub struct RiskResponse {
    pub explanation: &'static str,
    pub risk_score: f64,
    pub risk_flag: u8,
}

/// `POST /api/predict/risk` — readmission probability for a patient.
///
/// Uses the trained classifier when one exists; otherwise the
/// deterministic rule-based score. The response says which path
/// produced the number.
pub async fn predict(
    State(ctx): State<ApiContext>,
    body: Option<Json<RiskRequest>>,
) -> Result<Json<RiskResponse>, ApiError> {
    let req = body.map(|Json(r)| r).unwrap_or_default();
    let features = RiskFeatures::from_raw(
        req.age,
        req.is_smoker.unwrap_or(false),
        req.hr,
        req.bp.as_deref(),
        req.condition.as_deref(),
    );

    let snapshot = ctx.state.snapshot();
    let (explanation, risk_score) = match &snapshot.risk_model {
        Some(model) => (
            "logistic risk probability (trained on synthetic data)",
            model.predict_probability(&features),
        ),
        None => ("rule based fallback", rule_based_score(&features)),
    };

    Ok(Json(RiskResponse {
        explanation,
        risk_score,
        risk_flag: u8::from(risk_score > RISK_THRESHOLD),
    }))
}
