//! Event ingestion endpoint.
//!
//! The payload is dispatched on its `type` field: demand batches and
//! admissions append to their typed CSV logs, anything else lands in
//! the raw text log. Nothing here touches the trained models — events
//! wait for merge-and-retrain.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::storage::events::{self, AdmissionEvent, DemandEvent};

#[derive(Serialize)]
pub struct UpdateResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub written: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<&'static str>,
}

/// `POST /api/analytics/update` — append incoming events to the
/// active logs.
pub async fn ingest(
    State(ctx): State<ApiContext>,
    body: Option<Json<Value>>,
) -> Result<Json<UpdateResponse>, ApiError> {
    let payload = body
        .map(|Json(v)| v)
        .unwrap_or_else(|| Value::Object(Default::default()));

    match payload.get("type").and_then(Value::as_str) {
        Some("demand_batch") => {
            let events_in = payload
                .get("events")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();

            let mut written = 0;
            for ev in &events_in {
                let event = DemandEvent::stamped(
                    string_field(ev, "month"),
                    string_field(ev, "medicine"),
                    quantity_field(ev),
                    string_field(ev, "invoiceId"),
                );
                events::append_demand_event(&ctx.state.paths, &event)?;
                written += 1;
            }
            tracing::debug!(written, "demand batch ingested");
            Ok(Json(UpdateResponse {
                status: "ok",
                written: Some(written),
                note: None,
            }))
        }
        Some("admission") => {
            let event = AdmissionEvent {
                timestamp: Utc::now().to_rfc3339(),
                admitted_at: string_field(&payload, "admittedAt"),
                patient_name: string_field(&payload, "patientName"),
                age: string_field(&payload, "age"),
                gender: string_field(&payload, "gender"),
                room_type: string_field(&payload, "roomType"),
                doctor: string_field(&payload, "doctor"),
                admission_id: string_field(&payload, "admissionId"),
            };
            events::append_admission_event(&ctx.state.paths, &event)?;
            Ok(Json(UpdateResponse {
                status: "ok",
                written: None,
                note: None,
            }))
        }
        _ => {
            events::append_raw(&ctx.state.paths, &payload)?;
            Ok(Json(UpdateResponse {
                status: "ok",
                written: None,
                note: Some("stored raw"),
            }))
        }
    }
}

/// Stringify a loosely-typed field: strings pass through, numbers and
/// booleans render, absent and null become empty.
fn string_field(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn quantity_field(value: &Value) -> i64 {
    value
        .get("quantity")
        .and_then(|q| q.as_i64().or_else(|| q.as_f64().map(|f| f.round() as i64)))
        .unwrap_or(0)
}
