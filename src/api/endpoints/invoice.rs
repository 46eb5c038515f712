//! Invoice parsing endpoint.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::invoice::InvoiceRow;

#[derive(Serialize)]
pub struct ParseResponse {
    pub rows: Vec<InvoiceRow>,
}

/// `POST /api/invoice/parse` — multipart upload with a `file` field
/// holding the PDF. Extraction is best-effort: a table-less document
/// yields an empty `rows`, not an error.
pub async fn parse(
    State(ctx): State<ApiContext>,
    mut multipart: Multipart,
) -> Result<Json<ParseResponse>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        if field.file_name().map_or(true, str::is_empty) {
            return Err(ApiError::BadRequest("No selected file".into()));
        }
        let document = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        let rows = ctx.extractor.extract(&document)?;
        return Ok(Json(ParseResponse { rows }));
    }

    Err(ApiError::BadRequest("No file part".into()))
}
