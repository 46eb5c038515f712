//! API error types with JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::analytics::AnalyticsError;
use crate::invoice::InvoiceError;
use crate::state::StateError;
use crate::storage::StorageError;

/// Error body as clients expect it: a flat `error` string, plus the
/// known month labels when the input month failed to resolve.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_months: Option<Vec<String>>,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid or out-of-range month")]
    UnresolvedMonth { available_months: Vec<String> },

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, available_months) = match self {
            ApiError::UnresolvedMonth {
                ref available_months,
            } => (StatusCode::BAD_REQUEST, Some(available_months.clone())),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, None),
            ApiError::Internal(ref detail) => {
                tracing::error!(detail, "request handling failed");
                (StatusCode::INTERNAL_SERVER_ERROR, None)
            }
        };

        let body = ErrorBody {
            error: self.to_string(),
            available_months,
        };
        (status, Json(body)).into_response()
    }
}

impl From<StateError> for ApiError {
    fn from(err: StateError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<AnalyticsError> for ApiError {
    fn from(err: AnalyticsError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<InvoiceError> for ApiError {
    fn from(err: InvoiceError) -> Self {
        ApiError::Internal(err.to_string())
    }
}
