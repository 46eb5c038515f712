//! Analytics API router.
//!
//! Returns a composable `Router` that can be mounted on any axum
//! server. All routes live under `/api/`; CORS is permissive because
//! the dashboard frontend is served from a different origin.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;
use crate::state::AppState;

/// Build the analytics API router.
pub fn analytics_router(state: Arc<AppState>) -> Router {
    build_router(ApiContext::new(state))
}

/// Build router from a pre-constructed `ApiContext`. Used by tests
/// that swap the invoice extraction backend.
#[cfg(test)]
pub(crate) fn analytics_router_with_ctx(ctx: ApiContext) -> Router {
    build_router(ctx)
}

fn build_router(ctx: ApiContext) -> Router {
    Router::new()
        .route("/api/health", get(endpoints::health::check))
        .route("/api/predict/demand", post(endpoints::demand::predict))
        .route("/api/predict/disease", post(endpoints::disease::predict))
        .route("/api/predict/risk", post(endpoints::risk::predict))
        .route("/api/analytics/metadata", get(endpoints::metadata::fetch))
        .route("/api/analytics/update", post(endpoints::update::ingest))
        .route(
            "/api/analytics/merge_and_retrain",
            post(endpoints::merge::run),
        )
        .route("/api/invoice/parse", post(endpoints::invoice::parse))
        .with_state(ctx)
        .layer(CorsLayer::permissive())
}
