//! API server lifecycle — starts/stops the axum HTTP server.
//!
//! Pattern: bind → spawn background task → return a handle with a
//! shutdown channel. The binary drives the handle from `main`; tests
//! start throwaway servers on ephemeral localhost ports.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::oneshot;

use crate::api::router::analytics_router;
use crate::state::AppState;

/// Handle to a running API server.
pub struct ApiServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl ApiServer {
    /// The address the server actually bound (useful with port 0).
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Shut down the server gracefully.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("API server shutdown signal sent");
        }
    }
}

/// Bind the analytics API on `addr` and serve it in a background
/// tokio task.
pub async fn start_server(state: Arc<AppState>, addr: SocketAddr) -> Result<ApiServer, String> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind API server on {addr}: {e}"))?;

    let addr = listener
        .local_addr()
        .map_err(|e| format!("Failed to get server address: {e}"))?;

    let app = analytics_router(state);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("API server received shutdown signal");
        };

        tracing::info!(%addr, "API server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("API server error: {e}");
        }

        tracing::info!("API server stopped");
    });

    Ok(ApiServer {
        addr,
        shutdown_tx: Some(shutdown_tx),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DataPaths;

    async fn start_on_localhost() -> (tempfile::TempDir, ApiServer) {
        let tmp = tempfile::tempdir().unwrap();
        let state = Arc::new(AppState::bootstrap(DataPaths::new(tmp.path())).unwrap());
        let server = start_server(state, SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .expect("server should start");
        (tmp, server)
    }

    #[tokio::test]
    async fn serves_metadata_over_http() {
        let (_tmp, mut server) = start_on_localhost().await;
        assert!(server.addr().port() > 0);

        let url = format!("http://{}/api/analytics/metadata", server.addr());
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);

        let json: serde_json::Value = resp.json().await.unwrap();
        // No data files: the synthetic fallback keeps the service queryable.
        assert_eq!(json["months"].as_array().unwrap().len(), 12);

        server.shutdown();
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let (_tmp, mut server) = start_on_localhost().await;

        let url = format!("http://{}/nonexistent", server.addr());
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);

        server.shutdown();
    }

    #[tokio::test]
    async fn shutdown_is_idempotent() {
        let (_tmp, mut server) = start_on_localhost().await;
        server.shutdown();
        server.shutdown();
    }
}
