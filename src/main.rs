use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use medisys_analytics::api;
use medisys_analytics::config::{self, DataPaths};
use medisys_analytics::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let paths = DataPaths::from_env();
    let state = match AppState::bootstrap(paths) {
        Ok(state) => Arc::new(state),
        Err(err) => {
            tracing::error!(%err, "initial training failed");
            std::process::exit(1);
        }
    };

    let snapshot = state.snapshot();
    tracing::info!(
        medicines = snapshot.medicines.len(),
        diseases = snapshot.diseases.len(),
        months = snapshot.month_index.len(),
        risk_model = snapshot.risk_model.is_some(),
        "models trained, service ready"
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config::port_from_env()));
    let mut server = match api::start_server(state, addr).await {
        Ok(server) => server,
        Err(err) => {
            tracing::error!(%err, "failed to start API server");
            std::process::exit(1);
        }
    };

    tracing::info!(addr = %server.addr(), "analytics service listening");

    let _ = tokio::signal::ctrl_c().await;
    server.shutdown();
    // Let in-flight requests drain before the process exits.
    tokio::time::sleep(Duration::from_millis(100)).await;
}
