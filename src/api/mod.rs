//! HTTP API layer.
//!
//! The router is composable — `analytics_router()` returns a `Router`
//! that can be mounted on any axum server; `start_server()` wraps it
//! in the usual bind/spawn/graceful-shutdown lifecycle.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod types;

pub use router::analytics_router;
pub use server::{start_server, ApiServer};
pub use types::ApiContext;
