//! # Carta Server
//!
//! Axum HTTP server for the Carta menu catalog: entity services with
//! read-through / write-through caching, the catalog API under `/api/v1`,
//! and the admin-table synchronization job.

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod server;
pub mod services;
pub mod state;
pub mod sync;

// Re-exports
pub use config::ServerConfig;
pub use handlers::HealthResponse;
pub use server::{create_router, create_router_with_state, run_server_with_state};
pub use state::AppState;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
