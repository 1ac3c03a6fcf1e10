//! Carta Server binary.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use carta_cache::{CacheConfig, CacheRepository, MemoryKv, register_cache_metrics};
use carta_server::{AppState, ServerConfig, run_server_with_state};
use carta_storage::MemoryStore;

use carta_server::metrics::http::register_http_metrics;
use carta_server::metrics::init_metrics;
use carta_server::sync::{FileTableSource, SyncConfig, SyncScheduler, TableReconciler};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::load()?;
    let addr = config.addr()?;

    tracing::info!("Starting Carta Server v{}", env!("CARGO_PKG_VERSION"));

    // Metrics
    let prometheus_handle = init_metrics();
    register_http_metrics();
    register_cache_metrics();

    // Storage + cache
    let store = Arc::new(MemoryStore::new());
    let cache = Arc::new(CacheRepository::new(
        Arc::new(MemoryKv::new()),
        CacheConfig {
            ttl_seconds: config.cache_ttl_seconds,
        },
    ));

    let mut state = AppState::from_memory(store, cache);

    // Table sync (opcional, necesita CARTA_TABLE_PATH)
    let _sync_handle = match &config.table_path {
        Some(path) => {
            tracing::info!("Table sync enabled over {}", path);
            let source = Arc::new(FileTableSource::new(path));
            let (menus, submenus, dishes) = state.service_handles();
            let reconciler = Arc::new(TableReconciler::new(source, menus, submenus, dishes));
            state = state.with_table_sync(reconciler.clone());

            let scheduler = SyncScheduler::new(
                reconciler,
                SyncConfig {
                    interval: Duration::from_secs(config.sync_interval_seconds),
                    ..SyncConfig::default()
                },
            );
            Some(scheduler.start())
        },
        None => {
            tracing::info!("Table sync disabled (CARTA_TABLE_PATH not set)");
            None
        },
    };

    run_server_with_state(addr, state, prometheus_handle).await?;

    Ok(())
}
