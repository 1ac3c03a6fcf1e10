use std::net::SocketAddr;

use axum::{
    Router,
    body::Body,
    http::Request,
    middleware,
    routing::{get, post},
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info_span;

use crate::handlers::{
    admin::sync_table,
    dishes::{create_dish, delete_dish, get_dish, list_dishes, update_dish},
    full_menu::get_full_menu,
    health::health_check,
    menus::{create_menu, delete_menu, get_menu, list_menus, update_menu},
    metrics::metrics_handler,
    submenus::{create_submenu, delete_submenu, get_submenu, list_submenus, update_submenu},
};
use crate::middleware::{REQUEST_ID_HEADER, propagate_request_id_layer, set_request_id_layer};
use crate::state::AppState;

fn request_span(request: &Request<Body>) -> tracing::Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    info_span!(
        "http_request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
    )
}

/// Creates a router with the given application state and metrics handle.
pub fn create_router_with_state(state: AppState, prometheus_handle: PrometheusHandle) -> Router {
    let middleware_stack = ServiceBuilder::new()
        .layer(set_request_id_layer())
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(propagate_request_id_layer());

    // Router for metrics endpoint (different state)
    let metrics_router = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(prometheus_handle);

    // Catalog API under /api/v1
    let api_router = Router::new()
        .route("/menus", get(list_menus).post(create_menu))
        .route(
            "/menus/{menu_id}",
            get(get_menu).patch(update_menu).delete(delete_menu),
        )
        .route(
            "/menus/{menu_id}/submenus",
            get(list_submenus).post(create_submenu),
        )
        .route(
            "/menus/{menu_id}/submenus/{submenu_id}",
            get(get_submenu).patch(update_submenu).delete(delete_submenu),
        )
        .route(
            "/menus/{menu_id}/submenus/{submenu_id}/dishes",
            get(list_dishes).post(create_dish),
        )
        .route(
            "/menus/{menu_id}/submenus/{submenu_id}/dishes/{dish_id}",
            get(get_dish).patch(update_dish).delete(delete_dish),
        )
        .route("/full_menu", get(get_full_menu))
        .route("/admin/sync", post(sync_table))
        .with_state(state);

    // Merge routers and apply middleware
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_router)
        .merge(metrics_router)
        // HTTP metrics middleware
        .layer(middleware::from_fn(
            crate::metrics::http::http_metrics_middleware,
        ))
        .layer(middleware_stack)
}

/// Creates a router without state (health endpoint only, for tests).
pub fn create_router() -> Router {
    let middleware_stack = ServiceBuilder::new()
        .layer(set_request_id_layer())
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(propagate_request_id_layer());

    Router::new()
        .route("/health", get(health_check))
        .layer(middleware_stack)
}

/// Runs the server with the given state and metrics handle.
pub async fn run_server_with_state(
    addr: SocketAddr,
    state: AppState,
    prometheus_handle: PrometheusHandle,
) -> Result<(), std::io::Error> {
    let app = create_router_with_state(state, prometheus_handle);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
