//! HTTP API server for the order orchestration service.
//!
//! Provides REST endpoints for order creation, lookup, status updates,
//! and cancellation, with structured logging (tracing) and Prometheus
//! metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, patch, post};
use metrics_exporter_prometheus::PrometheusHandle;
use orchestrator::{InMemoryIdentityDirectory, InMemoryStockLedger, OrderOrchestrator};
use store::OrderStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::orders::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: OrderStore + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/orders", post(routes::orders::create::<S>))
        .route("/orders/{id}", get(routes::orders::get::<S>))
        .route(
            "/orders/user/{user_id}",
            get(routes::orders::list_for_user::<S>),
        )
        .route(
            "/orders/{id}/status",
            patch(routes::orders::set_status::<S>),
        )
        .route(
            "/orders/{id}/payment",
            patch(routes::orders::set_payment_status::<S>),
        )
        .route("/orders/{id}/cancel", post(routes::orders::cancel::<S>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the default application state with in-memory doubles behind
/// the consumed-service traits.
pub fn create_default_state<S: OrderStore + 'static>(store: S) -> Arc<AppState<S>> {
    let ledger = InMemoryStockLedger::new();
    let directory = InMemoryIdentityDirectory::new();
    let orchestrator = OrderOrchestrator::new(store, ledger.clone(), directory.clone());

    Arc::new(AppState {
        orchestrator,
        ledger,
        directory,
    })
}
