//! HTTP API server with observability for the shopping cart.
//!
//! Exposes the cart's read view and its three mutators as REST endpoints,
//! with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use domain::{CartService, ProductCatalog, TracingNotifier};
use kv_store::KvStore;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::cart::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<C, S>(state: Arc<AppState<C, S>>, metrics_handle: PrometheusHandle) -> Router
where
    C: ProductCatalog + 'static,
    S: KvStore + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/cart", get(routes::cart::get::<C, S>))
        .route(
            "/cart/items/{product_id}",
            post(routes::cart::add::<C, S>)
                .put(routes::cart::update_amount::<C, S>)
                .delete(routes::cart::remove::<C, S>),
        )
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

/// Creates the application state, restoring the cart persisted in `store`.
pub async fn create_state<C, S>(catalog: C, store: S) -> Arc<AppState<C, S>>
where
    C: ProductCatalog + 'static,
    S: KvStore + 'static,
{
    let cart_service = CartService::load(catalog, store, TracingNotifier).await;
    Arc::new(AppState { cart_service })
}
