//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{rule_id}`  - Rotating redirect (per-client `redirect` quota)
//! - `GET  /health`     - Health check: rate counter store, loaded rules
//! - `/api/*`           - Simulation and slug allocation (per-client `api` quota)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Fixed-window counters, fail-open on store errors
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{rate_limit, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// The redirect handler runs its own admission check so that it can attach
/// rate limit headers to the redirect itself.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let api_router = api::routes::api_routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        rate_limit::layer,
    ));

    let router = Router::new()
        .route("/health", get(health_handler))
        .route("/{rule_id}", get(redirect_handler))
        .nest("/api", api_router)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
