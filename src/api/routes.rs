//! API route configuration.
//!
//! Every API endpoint is counted against the caller's `api` quota via
//! [`crate::api::middleware::rate_limit`].

use crate::api::handlers::{create_slug_handler, simulate_handler};
use crate::state::AppState;
use axum::{Router, routing::post};

/// All API routes.
///
/// # Endpoints
///
/// - `POST /rules/{rule_id}/simulate` - Replay a rule's rotation and report the split
/// - `POST /slugs`                    - Reserve a generated or custom slug
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/rules/{rule_id}/simulate", post(simulate_handler))
        .route("/slugs", post(create_slug_handler))
}
