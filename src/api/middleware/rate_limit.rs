//! Admission control for `/api` routes.

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;
use tracing::info;

use crate::error::{AppError, RATE_LIMIT_LIMIT_HEADER, RATE_LIMIT_REMAINING_HEADER};
use crate::state::AppState;
use crate::utils::client_key::{client_ip, rate_key};

/// Operation name API calls are counted under.
pub const API_OPERATION: &str = "api";

/// Counts the call against the client's `{ip}:api` window.
///
/// Shares the limiter (and its fail-open behavior) with redirects but uses
/// [`AppState::api_policy`]. Admitted responses carry the rate limit headers.
///
/// # Errors
///
/// Returns `429 Too Many Requests` once the client's quota is spent.
///
/// # Example
///
/// ```rust,ignore
/// let api = Router::new()
///     .route("/slugs", post(create_slug_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), rate_limit::layer));
/// ```
pub async fn layer(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = client_ip(req.headers(), addr, state.behind_proxy);
    let key = rate_key(ip, API_OPERATION);

    let decision = state.rate_limiter.check_policy(&key, state.api_policy).await;

    if !decision.allowed {
        info!(%ip, path = %req.uri().path(), "API rate limit exceeded");
        return Err(AppError::RateLimited {
            limit: decision.limit,
            remaining: decision.remaining,
        });
    }

    let mut response = next.run(req).await;
    let headers = response.headers_mut();
    headers.insert(RATE_LIMIT_LIMIT_HEADER, decision.limit.into());
    headers.insert(RATE_LIMIT_REMAINING_HEADER, decision.remaining.into());

    Ok(response)
}
