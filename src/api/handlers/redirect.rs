//! Handler for rule redirects.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;
use std::net::SocketAddr;
use tracing::{debug, error, info};

use crate::error::{AppError, RATE_LIMIT_LIMIT_HEADER, RATE_LIMIT_REMAINING_HEADER};
use crate::state::AppState;
use crate::utils::client_key::{client_ip, rate_key};

/// Operation name the redirect quota is counted under.
pub const REDIRECT_OPERATION: &str = "redirect";

/// Redirects a rule id to one of its destinations.
///
/// # Endpoint
///
/// `GET /{rule_id}`
///
/// # Request Flow
///
/// 1. Resolve the client address (peer socket, or proxy headers when trusted)
/// 2. Count the request against the `{ip}:redirect` window
/// 3. Load the rule and pick a destination
/// 4. Return 307 Temporary Redirect
///
/// Both the redirect and the 429 response carry `X-RateLimit-Limit` and
/// `X-RateLimit-Remaining`.
///
/// # Errors
///
/// Returns 429 Too Many Requests when the client's quota is spent.
/// Returns 404 Not Found if no rule has this id.
/// Returns 500 Internal Server Error if the chosen destination cannot be
/// sent as a `Location` header.
pub async fn redirect_handler(
    Path(rule_id): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<impl IntoResponse, AppError> {
    let ip = client_ip(&headers, addr, state.behind_proxy);
    let key = rate_key(ip, REDIRECT_OPERATION);

    let decision = state
        .rate_limiter
        .check_policy(&key, state.redirect_policy)
        .await;

    if !decision.allowed {
        info!(%ip, %rule_id, "Redirect rate limit exceeded");
        return Err(AppError::RateLimited {
            limit: decision.limit,
            remaining: decision.remaining,
        });
    }

    let destination = state.redirect_service.resolve(&rule_id).await?;
    let location = HeaderValue::from_str(&destination).map_err(|e| {
        error!(
            %rule_id,
            destination = ?destination,
            "Destination is not a valid Location header: {}",
            e
        );
        AppError::internal(
            "Destination cannot be redirected to",
            json!({ "rule_id": rule_id, "reason": "invalid_destination" }),
        )
    })?;

    debug!(%rule_id, %destination, "Redirecting");

    let mut response_headers = HeaderMap::new();
    response_headers.insert(header::LOCATION, location);
    response_headers.insert(RATE_LIMIT_LIMIT_HEADER, decision.limit.into());
    response_headers.insert(RATE_LIMIT_REMAINING_HEADER, decision.remaining.into());

    Ok((StatusCode::TEMPORARY_REDIRECT, response_headers))
}
