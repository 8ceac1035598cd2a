//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: The rate counter store is unreachable.
///   Redirects are still served in that state since admission fails open.
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "rate_counter": { "status": "ok", "message": "redis reachable" },
///     "rules": { "status": "ok", "message": "3 rules loaded" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let counter_check = check_rate_counter(&state).await;

    let rules_check = check_rules(&state).await;

    let all_healthy = counter_check.is_ok() && rules_check.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            rate_counter: counter_check,
            rules: rules_check,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

/// Checks that the counter store answers.
async fn check_rate_counter(state: &AppState) -> CheckStatus {
    let backend = state.rate_limiter.backend();

    if state.rate_limiter.health_check().await {
        CheckStatus::ok(format!("{} reachable", backend))
    } else {
        CheckStatus::error(format!("{} unreachable, admitting all requests", backend))
    }
}

/// Reports how many rules are being served.
async fn check_rules(state: &AppState) -> CheckStatus {
    match state.redirect_service.rule_count().await {
        Ok(count) => CheckStatus::ok(format!("{} rules loaded", count)),
        Err(e) => CheckStatus::error(format!("Rule repository error: {}", e)),
    }
}
