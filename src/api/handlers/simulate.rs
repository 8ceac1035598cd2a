//! Handler for rule simulation.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::info;
use validator::Validate;

use crate::api::dto::simulate::{SimulateRequest, SimulateResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Replays a rule's rotation and reports the observed split.
///
/// # Endpoint
///
/// `POST /api/rules/{rule_id}/simulate`
///
/// # Request Body
///
/// ```json
/// { "iterations": 10000 }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "rule_id": "spring-sale",
///   "iterations": 10000,
///   "rows": [
///     {
///       "url": "https://a.example",
///       "label": "primary",
///       "configured_weight": 60,
///       "configured_percentage": 60.0,
///       "actual_hits": 6012,
///       "actual_percentage": 60.12,
///       "is_primary": true
///     }
///   ]
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if `iterations` is outside 1..=1000000.
/// Returns 404 Not Found if no rule has this id.
pub async fn simulate_handler(
    Path(rule_id): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<SimulateRequest>,
) -> Result<Json<SimulateResponse>, AppError> {
    payload.validate()?;

    let rows = state
        .redirect_service
        .simulate(&rule_id, payload.iterations)
        .await?;

    info!(%rule_id, iterations = payload.iterations, "Simulated rule");

    Ok(Json(SimulateResponse {
        rule_id,
        iterations: payload.iterations,
        rows,
    }))
}
