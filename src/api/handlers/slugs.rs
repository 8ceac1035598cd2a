//! Handler for slug allocation.

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::slugs::{SlugRequest, SlugResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Reserves a new slug in a namespace.
///
/// # Endpoint
///
/// `POST /api/slugs`
///
/// # Request Body
///
/// ```json
/// { "namespace": "project", "prefix": "p-", "length": 8 }
/// ```
///
/// or, to claim a chosen slug:
///
/// ```json
/// { "namespace": "link", "custom": "spring-sale" }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request on an invalid prefix, length, or custom slug.
/// Returns 409 Conflict if the slug is already taken.
/// Returns 500 Internal Server Error with `details.reason = "slug_exhausted"`
/// when no free slug was found.
pub async fn create_slug_handler(
    State(state): State<AppState>,
    Json(payload): Json<SlugRequest>,
) -> Result<(StatusCode, Json<SlugResponse>), AppError> {
    payload.validate()?;

    let slug = match payload.custom {
        Some(custom) => {
            state
                .slug_service
                .claim_custom(payload.namespace, &custom)
                .await?
        }
        None => {
            state
                .slug_service
                .generate(payload.namespace, &payload.prefix, payload.length)
                .await?
        }
    };

    Ok((
        StatusCode::CREATED,
        Json(SlugResponse {
            slug,
            namespace: payload.namespace,
        }),
    ))
}
