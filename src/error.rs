//! HTTP-facing error type.
//!
//! Every failure reaching a handler is converted into [`AppError`], which
//! renders as `{"error": {"code", "message", "details"}}` with a matching
//! status code.

use axum::{
    Json,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::utils::slug_generator::SlugError;

pub const RATE_LIMIT_LIMIT_HEADER: &str = "x-ratelimit-limit";
pub const RATE_LIMIT_REMAINING_HEADER: &str = "x-ratelimit-remaining";

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serialized error payload.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String, details: Value },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    #[error("{message}")]
    Conflict { message: String, details: Value },

    #[error("Too many requests")]
    RateLimited { limit: u64, remaining: u64 },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Status code this error renders with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converts into the serializable payload.
    pub fn to_error_info(&self) -> ErrorInfo {
        let message = self.to_string();
        match self {
            AppError::Validation { details, .. } => ErrorInfo {
                code: "validation_error",
                message,
                details: details.clone(),
            },
            AppError::NotFound { details, .. } => ErrorInfo {
                code: "not_found",
                message,
                details: details.clone(),
            },
            AppError::Conflict { details, .. } => ErrorInfo {
                code: "conflict",
                message,
                details: details.clone(),
            },
            AppError::RateLimited { limit, remaining } => ErrorInfo {
                code: "rate_limited",
                message,
                details: json!({ "limit": limit, "remaining": remaining }),
            },
            AppError::Internal { details, .. } => ErrorInfo {
                code: "internal_error",
                message,
                details: details.clone(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        let mut response = (status, Json(body)).into_response();

        if let AppError::RateLimited { limit, remaining } = self {
            let headers = response.headers_mut();
            headers.insert(RATE_LIMIT_LIMIT_HEADER, HeaderValue::from(limit));
            headers.insert(RATE_LIMIT_REMAINING_HEADER, HeaderValue::from(remaining));
        }

        response
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&errors).unwrap_or_else(|_| json!({}));
        AppError::bad_request("Request validation failed", details)
    }
}

impl From<SlugError> for AppError {
    fn from(error: SlugError) -> Self {
        match error {
            SlugError::Exhausted { attempts } => AppError::internal(
                "Failed to generate unique slug",
                json!({ "reason": "slug_exhausted", "attempts": attempts }),
            ),
            SlugError::InvalidCustom(message) => AppError::bad_request(message, json!({})),
            SlugError::ZeroLength => {
                AppError::bad_request("Slug length must be at least 1", json!({}))
            }
            SlugError::Entropy(reason) => AppError::internal(
                "Failed to generate unique slug",
                json!({ "reason": reason }),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::bad_request("x", json!({})).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::RateLimited {
                limit: 100,
                remaining: 0
            }
            .status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[test]
    fn test_rate_limited_response_carries_headers() {
        let response = AppError::RateLimited {
            limit: 100,
            remaining: 0,
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[RATE_LIMIT_LIMIT_HEADER], "100");
        assert_eq!(response.headers()[RATE_LIMIT_REMAINING_HEADER], "0");
    }

    #[test]
    fn test_slug_exhaustion_maps_to_internal() {
        let error: AppError = SlugError::Exhausted { attempts: 10 }.into();
        let info = error.to_error_info();

        assert_eq!(info.code, "internal_error");
        assert_eq!(info.details["reason"], "slug_exhausted");
    }

    #[test]
    fn test_invalid_custom_slug_maps_to_validation() {
        let error: AppError = SlugError::InvalidCustom("This slug is reserved".to_string()).into();
        assert!(matches!(error, AppError::Validation { .. }));
        assert_eq!(error.to_string(), "This slug is reserved");
    }
}
