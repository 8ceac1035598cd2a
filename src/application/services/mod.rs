//! Business logic services for the application layer.

pub mod rate_limiter;
pub mod redirect_service;
pub mod slug_service;

pub use rate_limiter::{RateDecision, RateLimiter, RatePolicy};
pub use redirect_service::RedirectService;
pub use slug_service::SlugService;
