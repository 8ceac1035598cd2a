//! Application layer services orchestrating the decision core.
//!
//! Services consume repository and counter traits and provide a clean API
//! for HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::rate_limiter::RateLimiter`] - Windowed admission control with fail-open
//! - [`services::redirect_service::RedirectService`] - Destination resolution and simulation
//! - [`services::slug_service::SlugService`] - Namespace-unique slug allocation

pub mod services;
