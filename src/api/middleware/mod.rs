//! HTTP middleware for request processing and protection.
//!
//! Provides API admission control and request tracing.

pub mod rate_limit;
pub mod tracing;
