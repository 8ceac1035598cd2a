//! Domain layer containing the decision core.
//!
//! Everything here is independent of HTTP and of any storage engine.
//!
//! # Architecture
//!
//! - [`entities`] - Routing rules and derived values
//! - [`repositories`] - Data access trait definitions
//! - [`rotation`] - Weighted destination selection
//! - [`simulation`] - Repeated-draw verification of configured weights
//!
//! # Redirect Flow
//!
//! 1. HTTP handler admits the request through [`crate::application::services::RateLimiter`]
//! 2. The rule is fetched via [`repositories::RuleRepository`]
//! 3. [`rotation::select`] picks the destination
//! 4. The handler issues the redirect

pub mod entities;
pub mod repositories;
pub mod rotation;
pub mod simulation;
