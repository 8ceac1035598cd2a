//! # Redirect Rotator
//!
//! Weighted redirect rotation with per-client rate limiting, built with Axum.
//!
//! A routing rule sends each visitor to its primary destination or, when
//! rotation is enabled, to one of its secondary destinations chosen by
//! percentage weight. Requests are admitted through fixed-window counters
//! kept in Redis or in process memory.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Routing rules, weighted selection, simulation
//! - **Application Layer** ([`application`]) - Redirect, slug, and admission services
//! - **Infrastructure Layer** ([`infrastructure`]) - Counter stores and in-memory registries
//! - **API Layer** ([`api`]) - HTTP handlers, DTOs, and middleware
//!
//! ## Quick Start
//!
//! ```bash
//! export RULES_FILE="rules.json"
//! export REDIS_URL="redis://localhost:6379"  # Optional
//!
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{RateLimiter, RatePolicy, RedirectService, SlugService};
    pub use crate::domain::entities::{RoutingRule, SimulationRow, SlugNamespace};
    pub use crate::domain::rotation::select;
    pub use crate::domain::simulation::simulate;
    pub use crate::error::AppError;
    pub use crate::state::AppState;
    pub use crate::utils::random::{RandomSource, RngSource};
}
