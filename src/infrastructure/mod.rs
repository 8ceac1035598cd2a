//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`rate_counter`] - Windowed request counters (Redis and in-memory)
//! - [`persistence`] - In-memory rule and slug repositories

pub mod persistence;
pub mod rate_counter;
