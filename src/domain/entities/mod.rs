//! Core data structures of the redirect decision core.
//!
//! - [`RoutingRule`] - primary destination plus weighted secondaries
//! - [`WeightedDestination`] - per-evaluation weighted view of a rule
//! - [`SimulationRow`] - configured vs observed share of a destination
//! - [`SlugNamespace`] - uniqueness scope for generated identifiers

pub mod routing_rule;
pub mod simulation_row;
pub mod slug_namespace;
pub mod weighted_destination;

pub use routing_rule::{RoutingRule, RuleIssue, SecondaryDestination, TOTAL_WEIGHT_PERCENT};
pub use simulation_row::SimulationRow;
pub use slug_namespace::SlugNamespace;
pub use weighted_destination::WeightedDestination;
