//! Result row of a rotation simulation.

use serde::Serialize;

/// Observed vs configured share of one destination.
///
/// `configured_percentage` is the weight as a fraction of the distribution's
/// total weight, which differs from `configured_weight` only when the rule's
/// secondaries claim more than 100%.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationRow {
    pub url: String,
    pub label: String,
    pub configured_weight: u32,
    pub configured_percentage: f64,
    pub actual_hits: u64,
    pub actual_percentage: f64,
    pub is_primary: bool,
}
