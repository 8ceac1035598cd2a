//! DTOs for the rule simulation endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::SimulationRow;

/// Request to replay a rule's rotation many times, at most a million draws.
#[derive(Debug, Deserialize, Validate)]
pub struct SimulateRequest {
    #[validate(range(min = 1, max = 1000000, message = "iterations must be between 1 and 1000000"))]
    pub iterations: u64,
}

/// Observed distribution of a simulation run, one row per destination.
#[derive(Debug, Serialize)]
pub struct SimulateResponse {
    pub rule_id: String,
    pub iterations: u64,
    pub rows: Vec<SimulationRow>,
}
