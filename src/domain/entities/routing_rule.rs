//! Routing rule entity: one primary destination plus weighted secondaries.

use serde::{Deserialize, Serialize};
use url::Url;

/// Maximum total weight, in percent, shared between secondaries.
pub const TOTAL_WEIGHT_PERCENT: u32 = 100;

/// A redirect target configuration.
///
/// The primary destination receives whatever probability the secondaries do
/// not claim (`100 - Σ weight_percent`, clamped at zero). When
/// `rotation_enabled` is false every request goes to the primary.
///
/// Rules are treated as immutable values during evaluation: the rotation
/// engine filters unusable entries on the fly and never rewrites the stored
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingRule {
    pub id: String,
    pub primary_destination: String,
    #[serde(default)]
    pub secondary_destinations: Vec<SecondaryDestination>,
    #[serde(default)]
    pub rotation_enabled: bool,
}

/// A weighted alternative destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondaryDestination {
    pub destination_url: String,
    pub weight_percent: u32,
    #[serde(default)]
    pub order_index: i32,
}

/// Authoring-time problems found in a rule.
///
/// None of these stop a rule from being evaluated; the engine degrades to
/// its fallbacks. They exist so the authoring side can refuse or flag
/// configurations before they go live.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleIssue {
    #[error("secondary weights sum to {sum}%, more than 100%")]
    WeightSumExceeded { sum: u32 },

    #[error("secondary '{url}' has weight {weight}%, more than 100%")]
    WeightOutOfRange { url: String, weight: u32 },

    #[error("destination '{url}' is not an absolute http(s) URL")]
    InvalidDestination { url: String },
}

impl RoutingRule {
    /// Creates a rule with rotation disabled and no secondaries.
    pub fn new(id: impl Into<String>, primary_destination: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            primary_destination: primary_destination.into(),
            secondary_destinations: Vec::new(),
            rotation_enabled: false,
        }
    }

    /// Appends a secondary destination, placing it after existing ones.
    pub fn with_secondary(mut self, destination_url: impl Into<String>, weight_percent: u32) -> Self {
        let order_index = self
            .secondary_destinations
            .iter()
            .map(|s| s.order_index + 1)
            .max()
            .unwrap_or(0);

        self.secondary_destinations.push(SecondaryDestination {
            destination_url: destination_url.into(),
            weight_percent,
            order_index,
        });
        self
    }

    /// Enables or disables rotation.
    pub fn with_rotation(mut self, enabled: bool) -> Self {
        self.rotation_enabled = enabled;
        self
    }

    /// Sum of all configured secondary weights, usable or not.
    pub fn secondary_weight_sum(&self) -> u32 {
        self.secondary_destinations
            .iter()
            .fold(0u32, |acc, s| acc.saturating_add(s.weight_percent))
    }

    /// Reports authoring problems without modifying the rule.
    ///
    /// Empty secondary URLs are not reported: they are a legitimate way to
    /// park a slot and are ignored at evaluation time.
    pub fn validate(&self) -> Vec<RuleIssue> {
        let mut issues = Vec::new();

        if !is_http_url(&self.primary_destination) {
            issues.push(RuleIssue::InvalidDestination {
                url: self.primary_destination.clone(),
            });
        }

        for secondary in &self.secondary_destinations {
            if secondary.weight_percent > TOTAL_WEIGHT_PERCENT {
                issues.push(RuleIssue::WeightOutOfRange {
                    url: secondary.destination_url.clone(),
                    weight: secondary.weight_percent,
                });
            }

            if !secondary.destination_url.is_empty() && !is_http_url(&secondary.destination_url) {
                issues.push(RuleIssue::InvalidDestination {
                    url: secondary.destination_url.clone(),
                });
            }
        }

        let sum = self.secondary_weight_sum();
        if sum > TOTAL_WEIGHT_PERCENT {
            issues.push(RuleIssue::WeightSumExceeded { sum });
        }

        issues
    }
}

/// Absolute http(s) URL that can be sent verbatim in a `Location` header.
///
/// `Url::parse` drops tabs and newlines, so control characters are checked
/// on the raw input.
fn is_http_url(input: &str) -> bool {
    !input.chars().any(char::is_control)
        && Url::parse(input).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}
