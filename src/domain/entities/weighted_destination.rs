//! Per-evaluation view of a destination and its weight.

use serde::Serialize;

/// A destination paired with its integer weight.
///
/// Built fresh from a [`super::RoutingRule`] on every evaluation and borrowed
/// from it; never stored and never shared between requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeightedDestination<'a> {
    pub url: &'a str,
    pub weight: u32,
    pub is_primary: bool,
}

impl<'a> WeightedDestination<'a> {
    pub fn primary(url: &'a str, weight: u32) -> Self {
        Self {
            url,
            weight,
            is_primary: true,
        }
    }

    pub fn secondary(url: &'a str, weight: u32) -> Self {
        Self {
            url,
            weight,
            is_primary: false,
        }
    }
}
