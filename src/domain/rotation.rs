//! Weighted destination selection.
//!
//! A [`Distribution`] is derived from a [`RoutingRule`] on every evaluation:
//! usable secondaries (non-empty URL, weight > 0) sorted by `order_index`,
//! preceded by the primary when it keeps residual weight. A single uniform
//! draw is then walked over the cumulative shares.
//!
//! Everything here is pure apart from the injected [`RandomSource`]: no I/O,
//! no logging, no shared state.

use crate::domain::entities::{RoutingRule, TOTAL_WEIGHT_PERCENT, WeightedDestination};
use crate::utils::random::RandomSource;

/// Weighted destinations of one rule in walk order.
///
/// Never empty. When rotation is off, or nothing but the primary is usable,
/// the distribution is *fixed*: it holds only the primary and draws consume
/// no randomness.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution<'a> {
    destinations: Vec<WeightedDestination<'a>>,
    total_weight: u32,
    fixed: bool,
}

impl<'a> Distribution<'a> {
    /// Derives the distribution for a rule without touching it.
    pub fn for_rule(rule: &'a RoutingRule) -> Self {
        let primary = rule.primary_destination.as_str();

        if !rule.rotation_enabled {
            return Self::primary_only(primary);
        }

        let mut usable: Vec<_> = rule
            .secondary_destinations
            .iter()
            .filter(|s| !s.destination_url.is_empty() && s.weight_percent > 0)
            .collect();

        if usable.is_empty() {
            return Self::primary_only(primary);
        }

        // Stable: equal order_index keeps configuration order.
        usable.sort_by_key(|s| s.order_index);

        let claimed = usable
            .iter()
            .fold(0u32, |acc, s| acc.saturating_add(s.weight_percent));
        let primary_weight = TOTAL_WEIGHT_PERCENT.saturating_sub(claimed);

        let mut destinations = Vec::with_capacity(usable.len() + 1);
        if primary_weight > 0 {
            destinations.push(WeightedDestination::primary(primary, primary_weight));
        }
        destinations.extend(
            usable
                .iter()
                .map(|s| WeightedDestination::secondary(&s.destination_url, s.weight_percent)),
        );

        let total_weight = destinations
            .iter()
            .fold(0u32, |acc, d| acc.saturating_add(d.weight));

        if total_weight == 0 {
            return Self::primary_only(primary);
        }

        Self {
            destinations,
            total_weight,
            fixed: false,
        }
    }

    fn primary_only(primary: &'a str) -> Self {
        Self {
            destinations: vec![WeightedDestination::primary(primary, TOTAL_WEIGHT_PERCENT)],
            total_weight: TOTAL_WEIGHT_PERCENT,
            fixed: true,
        }
    }

    pub fn destinations(&self) -> &[WeightedDestination<'a>] {
        &self.destinations
    }

    pub fn total_weight(&self) -> u32 {
        self.total_weight
    }

    /// True when every draw returns the primary without consuming randomness.
    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    /// Index of the destination selected by `r`, a value in `[0, 1)`.
    ///
    /// Returns the first destination whose cumulative share exceeds `r`. If
    /// rounding leaves the walk short of `r`, the last destination wins.
    pub fn pick_index(&self, r: f64) -> usize {
        let total = f64::from(self.total_weight);
        let mut cumulative = 0.0;

        for (index, destination) in self.destinations.iter().enumerate() {
            cumulative += f64::from(destination.weight) / total;
            if r < cumulative {
                return index;
            }
        }

        self.destinations.len() - 1
    }

    /// Draws one destination index from `rng`.
    pub fn draw_index<R: RandomSource + ?Sized>(&self, rng: &mut R) -> usize {
        if self.fixed {
            return 0;
        }
        self.pick_index(rng.next_unit())
    }

    /// Draws one destination URL from `rng`.
    pub fn draw<R: RandomSource + ?Sized>(&self, rng: &mut R) -> &'a str {
        self.destinations[self.draw_index(rng)].url
    }
}

/// Selects the destination URL for one request.
///
/// Always resolves to a URL configured on the rule; configuration anomalies
/// (weights above 100%, every secondary filtered out) fall back to the
/// documented residual and primary rules instead of failing.
pub fn select<'a, R: RandomSource + ?Sized>(rule: &'a RoutingRule, rng: &mut R) -> &'a str {
    Distribution::for_rule(rule).draw(rng)
}
