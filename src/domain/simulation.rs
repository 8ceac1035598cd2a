//! Repeated-draw verification of a rule's configured weights.
//!
//! Uses the exact [`Distribution`] and draw routine of the live path so that
//! what an operator observes here is what production traffic will see.

use crate::domain::entities::{RoutingRule, SimulationRow};
use crate::domain::rotation::Distribution;
use crate::utils::random::RandomSource;

/// Runs `iterations` independent draws against `rule` and reports per
/// destination hit counts. Zero iterations yields an empty report.
pub fn simulate<R: RandomSource + ?Sized>(
    rule: &RoutingRule,
    iterations: u64,
    rng: &mut R,
) -> Vec<SimulationRow> {
    if iterations == 0 {
        return Vec::new();
    }

    let distribution = Distribution::for_rule(rule);
    let mut hits = vec![0u64; distribution.destinations().len()];

    for _ in 0..iterations {
        hits[distribution.draw_index(rng)] += 1;
    }

    let total_weight = f64::from(distribution.total_weight());
    let mut secondary_position = 0;

    distribution
        .destinations()
        .iter()
        .zip(hits)
        .map(|(destination, actual_hits)| {
            let label = if destination.is_primary {
                "primary".to_string()
            } else {
                secondary_position += 1;
                format!("secondary #{secondary_position}")
            };

            SimulationRow {
                url: destination.url.to_string(),
                label,
                configured_weight: destination.weight,
                configured_percentage: f64::from(destination.weight) / total_weight * 100.0,
                actual_hits,
                actual_percentage: actual_hits as f64 / iterations as f64 * 100.0,
                is_primary: destination.is_primary,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::random::{FixedSequence, RngSource};

    #[test]
    fn test_zero_iterations_is_empty() {
        let rule = RoutingRule::new("r", "https://a.example");
        assert!(simulate(&rule, 0, &mut RngSource::seeded(1)).is_empty());
    }

    #[test]
    fn test_disabled_rotation_reports_primary_only() {
        let rule = RoutingRule::new("r", "https://a.example").with_secondary("https://b.example", 50);

        let rows = simulate(&rule, 500, &mut RngSource::seeded(1));
        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_primary);
        assert_eq!(rows[0].actual_hits, 500);
        assert_eq!(rows[0].actual_percentage, 100.0);
        assert_eq!(rows[0].label, "primary");
    }

    #[test]
    fn test_rows_follow_walk_order_and_labels() {
        let rule = RoutingRule::new("r", "https://a.example")
            .with_secondary("https://b.example", 25)
            .with_secondary("https://c.example", 25)
            .with_rotation(true);

        let rows = simulate(&rule, 4, &mut FixedSequence::new(vec![0.1, 0.6, 0.8, 0.3]));

        let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["primary", "secondary #1", "secondary #2"]);

        let hits: Vec<u64> = rows.iter().map(|r| r.actual_hits).collect();
        assert_eq!(hits, vec![2, 1, 1]);
        assert_eq!(rows[0].configured_weight, 50);
        assert_eq!(rows[1].configured_percentage, 25.0);
    }

    #[test]
    fn test_hits_sum_to_iterations_and_converge() {
        let rule = RoutingRule::new("r", "https://a.example")
            .with_secondary("https://b.example", 40)
            .with_rotation(true);

        let rows = simulate(&rule, 10_000, &mut RngSource::seeded(5));

        assert_eq!(rows.iter().map(|r| r.actual_hits).sum::<u64>(), 10_000);
        for row in &rows {
            assert!(
                (row.actual_percentage - row.configured_percentage).abs() < 2.5,
                "{} observed {} vs configured {}",
                row.url,
                row.actual_percentage,
                row.configured_percentage
            );
        }
    }

    #[test]
    fn test_matches_live_selection_for_same_seed() {
        let rule = RoutingRule::new("r", "https://a.example")
            .with_secondary("https://b.example", 30)
            .with_secondary("https://c.example", 30)
            .with_rotation(true);

        let mut live = RngSource::seeded(77);
        let mut b_hits = 0;
        for _ in 0..1_000 {
            if crate::domain::rotation::select(&rule, &mut live) == "https://b.example" {
                b_hits += 1;
            }
        }

        let rows = simulate(&rule, 1_000, &mut RngSource::seeded(77));
        let b_row = rows.iter().find(|r| r.url == "https://b.example").unwrap();
        assert_eq!(b_row.actual_hits, b_hits);
    }
}
