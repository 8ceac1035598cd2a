//! Destination resolution and simulation for routing rules.

use std::sync::Arc;

use serde_json::json;
use tracing::error;

use crate::domain::entities::{RoutingRule, SimulationRow};
use crate::domain::repositories::RuleRepository;
use crate::domain::{rotation, simulation};
use crate::error::AppError;
use crate::utils::random::{RandomSource, RngSource};

/// Resolves routing rules to destinations.
///
/// Admission control is the caller's job: handlers consult
/// [`super::RateLimiter`] before calling [`RedirectService::resolve`].
pub struct RedirectService<R: RuleRepository> {
    rule_repository: Arc<R>,
}

impl<R: RuleRepository> RedirectService<R> {
    /// Creates a new redirect service.
    pub fn new(rule_repository: Arc<R>) -> Self {
        Self { rule_repository }
    }

    /// Fetches a rule by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no rule has this id.
    pub async fn get_rule(&self, rule_id: &str) -> Result<RoutingRule, AppError> {
        self.rule_repository
            .find_by_id(rule_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Routing rule not found", json!({ "rule_id": rule_id }))
            })
    }

    /// Picks the destination for one request to `rule_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no rule has this id. Configuration
    /// anomalies never error; they resolve through the engine's fallbacks.
    pub async fn resolve(&self, rule_id: &str) -> Result<String, AppError> {
        let rule = self.get_rule(rule_id).await?;
        Ok(select_destination(&rule))
    }

    /// Runs `iterations` draws against `rule_id` using a thread-local generator.
    ///
    /// The draws run on the blocking pool, so a large run does not stall
    /// redirects served by the same worker.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no rule has this id and
    /// [`AppError::Internal`] if the draw task fails.
    pub async fn simulate(
        &self,
        rule_id: &str,
        iterations: u64,
    ) -> Result<Vec<SimulationRow>, AppError> {
        let rule = self.get_rule(rule_id).await?;

        run_draws(rule_id, move || {
            simulation::simulate(&rule, iterations, &mut RngSource::thread())
        })
        .await
    }

    /// Runs `iterations` draws against `rule_id` using the supplied source.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no rule has this id and
    /// [`AppError::Internal`] if the draw task fails.
    pub async fn simulate_with<S: RandomSource + Send + 'static>(
        &self,
        rule_id: &str,
        iterations: u64,
        mut rng: S,
    ) -> Result<Vec<SimulationRow>, AppError> {
        let rule = self.get_rule(rule_id).await?;

        run_draws(rule_id, move || simulation::simulate(&rule, iterations, &mut rng)).await
    }

    /// Number of rules available for redirects.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the repository fails.
    pub async fn rule_count(&self) -> Result<usize, AppError> {
        self.rule_repository.count().await
    }
}

async fn run_draws<F>(rule_id: &str, draws: F) -> Result<Vec<SimulationRow>, AppError>
where
    F: FnOnce() -> Vec<SimulationRow> + Send + 'static,
{
    tokio::task::spawn_blocking(draws).await.map_err(|e| {
        error!(%rule_id, "Simulation task failed: {}", e);
        AppError::internal(
            "Simulation failed",
            json!({ "rule_id": rule_id, "reason": "simulation_aborted" }),
        )
    })
}

/// Draws with the thread-local generator, which must not live across an
/// `.await` since it is not `Send`.
fn select_destination(rule: &RoutingRule) -> String {
    rotation::select(rule, &mut RngSource::thread()).to_string()
}
