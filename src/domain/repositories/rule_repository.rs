//! Repository trait for routing rule lookups.

use crate::domain::entities::RoutingRule;
use crate::error::AppError;
use async_trait::async_trait;

/// Read access to the routing rules the redirect path evaluates.
///
/// Rule authoring lives outside this service; the repository only hands out
/// fully materialized rules.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::InMemoryRuleRepository`] - rules loaded at startup
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RuleRepository: Send + Sync {
    /// Finds a rule by its identifier.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(RoutingRule))` if found
    /// - `Ok(None)` if not found
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the backing store fails.
    async fn find_by_id(&self, id: &str) -> Result<Option<RoutingRule>, AppError>;

    /// Counts the rules available.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the backing store fails.
    async fn count(&self) -> Result<usize, AppError>;
}
