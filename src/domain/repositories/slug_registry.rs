//! Repository trait for issued slugs.

use crate::domain::entities::SlugNamespace;
use crate::error::AppError;
use crate::utils::slug_generator::SlugError;
use async_trait::async_trait;

/// Authoritative record of slugs already issued, per namespace.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::InMemorySlugRegistry`] - process-local registry
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SlugRegistry: Send + Sync {
    /// Generates `prefix` + `length` random symbols that are free in
    /// `namespace` and records the result in the same step.
    ///
    /// Generation runs against the stored names in place; implementations
    /// must not copy the namespace to do it. The inner result carries the
    /// generator's outcome, e.g. [`SlugError::Exhausted`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the backing store fails.
    async fn allocate(
        &self,
        namespace: SlugNamespace,
        prefix: &str,
        length: usize,
    ) -> Result<Result<String, SlugError>, AppError>;

    /// Records `name` in `namespace`.
    ///
    /// Returns `Ok(false)` if the name was already taken.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the backing store fails.
    async fn reserve(&self, namespace: SlugNamespace, name: &str) -> Result<bool, AppError>;
}
