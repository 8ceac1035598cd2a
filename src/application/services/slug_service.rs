//! Slug allocation for new routing rules and projects.

use std::sync::Arc;

use serde_json::json;
use tracing::{error, info};

use crate::domain::entities::SlugNamespace;
use crate::domain::repositories::SlugRegistry;
use crate::error::AppError;
use crate::utils::slug_generator::{SlugError, validate_custom_slug};

/// Issues slugs that are unique within their namespace.
///
/// Generated slugs are picked and recorded by the registry in one step.
/// Custom slugs are reserved as given and a taken name is a conflict.
pub struct SlugService<S: SlugRegistry> {
    registry: Arc<S>,
}

impl<S: SlugRegistry> SlugService<S> {
    /// Creates a new slug service.
    pub fn new(registry: Arc<S>) -> Self {
        Self { registry }
    }

    /// Generates and records `prefix` + `length` random symbols.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if no free slug was found within the
    /// attempt budget or the entropy source failed, and any error the
    /// registry reports.
    pub async fn generate(
        &self,
        namespace: SlugNamespace,
        prefix: &str,
        length: usize,
    ) -> Result<String, AppError> {
        let outcome = self.registry.allocate(namespace, prefix, length).await?;

        let slug = outcome.map_err(|e| {
            if let SlugError::Exhausted { attempts } = e {
                error!(
                    %namespace,
                    prefix,
                    length,
                    attempts,
                    "Slug space exhausted; namespace needs attention"
                );
            }
            AppError::from(e)
        })?;

        info!(%namespace, slug = %slug, "Issued slug");

        Ok(slug)
    }

    /// Validates and reserves an operator-supplied slug.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the slug breaks the custom slug
    /// rules and [`AppError::Conflict`] if it is already taken.
    pub async fn claim_custom(&self, namespace: SlugNamespace, slug: &str) -> Result<String, AppError> {
        validate_custom_slug(slug)?;
        self.reserve(namespace, slug).await?;
        info!(%namespace, slug, "Claimed custom slug");

        Ok(slug.to_string())
    }

    async fn reserve(&self, namespace: SlugNamespace, slug: &str) -> Result<(), AppError> {
        if self.registry.reserve(namespace, slug).await? {
            Ok(())
        } else {
            Err(AppError::conflict(
                "Slug already exists in this namespace",
                json!({ "slug": slug, "namespace": namespace.as_str() }),
            ))
        }
    }
}
