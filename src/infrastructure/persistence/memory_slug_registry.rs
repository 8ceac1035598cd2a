//! In-memory registry of issued slugs.

use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::HashSet;

use crate::domain::entities::SlugNamespace;
use crate::domain::repositories::SlugRegistry;
use crate::error::AppError;
use crate::utils::slug_generator::{SlugError, generate_unique};

/// Issued slugs per namespace, held in process memory.
///
/// `allocate` and `reserve` hold the namespace entry's write lock while they
/// run, so two concurrent creations can never record the same name.
#[derive(Default)]
pub struct InMemorySlugRegistry {
    names: DashMap<SlugNamespace, HashSet<String>>,
}

impl InMemorySlugRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds `namespace` with already-issued names, e.g. ids of loaded rules.
    pub fn with_names(self, namespace: SlugNamespace, names: impl IntoIterator<Item = String>) -> Self {
        self.names.entry(namespace).or_default().extend(names);
        self
    }

    /// Whether `name` has been issued in `namespace`.
    pub fn contains(&self, namespace: SlugNamespace, name: &str) -> bool {
        self.names
            .get(&namespace)
            .is_some_and(|names| names.contains(name))
    }

    /// Number of names issued in `namespace`.
    pub fn len(&self, namespace: SlugNamespace) -> usize {
        self.names.get(&namespace).map_or(0, |names| names.len())
    }
}

#[async_trait]
impl SlugRegistry for InMemorySlugRegistry {
    async fn allocate(
        &self,
        namespace: SlugNamespace,
        prefix: &str,
        length: usize,
    ) -> Result<Result<String, SlugError>, AppError> {
        let mut names = self.names.entry(namespace).or_default();

        let outcome = generate_unique(&names, prefix, length).inspect(|slug| {
            names.insert(slug.clone());
        });

        Ok(outcome)
    }

    async fn reserve(&self, namespace: SlugNamespace, name: &str) -> Result<bool, AppError> {
        Ok(self
            .names
            .entry(namespace)
            .or_default()
            .insert(name.to_string()))
    }
}
