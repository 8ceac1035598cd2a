//! In-memory routing rule repository.

use async_trait::async_trait;
use dashmap::DashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::domain::entities::RoutingRule;
use crate::domain::repositories::RuleRepository;
use crate::error::AppError;

/// Rule repository backed by a concurrent map.
///
/// Rules are supplied by the authoring side, typically as a JSON array
/// loaded once at startup via [`InMemoryRuleRepository::load_from_file`].
/// Lookups return a clone so every evaluation works on its own value.
#[derive(Default)]
pub struct InMemoryRuleRepository {
    rules: DashMap<String, Arc<RoutingRule>>,
}

impl InMemoryRuleRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a repository from rules, later duplicates replacing earlier ones.
    pub fn from_rules(rules: impl IntoIterator<Item = RoutingRule>) -> Self {
        let repository = Self::new();
        for rule in rules {
            repository.insert(rule);
        }
        repository
    }

    /// Loads rules from a JSON array file.
    ///
    /// Rules with authoring issues are still loaded (the engine degrades
    /// gracefully) but each issue is logged.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a JSON array of rules.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read rules file {}", path.display()))?;

        let rules: Vec<RoutingRule> = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse rules file {}", path.display()))?;

        for rule in &rules {
            for issue in rule.validate() {
                warn!(rule_id = %rule.id, "Rule configuration issue: {}", issue);
            }
        }

        let repository = Self::from_rules(rules);
        info!(
            "Loaded {} routing rules from {}",
            repository.rules.len(),
            path.display()
        );

        Ok(repository)
    }

    /// Inserts or replaces a rule.
    pub fn insert(&self, rule: RoutingRule) {
        self.rules.insert(rule.id.clone(), Arc::new(rule));
    }

    /// Identifiers of every stored rule.
    pub fn ids(&self) -> Vec<String> {
        self.rules.iter().map(|entry| entry.key().clone()).collect()
    }
}

#[async_trait]
impl RuleRepository for InMemoryRuleRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<RoutingRule>, AppError> {
        Ok(self.rules.get(id).map(|rule| rule.as_ref().clone()))
    }

    async fn count(&self) -> Result<usize, AppError> {
        Ok(self.rules.len())
    }
}
