//! Repository trait definitions for the domain layer.
//!
//! These traits abstract the storage the decision core reads from. Storage
//! engines are external; the infrastructure layer provides in-memory
//! implementations and tests use `mockall` mocks.
//!
//! # Available Repositories
//!
//! - [`RuleRepository`] - Routing rule lookups
//! - [`SlugRegistry`] - Issued slugs per namespace

pub mod rule_repository;
pub mod slug_registry;

pub use rule_repository::RuleRepository;
pub use slug_registry::SlugRegistry;

#[cfg(test)]
pub use rule_repository::MockRuleRepository;
#[cfg(test)]
pub use slug_registry::MockSlugRegistry;
