//! In-memory repository implementations.
//!
//! Storage engines are outside this service; these implementations hold the
//! rules and issued slugs handed to it by the authoring side.
//!
//! # Repositories
//!
//! - [`InMemoryRuleRepository`] - Routing rules, optionally loaded from a JSON file
//! - [`InMemorySlugRegistry`] - Issued slugs per namespace

pub mod memory_rule_repository;
pub mod memory_slug_registry;

pub use memory_rule_repository::InMemoryRuleRepository;
pub use memory_slug_registry::InMemorySlugRegistry;
