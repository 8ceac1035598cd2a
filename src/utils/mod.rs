//! Utility functions for slug generation, randomness, and request handling.
//!
//! - [`slug_generator`] - Unbiased slug generation and custom slug validation
//! - [`random`] - Injectable uniform random source for destination draws
//! - [`client_key`] - Client address resolution and rate limit keys

pub mod client_key;
pub mod random;
pub mod slug_generator;
