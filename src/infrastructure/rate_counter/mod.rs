//! Windowed request counters backing the rate limiter.
//!
//! Provides a [`RateCounter`] trait with two implementations:
//! - [`RedisCounter`] - shared counters for multi-instance deployments
//! - [`MemoryCounter`] - in-process counters, also the fallback when Redis is unavailable

mod memory_counter;
mod redis_counter;
mod service;

pub use memory_counter::MemoryCounter;
pub use redis_counter::RedisCounter;
pub use service::{CounterError, CounterResult, RateCounter, WindowCount};

#[cfg(test)]
pub use service::MockRateCounter;
