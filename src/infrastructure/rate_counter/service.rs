//! Rate counter trait and error types.

use async_trait::async_trait;
use std::time::Duration;

/// Errors that can occur while talking to a counter store.
#[derive(Debug, thiserror::Error)]
pub enum CounterError {
    #[error("Counter connection error: {0}")]
    Connection(String),

    #[error("Counter operation error: {0}")]
    Operation(String),
}

/// Result type for counter operations.
pub type CounterResult<T> = Result<T, CounterError>;

/// Outcome of one increment-and-check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowCount {
    /// Requests counted in the current window, this one included.
    pub count: u64,
    /// `count <= max_requests`.
    pub allowed: bool,
}

impl WindowCount {
    pub fn new(count: u64, max_requests: u64) -> Self {
        Self {
            count,
            allowed: count <= max_requests,
        }
    }
}

/// Per-key windowed request counter.
///
/// Implementations must make increment-and-check a single atomic step per
/// key: concurrent callers for the same key never lose or double-count an
/// increment. Denied requests are still counted.
///
/// # Implementations
///
/// - [`crate::infrastructure::rate_counter::MemoryCounter`] - in-process, sharded map
/// - [`crate::infrastructure::rate_counter::RedisCounter`] - shared across instances
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RateCounter: Send + Sync {
    /// Counts one request for `key` in a window of length `window`.
    ///
    /// The window opens on the first request after the previous one expired.
    ///
    /// # Errors
    ///
    /// Returns [`CounterError`] when the backing store is unreachable or
    /// rejects the operation. Callers decide how to degrade.
    async fn increment_and_check(
        &self,
        key: &str,
        window: Duration,
        max_requests: u64,
    ) -> CounterResult<WindowCount>;

    /// Checks if the backing store is reachable.
    async fn health_check(&self) -> bool;

    /// Short backend name for health reporting and logs.
    fn backend(&self) -> &'static str;
}
