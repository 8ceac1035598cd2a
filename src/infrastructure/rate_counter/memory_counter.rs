//! In-process counter store.

use super::service::{CounterResult, RateCounter, WindowCount};
use async_trait::async_trait;
use dashmap::DashMap;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Counting state of one key.
#[derive(Debug, Clone, Copy)]
struct RateWindow {
    window_start: Instant,
    window: Duration,
    count: u64,
}

impl RateWindow {
    fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.window_start) >= self.window
    }
}

/// Counter store kept in a sharded concurrent map.
///
/// The map entry of a key is locked for the whole increment-and-check, so
/// concurrent requests for the same key are serialized while different keys
/// proceed in parallel. Suitable for a single instance; use
/// [`super::RedisCounter`] when several instances share quotas.
///
/// Expired windows stay in the map until [`MemoryCounter::purge_expired`]
/// runs; the server schedules it periodically.
#[derive(Default)]
pub struct MemoryCounter {
    windows: DashMap<String, RateWindow>,
}

impl MemoryCounter {
    pub fn new() -> Self {
        debug!("Using MemoryCounter (rate limits are per instance)");
        Self::default()
    }

    /// Drops windows that have elapsed. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut removed = 0;
        // Keys may be inserted concurrently, so map length deltas are meaningless.
        self.windows.retain(|_, w| {
            let keep = !w.is_expired(now);
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    /// Number of keys currently tracked.
    pub fn tracked_keys(&self) -> usize {
        self.windows.len()
    }
}

#[async_trait]
impl RateCounter for MemoryCounter {
    async fn increment_and_check(
        &self,
        key: &str,
        window: Duration,
        max_requests: u64,
    ) -> CounterResult<WindowCount> {
        let now = Instant::now();

        let mut entry = self
            .windows
            .entry(key.to_string())
            .or_insert_with(|| RateWindow {
                window_start: now,
                window,
                count: 0,
            });

        if entry.is_expired(now) {
            entry.window_start = now;
            entry.window = window;
            entry.count = 0;
        }

        entry.count = entry.count.saturating_add(1);

        Ok(WindowCount::new(entry.count, max_requests))
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
