//! Admission control in front of the redirect path.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::infrastructure::rate_counter::RateCounter;

/// Window and quota applied to one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatePolicy {
    pub window: Duration,
    pub max_requests: u64,
}

impl RatePolicy {
    pub fn new(window_seconds: u64, max_requests: u64) -> Self {
        Self {
            window: Duration::from_secs(window_seconds),
            max_requests,
        }
    }
}

impl Default for RatePolicy {
    /// 100 requests per 10 seconds.
    fn default() -> Self {
        Self::new(10, 100)
    }
}

/// Result of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateDecision {
    pub allowed: bool,
    pub limit: u64,
    pub remaining: u64,
}

impl RateDecision {
    /// Decision returned when the counter store cannot be consulted.
    fn fail_open(max_requests: u64) -> Self {
        Self {
            allowed: true,
            limit: max_requests,
            remaining: max_requests,
        }
    }
}

/// Windowed rate limiter with a fail-open policy.
///
/// Counting is delegated to a [`RateCounter`]; this type bounds each store
/// access with a timeout and turns store failures into admissions. A broken
/// or slow counter store therefore disables rate limiting rather than
/// blocking redirects.
pub struct RateLimiter {
    counter: Arc<dyn RateCounter>,
    timeout: Duration,
}

impl RateLimiter {
    /// Creates a limiter over `counter`, giving each store call `timeout`.
    pub fn new(counter: Arc<dyn RateCounter>, timeout: Duration) -> Self {
        Self { counter, timeout }
    }

    /// Counts one request for `key` and decides whether to admit it.
    ///
    /// The request is counted even when denied. Store errors and timeouts
    /// are logged and answered with `allowed = true, remaining = max_requests`.
    pub async fn check(&self, key: &str, window: Duration, max_requests: u64) -> RateDecision {
        let outcome = tokio::time::timeout(
            self.timeout,
            self.counter.increment_and_check(key, window, max_requests),
        )
        .await;

        match outcome {
            Ok(Ok(count)) => RateDecision {
                allowed: count.allowed,
                limit: max_requests,
                remaining: max_requests.saturating_sub(count.count),
            },
            Ok(Err(e)) => {
                warn!(
                    key,
                    backend = self.counter.backend(),
                    "Rate counter failed, admitting request: {}",
                    e
                );
                RateDecision::fail_open(max_requests)
            }
            Err(_) => {
                warn!(
                    key,
                    backend = self.counter.backend(),
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Rate counter timed out, admitting request"
                );
                RateDecision::fail_open(max_requests)
            }
        }
    }

    /// [`Self::check`] with a window and quota taken from `policy`.
    pub async fn check_policy(&self, key: &str, policy: RatePolicy) -> RateDecision {
        self.check(key, policy.window, policy.max_requests).await
    }

    /// Checks if the counter store is reachable.
    ///
    /// A store that does not answer within the limiter's timeout counts as
    /// unreachable.
    pub async fn health_check(&self) -> bool {
        match tokio::time::timeout(self.timeout, self.counter.health_check()).await {
            Ok(reachable) => reachable,
            Err(_) => {
                warn!(
                    backend = self.counter.backend(),
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Rate counter health check timed out"
                );
                false
            }
        }
    }

    /// Name of the counter backend in use.
    pub fn backend(&self) -> &'static str {
        self.counter.backend()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::rate_counter::{
        CounterError, CounterResult, MemoryCounter, MockRateCounter, WindowCount,
    };
    use async_trait::async_trait;

    const TIMEOUT: Duration = Duration::from_millis(50);

    struct StalledCounter;

    #[async_trait]
    impl RateCounter for StalledCounter {
        async fn increment_and_check(
            &self,
            _key: &str,
            _window: Duration,
            _max_requests: u64,
        ) -> CounterResult<WindowCount> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(WindowCount::new(u64::MAX, 0))
        }

        async fn health_check(&self) -> bool {
            tokio::time::sleep(Duration::from_secs(5)).await;
            true
        }

        fn backend(&self) -> &'static str {
            "stalled"
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_boundary_with_default_policy() {
        let limiter = RateLimiter::new(Arc::new(MemoryCounter::new()), TIMEOUT);
        let policy = RatePolicy::default();

        for i in 1..=100 {
            let decision = limiter.check_policy("10.0.0.1:redirect", policy).await;
            assert!(decision.allowed, "request {i} should be allowed");
            assert_eq!(decision.remaining, 100 - i);
        }

        let denied = limiter.check_policy("10.0.0.1:redirect", policy).await;
        assert_eq!(
            denied,
            RateDecision {
                allowed: false,
                limit: 100,
                remaining: 0
            }
        );

        tokio::time::advance(policy.window).await;

        let readmitted = limiter.check_policy("10.0.0.1:redirect", policy).await;
        assert!(readmitted.allowed);
        assert_eq!(readmitted.remaining, 99);
    }

    #[tokio::test]
    async fn test_store_error_fails_open() {
        let mut counter = MockRateCounter::new();
        counter
            .expect_increment_and_check()
            .times(1)
            .returning(|_, _, _| Err(CounterError::Connection("refused".to_string())));
        counter.expect_backend().return_const("mock");

        let limiter = RateLimiter::new(Arc::new(counter), TIMEOUT);
        let decision = limiter.check("k", Duration::from_secs(10), 100).await;

        assert_eq!(
            decision,
            RateDecision {
                allowed: true,
                limit: 100,
                remaining: 100
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_fails_open() {
        let limiter = RateLimiter::new(Arc::new(StalledCounter), TIMEOUT);

        let decision = limiter.check("k", Duration::from_secs(10), 7).await;

        assert!(decision.allowed);
        assert_eq!(decision.remaining, 7);
    }

    #[tokio::test]
    async fn test_denial_passes_through() {
        let mut counter = MockRateCounter::new();
        counter
            .expect_increment_and_check()
            .withf(|key, window, max| {
                key == "1.1.1.1:api" && *window == Duration::from_secs(10) && *max == 3
            })
            .returning(|_, _, max| Ok(WindowCount::new(4, max)));

        let limiter = RateLimiter::new(Arc::new(counter), TIMEOUT);
        let decision = limiter.check("1.1.1.1:api", Duration::from_secs(10), 3).await;

        assert!(!decision.allowed);
        assert_eq!(decision.remaining, 0);
        assert_eq!(decision.limit, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_health_check_times_out() {
        let limiter = RateLimiter::new(Arc::new(StalledCounter), TIMEOUT);

        let started = tokio::time::Instant::now();
        assert!(!limiter.health_check().await);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_health_check_passes_through() {
        let mut counter = MockRateCounter::new();
        counter.expect_health_check().times(1).returning(|| true);

        let limiter = RateLimiter::new(Arc::new(counter), TIMEOUT);

        assert!(limiter.health_check().await);
    }
}
