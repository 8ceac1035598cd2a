//! Redis-backed counter store.

use super::service::{CounterError, CounterResult, RateCounter, WindowCount};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use std::time::Duration;
use tracing::{debug, info};

/// Counter store shared by every instance pointing at the same Redis.
///
/// Each key holds an integer whose TTL is the window. The window is opened
/// with `SET key 0 PX window NX` and counted with `INCR`, both inside one
/// `MULTI`/`EXEC` so the increment-and-check is atomic on the server.
///
/// Errors are returned to the caller; the fail-open decision belongs to
/// [`crate::application::services::RateLimiter`].
pub struct RedisCounter {
    client: ConnectionManager,
    key_prefix: String,
}

impl RedisCounter {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`CounterError::Connection`] if the URL is invalid, the
    /// connection cannot be established, or the PING fails.
    pub async fn connect(redis_url: &str) -> CounterResult<Self> {
        info!("Connecting to Redis rate counter");

        let client = Client::open(redis_url)
            .map_err(|e| CounterError::Connection(format!("Failed to create Redis client: {}", e)))?;

        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| CounterError::Connection(format!("Failed to connect to Redis: {}", e)))?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CounterError::Connection(format!("Redis PING failed: {}", e)))?;

        info!("Connected to Redis");

        Ok(Self {
            client: manager,
            key_prefix: "ratelimit:".to_string(),
        })
    }

    /// Constructs the full Redis key with namespace prefix.
    fn build_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

/// Window length in whole milliseconds, at least one.
fn window_millis(window: Duration) -> u64 {
    u64::try_from(window.as_millis()).unwrap_or(u64::MAX).max(1)
}

#[async_trait]
impl RateCounter for RedisCounter {
    async fn increment_and_check(
        &self,
        key: &str,
        window: Duration,
        max_requests: u64,
    ) -> CounterResult<WindowCount> {
        let redis_key = self.build_key(key);
        let mut conn = self.client.clone();

        let (count,): (u64,) = redis::pipe()
            .atomic()
            .cmd("SET")
            .arg(&redis_key)
            .arg(0)
            .arg("PX")
            .arg(window_millis(window))
            .arg("NX")
            .ignore()
            .incr(&redis_key, 1)
            .query_async(&mut conn)
            .await
            .map_err(|e| CounterError::Operation(format!("Redis INCR failed for {}: {}", redis_key, e)))?;

        debug!("Rate window {} -> {}/{}", redis_key, count, max_requests);

        Ok(WindowCount::new(count, max_requests))
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
