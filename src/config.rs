//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server starts.
//!
//! ## Rate counter backend
//!
//! Redis is optional. Give either a full URL or individual components:
//!
//! ```bash
//! export REDIS_URL="redis://localhost:6379/0"
//! # or
//! export REDIS_HOST="localhost"
//! export REDIS_PORT="6379"
//! export REDIS_PASSWORD=""
//! export REDIS_DB="0"
//! ```
//!
//! Without Redis (or when it cannot be reached at startup) counters live in
//! process memory and quotas are per instance.
//!
//! ## Optional Variables
//!
//! - `LISTEN` - Bind address (default: `0.0.0.0:3000`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `RULES_FILE` - JSON array of routing rules to serve
//! - `BEHIND_PROXY` - Trust `X-Forwarded-For` / `X-Real-IP` for client keys (default: false)
//! - `RATE_LIMIT_WINDOW_SECONDS` - Admission window (default: 10)
//! - `RATE_LIMIT_MAX_REQUESTS` - Redirects per client per window (default: 100)
//! - `API_RATE_LIMIT_MAX_REQUESTS` - API calls per client per window (default: 20)
//! - `RATE_LIMIT_TIMEOUT_MS` - Counter store timeout before failing open (default: 50)
//! - `RATE_LIMIT_PURGE_INTERVAL_SECONDS` - In-memory window cleanup period (default: 60)

use anyhow::Result;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::application::services::RatePolicy;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub redis_url: Option<String>,
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: String,
    pub rules_file: Option<PathBuf>,
    /// When true, rate limiting reads client IP from X-Forwarded-For / X-Real-IP headers.
    /// Enable only when the service is behind a trusted reverse proxy.
    pub behind_proxy: bool,

    // ── Admission control ───────────────────────────────────────────────────
    pub rate_limit_window_seconds: u64,
    pub rate_limit_max_requests: u64,
    pub api_rate_limit_max_requests: u64,
    /// Budget for one counter store call; exceeding it admits the request.
    pub rate_limit_timeout_ms: u64,
    pub rate_limit_purge_interval_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            redis_url: None,
            listen_addr: "0.0.0.0:3000".to_string(),
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            rules_file: None,
            behind_proxy: false,
            rate_limit_window_seconds: 10,
            rate_limit_max_requests: 100,
            api_rate_limit_max_requests: 20,
            rate_limit_timeout_ms: 50,
            rate_limit_purge_interval_seconds: 60,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Currently infallible for missing variables (all have defaults); kept
    /// fallible so required settings can be added without changing callers.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let listen_addr = env::var("LISTEN").unwrap_or(defaults.listen_addr);
        let log_level = env::var("RUST_LOG").unwrap_or(defaults.log_level);
        let log_format = env::var("LOG_FORMAT").unwrap_or(defaults.log_format);

        let rules_file = env::var("RULES_FILE")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let behind_proxy = env::var("BEHIND_PROXY")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        Ok(Self {
            redis_url: Self::load_redis_url(),
            listen_addr,
            log_level,
            log_format,
            rules_file,
            behind_proxy,
            rate_limit_window_seconds: parse_or(
                "RATE_LIMIT_WINDOW_SECONDS",
                defaults.rate_limit_window_seconds,
            ),
            rate_limit_max_requests: parse_or(
                "RATE_LIMIT_MAX_REQUESTS",
                defaults.rate_limit_max_requests,
            ),
            api_rate_limit_max_requests: parse_or(
                "API_RATE_LIMIT_MAX_REQUESTS",
                defaults.api_rate_limit_max_requests,
            ),
            rate_limit_timeout_ms: parse_or("RATE_LIMIT_TIMEOUT_MS", defaults.rate_limit_timeout_ms),
            rate_limit_purge_interval_seconds: parse_or(
                "RATE_LIMIT_PURGE_INTERVAL_SECONDS",
                defaults.rate_limit_purge_interval_seconds,
            ),
        })
    }

    /// Loads Redis URL with fallback to component-based configuration.
    ///
    /// Priority:
    /// 1. `REDIS_URL` environment variable
    /// 2. Constructed from `REDIS_HOST`, `REDIS_PORT`, `REDIS_PASSWORD`, `REDIS_DB`
    ///
    /// Returns `None` if Redis is not configured.
    fn load_redis_url() -> Option<String> {
        if let Ok(url) = env::var("REDIS_URL") {
            return Some(url);
        }

        let host = env::var("REDIS_HOST").ok()?;
        let port = env::var("REDIS_PORT").unwrap_or_else(|_| "6379".to_string());
        let password = env::var("REDIS_PASSWORD").ok();
        let db = env::var("REDIS_DB").unwrap_or_else(|_| "0".to_string());

        let url = match password {
            // Empty password means no authentication
            Some(pwd) if !pwd.is_empty() => format!("redis://:{}@{}:{}/{}", pwd, host, port, db),
            _ => format!("redis://{}:{}/{}", host, port, db),
        };

        Some(url)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is not `host:port`
    /// - the Redis URL has a foreign scheme
    /// - a rate limit window, quota, timeout, or purge interval is zero
    pub fn validate(&self) -> Result<()> {
        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if let Some(ref redis_url) = self.redis_url
            && !redis_url.starts_with("redis://")
            && !redis_url.starts_with("rediss://")
        {
            anyhow::bail!(
                "REDIS_URL must start with 'redis://' or 'rediss://', got '{}'",
                mask_connection_string(redis_url)
            );
        }

        if self.rate_limit_window_seconds == 0 {
            anyhow::bail!("RATE_LIMIT_WINDOW_SECONDS must be greater than 0");
        }

        if self.rate_limit_max_requests == 0 || self.api_rate_limit_max_requests == 0 {
            anyhow::bail!("Rate limit quotas must be at least 1");
        }

        if self.rate_limit_timeout_ms == 0 || self.rate_limit_timeout_ms > 10_000 {
            anyhow::bail!(
                "RATE_LIMIT_TIMEOUT_MS must be between 1 and 10000, got {}",
                self.rate_limit_timeout_ms
            );
        }

        if self.rate_limit_purge_interval_seconds == 0 {
            anyhow::bail!("RATE_LIMIT_PURGE_INTERVAL_SECONDS must be greater than 0");
        }

        Ok(())
    }

    /// Admission policy for redirects.
    pub fn redirect_policy(&self) -> RatePolicy {
        RatePolicy::new(self.rate_limit_window_seconds, self.rate_limit_max_requests)
    }

    /// Admission policy for `/api` calls.
    pub fn api_policy(&self) -> RatePolicy {
        RatePolicy::new(self.rate_limit_window_seconds, self.api_rate_limit_max_requests)
    }

    pub fn rate_limit_timeout(&self) -> Duration {
        Duration::from_millis(self.rate_limit_timeout_ms)
    }

    pub fn purge_interval(&self) -> Duration {
        Duration::from_secs(self.rate_limit_purge_interval_seconds)
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);

        if let Some(ref redis_url) = self.redis_url {
            tracing::info!("  Redis: {} (enabled)", mask_connection_string(redis_url));
        } else {
            tracing::info!("  Redis: disabled (in-memory counters)");
        }

        match self.rules_file {
            Some(ref path) => tracing::info!("  Rules file: {}", path.display()),
            None => tracing::info!("  Rules file: none"),
        }

        tracing::info!(
            "  Rate limit: {} redirects / {} API calls per {}s (timeout {}ms, fail-open)",
            self.rate_limit_max_requests,
            self.api_rate_limit_max_requests,
            self.rate_limit_window_seconds,
            self.rate_limit_timeout_ms
        );
        tracing::info!("  Behind proxy: {}", self.behind_proxy);
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
    }
}

fn parse_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Masks sensitive information in connection strings for logging.
///
/// Replaces password with `***` in URLs like:
/// - `redis://:password@host:port/db` → `redis://:***@host:port/db`
fn mask_connection_string(url: &str) -> String {
    if let Some(start) = url.find("://") {
        let scheme_end = start + 3;
        let rest = &url[scheme_end..];

        if let Some(at_pos) = rest.find('@') {
            let credentials = &rest[..at_pos];
            let host_part = &rest[at_pos..];

            if let Some(colon_pos) = credentials.rfind(':') {
                let username = &credentials[..colon_pos];
                return format!("{}://{}:***{}", &url[..start], username, host_part);
            }
        }
    }

    url.to_string()
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
