//! HTTP server initialization and runtime setup.
//!
//! Handles counter store selection, rule loading, window housekeeping, and
//! Axum server lifecycle.

use crate::application::services::{RateLimiter, RedirectService, SlugService};
use crate::config::Config;
use crate::domain::entities::SlugNamespace;
use crate::infrastructure::persistence::{InMemoryRuleRepository, InMemorySlugRegistry};
use crate::infrastructure::rate_counter::{MemoryCounter, RateCounter, RedisCounter};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Rate counter store (Redis, or in-memory fallback)
/// - Routing rules from `RULES_FILE`
/// - Slug registry seeded with the loaded rule ids
/// - Axum HTTP server
///
/// # Errors
///
/// Returns an error if:
/// - The rules file cannot be read or parsed
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let counter = build_counter(&config).await;
    let rate_limiter = Arc::new(RateLimiter::new(counter, config.rate_limit_timeout()));

    let rules = match &config.rules_file {
        Some(path) => InMemoryRuleRepository::load_from_file(path)?,
        None => {
            tracing::warn!("RULES_FILE not set; every redirect will return 404");
            InMemoryRuleRepository::new()
        }
    };

    let registry = InMemorySlugRegistry::new().with_names(SlugNamespace::Link, rules.ids());

    let state = AppState {
        redirect_service: Arc::new(RedirectService::new(Arc::new(rules))),
        slug_service: Arc::new(SlugService::new(Arc::new(registry))),
        rate_limiter,
        redirect_policy: config.redirect_policy(),
        api_policy: config.api_policy(),
        behind_proxy: config.behind_proxy,
    };

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address {}", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Connects to Redis when configured, falling back to process-local counters.
async fn build_counter(config: &Config) -> Arc<dyn RateCounter> {
    if let Some(redis_url) = &config.redis_url {
        match RedisCounter::connect(redis_url).await {
            Ok(redis) => {
                tracing::info!("Rate counters enabled (Redis)");
                return Arc::new(redis);
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to connect to Redis: {}. Using in-memory rate counters.",
                    e
                );
            }
        }
    } else {
        tracing::info!("Redis not configured. Using in-memory rate counters.");
    }

    let memory = Arc::new(MemoryCounter::new());
    spawn_purge_task(memory.clone(), config.purge_interval());
    memory
}

/// Periodically drops expired in-memory windows so idle clients do not
/// accumulate.
fn spawn_purge_task(counter: Arc<MemoryCounter>, every: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            let removed = counter.purge_expired();
            if removed > 0 {
                tracing::debug!(
                    removed,
                    remaining = counter.tracked_keys(),
                    "Purged expired rate windows"
                );
            }
        }
    });
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
