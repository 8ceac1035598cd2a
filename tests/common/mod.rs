#![allow(dead_code)]

use async_trait::async_trait;
use axum::extract::ConnectInfo;
use redirect_rotator::application::services::{
    RateLimiter, RatePolicy, RedirectService, SlugService,
};
use redirect_rotator::domain::entities::{RoutingRule, SlugNamespace};
use redirect_rotator::infrastructure::persistence::{InMemoryRuleRepository, InMemorySlugRegistry};
use redirect_rotator::infrastructure::rate_counter::{
    CounterError, CounterResult, MemoryCounter, RateCounter, WindowCount,
};
use redirect_rotator::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower::Layer;

pub const PRIMARY: &str = "https://primary.example.com/landing";
pub const SECONDARY_B: &str = "https://b.example.com/offer";
pub const SECONDARY_C: &str = "https://c.example.com/offer";

/// Rules served by the test state.
///
/// - `spring-sale`: rotating, primary keeps 40%
/// - `evergreen`: rotation disabled, always the primary
/// - `full-split`: rotating, secondaries take all 100%
pub fn sample_rules() -> Vec<RoutingRule> {
    vec![
        RoutingRule::new("spring-sale", PRIMARY)
            .with_secondary(SECONDARY_B, 30)
            .with_secondary(SECONDARY_C, 30)
            .with_rotation(true),
        RoutingRule::new("evergreen", PRIMARY).with_secondary(SECONDARY_B, 50),
        RoutingRule::new("full-split", PRIMARY)
            .with_secondary(SECONDARY_B, 50)
            .with_secondary(SECONDARY_C, 50)
            .with_rotation(true),
    ]
}

pub fn create_test_state(redirect_max: u64, api_max: u64) -> AppState {
    create_state_with_counter(Arc::new(MemoryCounter::new()), redirect_max, api_max)
}

pub fn create_state_with_counter(
    counter: Arc<dyn RateCounter>,
    redirect_max: u64,
    api_max: u64,
) -> AppState {
    create_state_from_rules(sample_rules(), counter, redirect_max, api_max)
}

pub fn create_state_from_rules(
    rules: Vec<RoutingRule>,
    counter: Arc<dyn RateCounter>,
    redirect_max: u64,
    api_max: u64,
) -> AppState {
    let rules = InMemoryRuleRepository::from_rules(rules);
    let registry = InMemorySlugRegistry::new().with_names(SlugNamespace::Link, rules.ids());

    AppState {
        redirect_service: Arc::new(RedirectService::new(Arc::new(rules))),
        slug_service: Arc::new(SlugService::new(Arc::new(registry))),
        rate_limiter: Arc::new(RateLimiter::new(counter, Duration::from_millis(50))),
        redirect_policy: RatePolicy::new(10, redirect_max),
        api_policy: RatePolicy::new(10, api_max),
        behind_proxy: false,
    }
}

/// Counter store that is always down.
pub struct DownCounter;

#[async_trait]
impl RateCounter for DownCounter {
    async fn increment_and_check(
        &self,
        _key: &str,
        _window: Duration,
        _max_requests: u64,
    ) -> CounterResult<WindowCount> {
        Err(CounterError::Connection("connection refused".to_string()))
    }

    async fn health_check(&self) -> bool {
        false
    }

    fn backend(&self) -> &'static str {
        "down"
    }
}

/// Counter store that accepts connections but never answers.
pub struct HangingCounter;

#[async_trait]
impl RateCounter for HangingCounter {
    async fn increment_and_check(
        &self,
        _key: &str,
        _window: Duration,
        _max_requests: u64,
    ) -> CounterResult<WindowCount> {
        std::future::pending().await
    }

    async fn health_check(&self) -> bool {
        std::future::pending().await
    }

    fn backend(&self) -> &'static str {
        "hanging"
    }
}

/// Injects a fixed peer address, standing in for
/// `into_make_service_with_connect_info`.
#[derive(Clone)]
pub struct MockConnectInfoLayer(pub SocketAddr);

impl Default for MockConnectInfoLayer {
    fn default() -> Self {
        Self(SocketAddr::from(([127, 0, 0, 1], 12345)))
    }
}

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService {
            inner,
            addr: self.0,
        }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
    addr: SocketAddr,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        req.extensions_mut().insert(ConnectInfo(self.addr));
        self.inner.call(req)
    }
}
