//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{RateLimiter, RatePolicy, RedirectService, SlugService};
use crate::infrastructure::persistence::{InMemoryRuleRepository, InMemorySlugRegistry};

#[derive(Clone)]
pub struct AppState {
    pub redirect_service: Arc<RedirectService<InMemoryRuleRepository>>,
    pub slug_service: Arc<SlugService<InMemorySlugRegistry>>,
    pub rate_limiter: Arc<RateLimiter>,
    pub redirect_policy: RatePolicy,
    pub api_policy: RatePolicy,
    /// Read the client address from proxy headers instead of the socket peer.
    pub behind_proxy: bool,
}
