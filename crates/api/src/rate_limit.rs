//! Rate Limiting Middleware using GCRA Algorithm
//!
//! Limits prediction submissions per client IP using tower_governor.

use crate::error::ServerError;
use governor::middleware::StateInformationMiddleware;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;

/// Governor config with X-RateLimit-* headers enabled
pub type DefaultGovernorConfig =
    tower_governor::governor::GovernorConfig<PeerIpKeyExtractor, StateInformationMiddleware>;

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Apply the limiter to prediction endpoints
    pub enabled: bool,
    /// Seconds between quota replenishments
    pub per_second: u64,
    /// Burst size (max requests that can be made immediately)
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            per_second: 2,  // Replenish every 2 seconds
            burst_size: 5,  // Allow burst of 5
        }
    }
}

/// Create a rate limiting governor config
///
/// Uses PeerIpKeyExtractor, so the service must be served with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn create_governor_config(
    config: &RateLimitConfig,
) -> Result<Arc<DefaultGovernorConfig>, ServerError> {
    GovernorConfigBuilder::default()
        .per_second(config.per_second)
        .burst_size(config.burst_size)
        .use_headers()
        .finish()
        .map(Arc::new)
        .ok_or(ServerError::RateLimit)
}
