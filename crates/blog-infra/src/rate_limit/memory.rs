//! In-memory, per-client rate limiter using the governor crate.

use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use governor::clock::{Clock, DefaultClock};
use governor::{DefaultKeyedRateLimiter, Quota};

use blog_core::ports::{RateLimitError, RateLimitResult, RateLimiter};

/// In-memory rate limiter configuration.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests per window and client.
    pub max_requests: u32,
    /// Window duration.
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window: Duration::from_secs(60),
        }
    }
}

impl RateLimitConfig {
    /// Load from `RATE_LIMIT_MAX_REQUESTS` and `RATE_LIMIT_WINDOW_SECS`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_requests: std::env::var("RATE_LIMIT_MAX_REQUESTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_requests),
            window: std::env::var("RATE_LIMIT_WINDOW_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.window),
        }
    }
}

/// GCRA rate limiter keyed by client identifier.
///
/// Limits are per-process, not shared across instances.
/// Idle clients are dropped every `PRUNE_INTERVAL` checks.
pub struct InMemoryRateLimiter {
    limiter: DefaultKeyedRateLimiter<String>,
    clock: DefaultClock,
    config: RateLimitConfig,
    checks: AtomicU64,
}

const PRUNE_INTERVAL: u64 = 1024;

impl InMemoryRateLimiter {
    pub fn new(config: RateLimitConfig) -> Result<Self, RateLimitError> {
        let burst = NonZeroU32::new(config.max_requests)
            .ok_or_else(|| RateLimitError::Backend("max_requests must be non-zero".to_string()))?;
        let quota = Quota::with_period(config.window / config.max_requests)
            .ok_or_else(|| RateLimitError::Backend("window must be non-zero".to_string()))?
            .allow_burst(burst);

        Ok(Self {
            limiter: DefaultKeyedRateLimiter::keyed(quota),
            clock: DefaultClock::default(),
            config,
            checks: AtomicU64::new(0),
        })
    }

    /// Forget clients whose quota has fully replenished.
    pub fn prune(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
        tracing::debug!(clients = self.tracked_clients(), "Pruned rate limit state");
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check(&self, key: &str) -> Result<RateLimitResult, RateLimitError> {
        if self.checks.fetch_add(1, Ordering::Relaxed) % PRUNE_INTERVAL == PRUNE_INTERVAL - 1 {
            self.prune();
        }

        match self.limiter.check_key(&key.to_string()) {
            Ok(_) => Ok(RateLimitResult {
                allowed: true,
                reset_after: self.config.window,
            }),
            Err(not_until) => Ok(RateLimitResult {
                allowed: false,
                reset_after: not_until.wait_time_from(self.clock.now()),
            }),
        }
    }
}
