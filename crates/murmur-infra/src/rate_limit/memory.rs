//! In-memory fixed-window rate limiter.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use murmur_core::ports::{RateLimitDecision, RateLimitError, RateLimiter};

/// Rate limiter configuration.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests per window.
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

struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window counter, keyed per client.
///
/// The counter resets when the window elapses. Limits are per-process, not
/// distributed across instances.
pub struct InMemoryRateLimiter {
    windows: RwLock<HashMap<String, Window>>,
    config: RateLimitConfig,
}

impl InMemoryRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            windows: RwLock::new(HashMap::new()),
            config,
        }
    }

    pub fn from_env() -> Self {
        let config = RateLimitConfig {
            max_requests: std::env::var("RATE_LIMIT_MAX_REQUESTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(100),
            window: Duration::from_secs(
                std::env::var("RATE_LIMIT_WINDOW_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60),
            ),
        };
        Self::new(config)
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn acquire(&self, key: &str) -> Result<RateLimitDecision, RateLimitError> {
        let now = Instant::now();
        let mut windows = self.windows.write().await;
        let window = windows.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.duration_since(window.started) >= self.config.window {
            window.started = now;
            window.count = 0;
        }

        let retry_after = self
            .config
            .window
            .saturating_sub(now.duration_since(window.started));

        if window.count >= self.config.max_requests {
            return Ok(RateLimitDecision {
                allowed: false,
                remaining: 0,
                retry_after,
            });
        }

        window.count += 1;
        Ok(RateLimitDecision {
            allowed: true,
            remaining: self.config.max_requests - window.count,
            retry_after,
        })
    }
}
