//! Rate limiting port.

use async_trait::async_trait;
use std::time::Duration;

/// Fixed-window request limiter, keyed per client.
///
/// `acquire` counts the request against the key's current window and reports
/// whether it may proceed.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    async fn acquire(&self, key: &str) -> Result<RateLimitDecision, RateLimitError>;
}

/// Outcome of counting one request against a window.
#[derive(Debug, Clone)]
pub struct RateLimitDecision {
    pub allowed: bool,
    /// Requests left in the current window.
    pub remaining: u32,
    /// Time until the window rolls over and the counter resets.
    pub retry_after: Duration,
}

/// Rate limit errors.
#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("Backend error: {0}")]
    Backend(String),
}
