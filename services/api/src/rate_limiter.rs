//! Fixed-window rate limiter keyed by client address

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::warn;

/// Rate limiter configuration
#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    /// Maximum number of requests allowed per window
    pub max_requests: u32,
    /// Window length
    pub window: Duration,
}

/// Rate limiter entry
#[derive(Debug)]
struct RateLimiterEntry {
    /// Requests counted in the current window
    requests: u32,
    /// Start of the current window
    window_start: Instant,
}

/// Rate limiter
#[derive(Debug, Clone)]
pub struct RateLimiter {
    config: RateLimiterConfig,
    entries: Arc<Mutex<HashMap<String, RateLimiterEntry>>>,
}

impl RateLimiter {
    /// Create a new rate limiter
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            config,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Count a request for `key` and report whether it is within the limit
    pub async fn is_allowed(&self, key: &str) -> bool {
        self.check_at(key, Instant::now()).await
    }

    async fn check_at(&self, key: &str, now: Instant) -> bool {
        let mut entries = self.entries.lock().await;

        // Drop windows that have already closed so the map tracks active clients only
        entries.retain(|_, entry| now.duration_since(entry.window_start) < self.config.window);

        let entry = entries.entry(key.to_string()).or_insert(RateLimiterEntry {
            requests: 0,
            window_start: now,
        });

        if entry.requests >= self.config.max_requests {
            warn!(
                "Rate limit exceeded for {} ({} requests per {}s)",
                key,
                self.config.max_requests,
                self.config.window.as_secs()
            );
            return false;
        }

        entry.requests += 1;
        true
    }

    /// Get the rate limiter configuration
    pub fn config(&self) -> &RateLimiterConfig {
        &self.config
    }
}
