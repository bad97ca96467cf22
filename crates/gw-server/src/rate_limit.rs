//! Per-endpoint, per-source token-bucket admission control.
//!
//! Same refill-on-read `try_acquire` shape used elsewhere in this codebase
//! to pace calls to external providers, keyed here by `"{endpoint}:{source}"`
//! instead of provider name.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Instant;

use dashmap::DashMap;

#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    pub requests_per_second: f64,
    pub burst_size: u32,
}

impl RateLimitConfig {
    /// A per-minute admission count expressed as a token bucket: burst lets
    /// the full quota through immediately, then refills at the sustained
    /// per-second rate.
    pub fn per_minute(count: u32) -> Self {
        Self {
            requests_per_second: count as f64 / 60.0,
            burst_size: count,
        }
    }

    pub const UNLIMITED: RateLimitConfig = RateLimitConfig { requests_per_second: f64::MAX, burst_size: u32::MAX };
}

struct TokenBucket {
    config: RateLimitConfig,
    tokens: Mutex<f64>,
    last_update: Mutex<Instant>,
    total_requests: AtomicU64,
    throttled_requests: AtomicU64,
}

impl TokenBucket {
    fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            tokens: Mutex::new(config.burst_size as f64),
            last_update: Mutex::new(Instant::now()),
            total_requests: AtomicU64::new(0),
            throttled_requests: AtomicU64::new(0),
        }
    }

    fn try_acquire(&self) -> bool {
        self.total_requests.fetch_add(1, Ordering::Relaxed);

        let mut tokens = self.tokens.lock().expect("poisoned");
        let mut last_update = self.last_update.lock().expect("poisoned");

        let now = Instant::now();
        let elapsed = now.duration_since(*last_update);
        let tokens_to_add = elapsed.as_secs_f64() * self.config.requests_per_second;
        *tokens = (*tokens + tokens_to_add).min(self.config.burst_size as f64);
        *last_update = now;

        if *tokens >= 1.0 {
            *tokens -= 1.0;
            true
        } else {
            self.throttled_requests.fetch_add(1, Ordering::Relaxed);
            false
        }
    }
}

/// One bucket per `"{endpoint}:{source}"` key, created lazily on first use.
pub struct RateLimiter {
    buckets: DashMap<String, TokenBucket>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self { buckets: DashMap::new() }
    }

    /// `true` if the request is admitted; `false` if the bucket is dry.
    pub fn admit(&self, endpoint: &str, source: &str, config: RateLimitConfig) -> bool {
        if config.burst_size == u32::MAX {
            return true;
        }
        let key = format!("{endpoint}:{source}");
        self.buckets
            .entry(key)
            .or_insert_with(|| TokenBucket::new(config))
            .try_acquire()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admits_up_to_burst_then_throttles() {
        let limiter = RateLimiter::new();
        let cfg = RateLimitConfig::per_minute(3);
        for _ in 0..3 {
            assert!(limiter.admit("insert", "1.2.3.4", cfg));
        }
        assert!(!limiter.admit("insert", "1.2.3.4", cfg));
    }

    #[test]
    fn sources_are_independent() {
        let limiter = RateLimiter::new();
        let cfg = RateLimitConfig::per_minute(1);
        assert!(limiter.admit("insert", "a", cfg));
        assert!(limiter.admit("insert", "b", cfg));
        assert!(!limiter.admit("insert", "a", cfg));
    }

    #[test]
    fn endpoints_are_independent() {
        let limiter = RateLimiter::new();
        let cfg = RateLimitConfig::per_minute(1);
        assert!(limiter.admit("insert", "a", cfg));
        assert!(limiter.admit("search", "a", cfg));
    }

    #[test]
    fn unlimited_config_never_throttles() {
        let limiter = RateLimiter::new();
        for _ in 0..100 {
            assert!(limiter.admit("health", "a", RateLimitConfig::UNLIMITED));
        }
    }
}
