//! Circuit breaker over the canister transport.
//!
//! Protects against hammering a failing canister: once
//! [`CircuitBreakerConfig::failure_threshold`] consecutive failures land, the
//! breaker opens and short-circuits calls until `reset_timeout` elapses, at
//! which point one probe request (half-open) decides whether to close again.
//! This is independent of any retry policy a caller layers on top.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircuitBreakerConfig {
    pub failure_threshold: u32,
    pub reset_timeout: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            reset_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

pub struct CircuitBreaker {
    config: CircuitBreakerConfig,
    state: Mutex<CircuitState>,
    failure_count: AtomicU64,
    last_state_change: Mutex<Instant>,
}

impl CircuitBreaker {
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            config,
            state: Mutex::new(CircuitState::Closed),
            failure_count: AtomicU64::new(0),
            last_state_change: Mutex::new(Instant::now()),
        }
    }

    pub fn allow_request(&self) -> bool {
        let mut state = self.state.lock().expect("circuit breaker mutex poisoned");
        match *state {
            CircuitState::Closed => true,
            CircuitState::Open => {
                let last_change = *self.last_state_change.lock().expect("poisoned");
                if last_change.elapsed() >= self.config.reset_timeout {
                    *state = CircuitState::HalfOpen;
                    *self.last_state_change.lock().expect("poisoned") = Instant::now();
                    true
                } else {
                    false
                }
            }
            CircuitState::HalfOpen => true,
        }
    }

    pub fn record_success(&self) {
        let mut state = self.state.lock().expect("circuit breaker mutex poisoned");
        match *state {
            CircuitState::HalfOpen => {
                *state = CircuitState::Closed;
                self.failure_count.store(0, Ordering::Relaxed);
                *self.last_state_change.lock().expect("poisoned") = Instant::now();
            }
            CircuitState::Closed => self.failure_count.store(0, Ordering::Relaxed),
            CircuitState::Open => {}
        }
    }

    pub fn record_failure(&self) {
        let failures = self.failure_count.fetch_add(1, Ordering::Relaxed) + 1;
        let mut state = self.state.lock().expect("circuit breaker mutex poisoned");
        match *state {
            CircuitState::Closed if failures >= self.config.failure_threshold as u64 => {
                *state = CircuitState::Open;
                *self.last_state_change.lock().expect("poisoned") = Instant::now();
            }
            CircuitState::HalfOpen => {
                *state = CircuitState::Open;
                *self.last_state_change.lock().expect("poisoned") = Instant::now();
            }
            _ => {}
        }
    }

    pub fn current_state(&self) -> CircuitState {
        *self.state.lock().expect("circuit breaker mutex poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_closed() {
        let cb = CircuitBreaker::new(CircuitBreakerConfig::default());
        assert_eq!(cb.current_state(), CircuitState::Closed);
        assert!(cb.allow_request());
    }

    #[test]
    fn opens_after_threshold_failures() {
        let cb = CircuitBreaker::new(CircuitBreakerConfig {
            failure_threshold: 3,
            reset_timeout: Duration::from_secs(30),
        });
        for _ in 0..3 {
            cb.record_failure();
        }
        assert_eq!(cb.current_state(), CircuitState::Open);
        assert!(!cb.allow_request());
    }

    #[test]
    fn half_open_failure_reopens() {
        let cb = CircuitBreaker::new(CircuitBreakerConfig {
            failure_threshold: 1,
            reset_timeout: Duration::from_millis(0),
        });
        cb.record_failure();
        assert!(cb.allow_request()); // transitions to half-open
        cb.record_failure();
        assert_eq!(cb.current_state(), CircuitState::Open);
    }

    #[test]
    fn success_resets_failure_count() {
        let cb = CircuitBreaker::new(CircuitBreakerConfig {
            failure_threshold: 3,
            reset_timeout: Duration::from_secs(30),
        });
        cb.record_failure();
        cb.record_failure();
        cb.record_success();
        cb.record_failure();
        cb.record_failure();
        assert_eq!(cb.current_state(), CircuitState::Closed);
    }
}
