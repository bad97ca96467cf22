//! Exponential backoff with jitter, scoped to 5xx/transport failures.
//!
//! 4xx responses are never retried — a bad request stays bad no matter how
//! many times it's resent.

use std::future::Future;
use std::time::Duration;

use crate::config::RetryConfig;
use crate::error::LlmError;

fn calculate_delay(config: &RetryConfig, attempt: u32) -> Duration {
    let base = config.base_delay.as_millis() as u64;
    let exponential = base.saturating_mul(2_u64.saturating_pow(attempt));
    let delay = exponential.min(config.max_delay.as_millis() as u64);

    if config.jitter {
        let jitter = fastrand::u64(0..=(delay / 2).max(1));
        Duration::from_millis(delay + jitter)
    } else {
        Duration::from_millis(delay)
    }
}

/// Whether `error` represents a transient failure worth retrying. 4xx
/// rejections from the provider are not.
fn is_retryable(error: &LlmError) -> bool {
    !matches!(error, LlmError::RemoteRejected(_) | LlmError::InvalidInput(_))
}

pub async fn execute_with_retry<T, F, Fut>(config: &RetryConfig, mut operation: F) -> Result<T, LlmError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, LlmError>>,
{
    let mut last_error = None;

    for attempt in 0..=config.max_retries {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) => {
                let retryable = is_retryable(&error);
                last_error = Some(error);
                if !retryable || attempt == config.max_retries {
                    break;
                }
                tokio::time::sleep(calculate_delay(config, attempt)).await;
            }
        }
    }

    Err(last_error.expect("loop always runs at least once"))
}
