//! Retry logic for sheet fetches.
//!
//! # Responsibilities
//! - Decide whether a failed fetch is worth another attempt
//! - Compute the delay before the next attempt
//!
//! # Design Decisions
//! - Connection errors and timeouts are always retryable
//! - 429 and 5xx are retryable; other 4xx are not (bad id, bad key)
//! - Jittered backoff prevents thundering herd

use std::time::Duration;

use reqwest::StatusCode;

use crate::config::RetryConfig;
use crate::resilience::backoff::calculate_backoff;

/// Whether an HTTP status from the data source is transient.
pub fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Attempt budget and backoff settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl RetryPolicy {
    /// True if another attempt is allowed after `attempt` (1-based) failed.
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Delay to wait after attempt number `attempt` failed.
    pub fn delay(&self, attempt: u32) -> Duration {
        calculate_backoff(attempt, self.base_delay_ms, self.max_delay_ms)
    }

    /// Upper bound on the total backoff across every retry, jitter included.
    pub fn max_total_delay(&self) -> Duration {
        if self.base_delay_ms == 0 {
            return Duration::ZERO;
        }

        let mut total: u64 = 0;
        for attempt in 1..self.max_attempts {
            let factor = 2u64.saturating_pow(attempt - 1);
            let capped = self.base_delay_ms.saturating_mul(factor).min(self.max_delay_ms);
            let step = capped.saturating_add(capped / 10);
            if capped == self.max_delay_ms {
                let remaining = u64::from(self.max_attempts - attempt);
                total = total.saturating_add(step.saturating_mul(remaining));
                break;
            }
            total = total.saturating_add(step);
        }
        Duration::from_millis(total)
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay_ms: config.base_delay_ms,
            max_delay_ms: config.max_delay_ms,
        }
    }
}
