//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check the sheet source is usable
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RedirectorConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

use crate::config::schema::RedirectorConfig;
use crate::resilience::RetryPolicy;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid {field} '{value}': not a socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("sheet.endpoint '{0}' is not an absolute URL")]
    InvalidEndpoint(String),

    #[error("resolver.redirect_status {0} is not a redirect status (301, 302, 307, 308)")]
    InvalidRedirectStatus(u16),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("retries.base_delay_ms ({base}) exceeds retries.max_delay_ms ({max})")]
    DelayOrder { base: u64, max: u64 },

    #[error("worst-case sheet fetch ({fetch_ms}ms) does not fit in timeouts.request_secs ({request_ms}ms)")]
    FetchBudget { fetch_ms: u128, request_ms: u128 },
}

/// Longest a full sheet fetch can take: every attempt spends up to
/// `fetch_secs` sending and again reading the body, plus all backoff.
pub fn fetch_budget(config: &RedirectorConfig) -> Duration {
    let policy = RetryPolicy::from(&config.retries);
    let per_attempt = Duration::from_secs(config.timeouts.fetch_secs.saturating_mul(2));
    per_attempt
        .saturating_mul(policy.max_attempts)
        .saturating_add(policy.max_total_delay())
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &RedirectorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.sheet.spreadsheet_id.trim().is_empty() {
        errors.push(ValidationError::Empty("sheet.spreadsheet_id"));
    }
    if config.sheet.range.trim().is_empty() {
        errors.push(ValidationError::Empty("sheet.range"));
    }
    if url::Url::parse(&config.sheet.endpoint).is_err() {
        errors.push(ValidationError::InvalidEndpoint(config.sheet.endpoint.clone()));
    }

    if !matches!(config.resolver.redirect_status, 301 | 302 | 307 | 308) {
        errors.push(ValidationError::InvalidRedirectStatus(config.resolver.redirect_status));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }
    if config.timeouts.fetch_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.fetch_secs"));
    }
    if config.retries.max_attempts == 0 {
        errors.push(ValidationError::Zero("retries.max_attempts"));
    }
    if config.retries.base_delay_ms > config.retries.max_delay_ms {
        errors.push(ValidationError::DelayOrder {
            base: config.retries.base_delay_ms,
            max: config.retries.max_delay_ms,
        });
    }

    if config.timeouts.request_secs > 0 && config.timeouts.fetch_secs > 0 {
        let fetch = fetch_budget(config);
        let request = Duration::from_secs(config.timeouts.request_secs);
        if fetch >= request {
            errors.push(ValidationError::FetchBudget {
                fetch_ms: fetch.as_millis(),
                request_ms: request.as_millis(),
            });
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> RedirectorConfig {
        let mut config = RedirectorConfig::default();
        config.sheet.spreadsheet_id = "sheet-id".into();
        config
    }

    #[test]
    fn test_valid_config() {
        assert!(validate_config(&valid()).is_ok());
    }

    #[test]
    fn test_default_config_needs_spreadsheet() {
        let errors = validate_config(&RedirectorConfig::default()).unwrap_err();
        assert_eq!(errors, vec![ValidationError::Empty("sheet.spreadsheet_id")]);
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = valid();
        config.listener.bind_address = "nowhere".into();
        config.resolver.redirect_status = 200;
        config.timeouts.fetch_secs = 0;
        config.retries.base_delay_ms = 5000;
        config.observability.metrics_enabled = true;
        config.observability.metrics_address = "bad".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert!(errors.contains(&ValidationError::InvalidRedirectStatus(200)));
        assert!(errors.contains(&ValidationError::Zero("timeouts.fetch_secs")));
    }

    #[test]
    fn test_fetch_must_fit_request_timeout() {
        assert_eq!(fetch_budget(&valid()), Duration::from_millis(24_330));

        let mut config = valid();
        config.timeouts.fetch_secs = 10;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::FetchBudget {
                fetch_ms: 60_330,
                request_ms: 30_000,
            }]
        );

        config.timeouts.request_secs = 61;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_error_display() {
        let err = ValidationError::DelayOrder { base: 10, max: 5 };
        assert!(err.to_string().contains("10"));
    }
}
