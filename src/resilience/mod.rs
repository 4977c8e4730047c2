//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Sheet fetch:
//!     → tokio::time::timeout (per-attempt deadline, see sheets::client)
//!     → On failure: retries.rs (check if retryable)
//!     → backoff.rs (exponential delay with jitter before next attempt)
//! ```
//!
//! # Design Decisions
//! - Every external call has a deadline
//! - Only transient failures (network, timeout, 429, 5xx) are retried
//! - Path resolution itself never retries; NotFound is final

pub mod backoff;
pub mod retries;

pub use backoff::calculate_backoff;
pub use retries::RetryPolicy;
