//! Retry logic for provider calls.
//!
//! # Responsibilities
//! - Classify provider failures as transient or permanent
//! - Turn the retry configuration into attempt counts and delays
//!
//! # Design Decisions
//! - Network errors, timeouts, HTTP 5xx/429 and the provider's
//!   OVER_QUERY_LIMIT / UNKNOWN_ERROR statuses are transient
//! - Credential and request validation failures are never retried
//! - Disabled retries mean exactly one attempt

use std::time::Duration;

use crate::config::RetryConfig;
use crate::maps::MapsError;
use crate::resilience::backoff::calculate_backoff;

/// Provider statuses documented as safe to retry.
const RETRYABLE_STATUSES: &[&str] = &["OVER_QUERY_LIMIT", "UNKNOWN_ERROR"];

/// Returns true if a failed provider call may succeed when repeated.
pub fn is_retryable(error: &MapsError) -> bool {
    match error {
        MapsError::Transport { source, .. } => !source.is_decode(),
        MapsError::Timeout { .. } => true,
        MapsError::Http { status, .. } => *status == 429 || (500..600).contains(status),
        MapsError::Status { status, .. } => RETRYABLE_STATUSES.contains(&status.as_str()),
        MapsError::InvalidUrl(_) => false,
    }
}

/// Attempt budget and delays for one provider call.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay_ms: u64,
    max_delay_ms: u64,
}

impl RetryPolicy {
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_attempts: if config.enabled { config.max_attempts.max(1) } else { 1 },
            base_delay_ms: config.base_delay_ms,
            max_delay_ms: config.max_delay_ms,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Whether another attempt is allowed after `attempts` failed ones.
    pub fn should_retry(&self, attempts: u32, error: &MapsError) -> bool {
        attempts < self.max_attempts && is_retryable(error)
    }

    /// Delay before the attempt following `attempts` failed ones.
    pub fn delay(&self, attempts: u32) -> Duration {
        calculate_backoff(attempts, self.base_delay_ms, self.max_delay_ms)
    }
}
