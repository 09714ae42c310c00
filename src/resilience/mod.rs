//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Provider call:
//!     → client deadline (timeouts.provider_secs)
//!     → On failure: retries.rs (check if retryable)
//!     → backoff.rs (exponential delay + jitter) → next attempt
//! ```
//!
//! # Design Decisions
//! - Every provider call has a deadline
//! - Retries are opt-in; the default is a single attempt
//! - Only transient failures are retried

pub mod backoff;
pub mod retries;

pub use retries::{is_retryable, RetryPolicy};
