//! Bounded retry with a fixed delay between attempts.
//!
//! The catalog host is polled politely: every failed attempt waits the same
//! delay, and there is no jitter or exponential growth.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use harvester_core::download::{RetryDecision, RetryPolicy};
//!
//! let policy = RetryPolicy::new(3, Duration::from_secs(2));
//!
//! match policy.should_retry(1) {
//!     RetryDecision::Retry { delay, attempt } => {
//!         println!("Retrying in {:?} (attempt {})", delay, attempt);
//!     }
//!     RetryDecision::DoNotRetry { reason } => {
//!         println!("Not retrying: {}", reason);
//!     }
//! }
//! ```

use std::time::Duration;

use tracing::debug;

use super::constants::{DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY};

/// Decision on whether to retry a failed fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry after the specified delay.
    Retry {
        /// How long to wait before retrying.
        delay: Duration,
        /// Which attempt number this will be (1-indexed, so first retry is attempt 2).
        attempt: u32,
    },

    /// Do not retry.
    DoNotRetry {
        /// Human-readable reason why retry is not attempted.
        reason: String,
    },
}

/// Configuration for bounded retry with a fixed delay.
///
/// # Default Values
///
/// - `max_attempts`: 3
/// - `delay`: 2 seconds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the initial attempt).
    max_attempts: u32,

    /// Fixed wait after each failed attempt.
    delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_RETRIES,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Creates a policy. `max_attempts` is clamped to at least 1.
    #[must_use]
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Creates a policy with a custom `max_attempts` and the default delay.
    #[must_use]
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self::new(max_attempts, DEFAULT_RETRY_DELAY)
    }

    /// Returns the maximum number of attempts configured.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns the fixed delay between attempts.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Determines whether to retry after `attempt` (1-indexed) failed.
    #[must_use]
    pub fn should_retry(&self, attempt: u32) -> RetryDecision {
        if attempt >= self.max_attempts {
            debug!(attempt, max = self.max_attempts, "max attempts reached");
            return RetryDecision::DoNotRetry {
                reason: format!("max attempts ({}) exhausted", self.max_attempts),
            };
        }

        RetryDecision::Retry {
            delay: self.delay,
            attempt: attempt + 1,
        }
    }
}
