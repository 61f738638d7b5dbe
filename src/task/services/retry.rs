//! Retry policy for scheduler submission.
//!
//! The delay before retry `n` (0-indexed) is `first_delay × factor^n`,
//! clamped to `max_delay`. Each delay is derived from the attempt number
//! alone, so a clamped value never feeds into the next one.

use std::time::Duration;

/// Bounded exponential backoff applied when the scheduler rejects a submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitRetryPolicy {
    /// Total number of attempts, including the first one. At least 1.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub first_delay: Duration,
    /// Upper bound for any single delay.
    pub max_delay: Duration,
    /// Multiplicative growth factor between retries.
    pub factor: u32,
}

impl Default for SubmitRetryPolicy {
    /// Three attempts, 100ms doubling up to 2s.
    fn default() -> Self {
        Self {
            max_attempts: 3,
            first_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(2),
            factor: 2,
        }
    }
}

impl SubmitRetryPolicy {
    /// A policy that sends once and never retries.
    #[must_use]
    pub const fn single_shot() -> Self {
        Self {
            max_attempts: 1,
            first_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            factor: 1,
        }
    }

    /// Returns `true` when another attempt is allowed after `attempts_made`.
    #[must_use]
    pub const fn allows_retry(&self, attempts_made: u32) -> bool {
        attempts_made < self.max_attempts
    }

    /// Computes the delay before retry `retry` (0-indexed).
    #[must_use]
    pub fn delay(&self, retry: u32) -> Duration {
        self.factor
            .checked_pow(retry)
            .and_then(|multiplier| self.first_delay.checked_mul(multiplier))
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }
}
