//! Controller configuration.

use super::SubmitRetryPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration shared by every task of a job.
///
/// # Examples
///
/// ```
/// use schedshim::task::services::TaskControllerConfig;
///
/// let config = TaskControllerConfig::from_json(r#"{"submit_retry": {"max_attempts": 5}}"#)
///     .expect("valid configuration");
/// assert_eq!(config.submit_retry.max_attempts, 5);
/// assert_eq!(config.submit_retry.factor, 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TaskControllerConfig {
    /// Retry settings for scheduler submission.
    pub submit_retry: SubmitRetryConfig,
}

/// Serializable form of [`SubmitRetryPolicy`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SubmitRetryConfig {
    /// Total attempts including the first one.
    pub max_attempts: u32,
    /// Delay before the first retry, in milliseconds.
    pub first_delay_ms: u64,
    /// Upper bound for any delay, in milliseconds.
    pub max_delay_ms: u64,
    /// Multiplicative growth factor between retries.
    pub factor: u32,
}

impl Default for SubmitRetryConfig {
    fn default() -> Self {
        Self::from(SubmitRetryPolicy::default())
    }
}

impl From<SubmitRetryPolicy> for SubmitRetryConfig {
    fn from(policy: SubmitRetryPolicy) -> Self {
        Self {
            max_attempts: policy.max_attempts,
            first_delay_ms: u64::try_from(policy.first_delay.as_millis()).unwrap_or(u64::MAX),
            max_delay_ms: u64::try_from(policy.max_delay.as_millis()).unwrap_or(u64::MAX),
            factor: policy.factor,
        }
    }
}

/// Errors returned while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid configuration JSON.
    #[error("invalid controller configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// `max_attempts` must allow at least one attempt.
    #[error("submit_retry.max_attempts must be at least 1")]
    ZeroAttempts,

    /// `factor` must not shrink delays.
    #[error("submit_retry.factor must be at least 1")]
    ZeroFactor,

    /// The first delay exceeds the cap.
    #[error("submit_retry.first_delay_ms ({first_delay_ms}) exceeds max_delay_ms ({max_delay_ms})")]
    DelayRange {
        /// Configured first delay.
        first_delay_ms: u64,
        /// Configured cap.
        max_delay_ms: u64,
    },
}

impl TaskControllerConfig {
    /// Parses and validates a JSON document. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or unknown fields
    /// and the validation variants of [`ConfigError`] for bad values.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let retry = &self.submit_retry;
        if retry.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        if retry.factor == 0 {
            return Err(ConfigError::ZeroFactor);
        }
        if retry.first_delay_ms > retry.max_delay_ms {
            return Err(ConfigError::DelayRange {
                first_delay_ms: retry.first_delay_ms,
                max_delay_ms: retry.max_delay_ms,
            });
        }
        Ok(())
    }

    /// Returns the retry policy described by this configuration.
    #[must_use]
    pub const fn submit_retry_policy(&self) -> SubmitRetryPolicy {
        SubmitRetryPolicy {
            max_attempts: self.submit_retry.max_attempts,
            first_delay: Duration::from_millis(self.submit_retry.first_delay_ms),
            max_delay: Duration::from_millis(self.submit_retry.max_delay_ms),
            factor: self.submit_retry.factor,
        }
    }
}
