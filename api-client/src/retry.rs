// Retry policy with exponential backoff

use std::time::Duration;

use skinscan_core::ClientConfig;

use crate::errors::ApiError;

/// `max_retries` extra attempts after the first, waiting
/// `base_delay * 2^attempt` before each one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.max_retries, config.retry_base_delay)
    }

    /// Delay before retry number `attempt + 1` (0-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay.saturating_mul(factor)
    }

    /// Whether a failure of 0-based attempt `attempt` should be retried
    pub fn should_retry(&self, error: &ApiError, attempt: u32) -> bool {
        error.is_retryable() && attempt < self.max_retries
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exponential_delays() {
        let policy = RetryPolicy::new(3, Duration::from_millis(1000));
        assert_eq!(policy.delay_for(0), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(1), Duration::from_millis(2000));
        assert_eq!(policy.delay_for(2), Duration::from_millis(4000));
    }

    #[test]
    fn test_default_allows_three_attempts() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 3);
        assert!(policy.should_retry(&ApiError::Timeout, 1));
        assert!(!policy.should_retry(&ApiError::Timeout, 2));
    }

    #[test]
    fn test_client_errors_never_retry() {
        let policy = RetryPolicy::default();
        assert!(!policy.should_retry(&ApiError::NotFound, 0));
        assert!(!policy.should_retry(&ApiError::InvalidRequest("bad".into()), 0));
        assert!(policy.should_retry(&ApiError::RateLimited, 0));
    }
}
