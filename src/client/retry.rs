//! Retry policy for the send endpoint.

use std::time::Duration;

use crate::domain::ValidationError;

pub const DEFAULT_MAX_RETRIES: u32 = 10;
pub const DEFAULT_BACKOFF_FACTOR: f64 = 0.3;

/// Upper bound for a single computed backoff sleep.
pub const BACKOFF_MAX: Duration = Duration::from_secs(120);

/// Statuses treated as transient gateway failures.
pub const RETRY_STATUSES: [u16; 4] = [500, 502, 503, 504];

const SERVICE_UNAVAILABLE: u16 = 503;

#[derive(Debug, Clone, Copy, PartialEq)]
/// Bounded exponential backoff.
///
/// `max_retries` counts retries, not attempts: the default of 10 allows up to 11 requests.
pub struct RetryPolicy {
    max_retries: u32,
    backoff_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff_factor: f64) -> Result<Self, ValidationError> {
        if !backoff_factor.is_finite() || backoff_factor < 0.0 {
            return Err(ValidationError::InvalidBackoffFactor {
                actual: backoff_factor,
            });
        }
        Ok(Self {
            max_retries,
            backoff_factor,
        })
    }

    /// Policy that never retries.
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            backoff_factor: 0.0,
        }
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn backoff_factor(&self) -> f64 {
        self.backoff_factor
    }

    pub fn is_retryable_status(&self, status: u16) -> bool {
        RETRY_STATUSES.contains(&status)
    }

    /// Whether another attempt is allowed after `failures` consecutive failures.
    pub fn can_retry(&self, failures: u32) -> bool {
        failures < self.max_retries
    }

    /// Sleep before the next attempt, given the number of consecutive failures so far.
    ///
    /// The first retry is immediate; after that the delay is `factor * 2^(failures - 1)`.
    pub fn backoff(&self, failures: u32) -> Duration {
        if failures <= 1 || self.backoff_factor == 0.0 {
            return Duration::ZERO;
        }
        let exponent = i32::try_from(failures - 1).unwrap_or(i32::MAX);
        let secs = (self.backoff_factor * 2f64.powi(exponent)).min(BACKOFF_MAX.as_secs_f64());
        Duration::from_secs_f64(secs)
    }

    /// Sleep before retrying a retryable status. A `503` with `Retry-After` overrides the backoff.
    pub fn delay_after_status(
        &self,
        failures: u32,
        status: u16,
        retry_after: Option<Duration>,
    ) -> Duration {
        match retry_after {
            Some(delay) if status == SERVICE_UNAVAILABLE => delay,
            _ => self.backoff(failures),
        }
    }
}

/// Parse a `Retry-After` header given in whole seconds.
///
/// HTTP-date values are ignored and fall back to the computed backoff.
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_matches_documented_values() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries(), 10);
        assert_eq!(policy.backoff_factor(), 0.3);
    }

    #[test]
    fn only_gateway_errors_are_retryable() {
        let policy = RetryPolicy::default();
        for status in [500, 502, 503, 504] {
            assert!(policy.is_retryable_status(status), "{status}");
        }
        for status in [200, 400, 401, 404, 429, 501] {
            assert!(!policy.is_retryable_status(status), "{status}");
        }
    }

    #[test]
    fn backoff_grows_exponentially_after_first_retry() {
        let policy = RetryPolicy::new(10, 0.5).unwrap();
        assert_eq!(policy.backoff(1), Duration::ZERO);
        assert_eq!(policy.backoff(2), Duration::from_secs(1));
        assert_eq!(policy.backoff(3), Duration::from_secs(2));
        assert_eq!(policy.backoff(4), Duration::from_secs(4));
    }

    #[test]
    fn backoff_is_capped() {
        let policy = RetryPolicy::new(u32::MAX, 0.3).unwrap();
        assert_eq!(policy.backoff(40), BACKOFF_MAX);
        assert_eq!(policy.backoff(u32::MAX), BACKOFF_MAX);
    }

    #[test]
    fn zero_factor_never_sleeps() {
        let policy = RetryPolicy::new(5, 0.0).unwrap();
        assert_eq!(policy.backoff(5000), Duration::ZERO);
    }

    #[test]
    fn retry_budget_counts_retries_not_attempts() {
        let policy = RetryPolicy::new(2, 0.0).unwrap();
        assert!(policy.can_retry(0));
        assert!(policy.can_retry(1));
        assert!(!policy.can_retry(2));
        assert!(!RetryPolicy::disabled().can_retry(0));
    }

    #[test]
    fn invalid_backoff_factor_is_rejected() {
        assert!(RetryPolicy::new(1, -0.1).is_err());
        assert!(RetryPolicy::new(1, f64::NAN).is_err());
        assert!(RetryPolicy::new(1, f64::INFINITY).is_err());
    }

    #[test]
    fn retry_after_only_applies_to_service_unavailable() {
        let policy = RetryPolicy::new(3, 0.0).unwrap();
        let hint = Some(Duration::from_secs(7));
        assert_eq!(policy.delay_after_status(1, 503, hint), Duration::from_secs(7));
        assert_eq!(policy.delay_after_status(1, 502, hint), Duration::ZERO);
        assert_eq!(policy.delay_after_status(1, 503, None), Duration::ZERO);
    }

    #[test]
    fn retry_after_parses_seconds_only() {
        assert_eq!(parse_retry_after(" 3 "), Some(Duration::from_secs(3)));
        assert_eq!(parse_retry_after("Wed, 21 Oct 2015 07:28:00 GMT"), None);
    }
}
