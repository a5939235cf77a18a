//! Retry policy, retry predicates, and `Retry-After` parsing.
//!
//! A call is attempted at most `max_retries + 1` times. Between attempts the
//! client waits for the server's `Retry-After` hint when one was supplied,
//! and otherwise backs off exponentially: `initial_delay * 2^(attempt - 1)`,
//! i.e. 1s, 2s, 4s, ... with the default policy.

use crate::{Classify, Error};
use http::HeaderMap;
use std::time::{Duration, SystemTime};

/// How many times to retry and how long to wait in between.
///
/// # Examples
///
/// ```
/// use mailbreeze::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.max_attempts(), 4);
/// assert_eq!(policy.backoff(1), Duration::from_secs(1));
/// assert_eq!(policy.backoff(3), Duration::from_secs(4));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// The maximum number of retries after the first attempt.
    pub max_retries: u32,

    /// The delay before the first retry when the server gave no hint.
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Total number of attempts, including the first one.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Exponential backoff before the retry that follows `attempt` (1-indexed).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let multiplier = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_delay.saturating_mul(multiplier)
    }

    /// Returns how long to sleep after `attempt` failed with `error`.
    ///
    /// A positive retry-after hint on the error is honored exactly.
    ///
    /// # Examples
    ///
    /// ```
    /// use mailbreeze::{ApiError, Error, RetryPolicy};
    /// use std::time::Duration;
    ///
    /// let policy = RetryPolicy::default();
    /// let hinted = Error::Api(ApiError::from_status(429, "slow", "", None, 9));
    /// assert_eq!(policy.delay_for(2, &hinted), Duration::from_secs(9));
    /// assert_eq!(policy.delay_for(2, &Error::Timeout), Duration::from_secs(2));
    /// ```
    pub fn delay_for(&self, attempt: u32, error: &Error) -> Duration {
        match error.retry_after() {
            0 => self.backoff(attempt),
            seconds => Duration::from_secs(seconds),
        }
    }
}

/// Decides whether a failed attempt should be retried.
///
/// The attempt budget is enforced by the client; a predicate only judges
/// the error.
///
/// # Examples
///
/// ```
/// use mailbreeze::{Classify, Error, RetryPredicate};
///
/// struct OnlyRateLimits;
///
/// impl RetryPredicate for OnlyRateLimits {
///     fn should_retry(&self, error: &Error, _attempt: u32) -> bool {
///         error.is_rate_limited()
///     }
/// }
/// ```
pub trait RetryPredicate: Send + Sync {
    /// Returns `true` if the call should be attempted again.
    ///
    /// # Arguments
    ///
    /// * `error` - The error of the attempt that just failed
    /// * `attempt` - The attempt number (1-indexed)
    fn should_retry(&self, error: &Error, attempt: u32) -> bool;
}

/// Retries transport failures and API errors with status 429 or >= 500.
///
/// This is the client's default and defers to [`Error::is_retryable`].
#[derive(Debug, Clone, Copy)]
pub struct RetryOnRetryable;

impl RetryPredicate for RetryOnRetryable {
    fn should_retry(&self, error: &Error, _attempt: u32) -> bool {
        error.is_retryable()
    }
}

/// Parses the `Retry-After` header into whole seconds.
///
/// Returns `0` when the header is absent, unparseable, or names a moment in
/// the past.
pub fn parse_retry_after(headers: &HeaderMap) -> u64 {
    headers
        .get(http::header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .map_or(0, parse_retry_after_value)
}

/// Parses a `Retry-After` value: delay-seconds or an HTTP-date.
///
/// # Examples
///
/// ```
/// use mailbreeze::retry::parse_retry_after_value;
///
/// assert_eq!(parse_retry_after_value("60"), 60);
/// assert_eq!(parse_retry_after_value("Wed, 21 Oct 2015 07:28:00 GMT"), 0);
/// assert_eq!(parse_retry_after_value("soon"), 0);
/// ```
pub fn parse_retry_after_value(value: &str) -> u64 {
    let value = value.trim();
    if value.is_empty() {
        return 0;
    }

    if let Ok(seconds) = value.parse::<u64>() {
        return seconds;
    }

    match httpdate::parse_http_date(value) {
        Ok(at) => at
            .duration_since(SystemTime::now())
            .map_or(0, |until| until.as_secs()),
        Err(_) => 0,
    }
}
