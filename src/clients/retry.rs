//! Retry coordination for transient transport failures.
//!
//! [`RetryPolicy`] drives a fallible async operation until it succeeds, fails
//! with a non-retryable error, or runs out of attempts. Only rate limiting and
//! connectivity failures are retried; see [`HttpError::is_retryable`].

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::clients::errors::{HttpError, RetriesExhaustedError};

/// Retry settings applied to every logical request.
///
/// Waits are computed per failure kind:
///
/// - **Rate limited (429)**: the server's `Retry-After`, or
///   [`rate_limit_delay`](Self::rate_limit_delay) when the header is absent
/// - **Connectivity**: `base_delay * 2^attempt`, where `attempt` is the
///   zero-based index of the attempt that just failed
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use moysklad_api::clients::RetryPolicy;
///
/// let policy = RetryPolicy::new(4, Duration::from_millis(100), Duration::from_secs(5));
/// assert_eq!(policy.backoff(0), Duration::from_millis(100));
/// assert_eq!(policy.backoff(2), Duration::from_millis(400));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    rate_limit_delay: Duration,
}

impl RetryPolicy {
    /// Default number of attempts per logical request.
    pub const DEFAULT_ATTEMPTS: u32 = 3;
    /// Default base delay for connectivity backoff.
    pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

    /// Creates a policy. A `max_attempts` of zero is raised to one.
    #[must_use]
    pub const fn new(max_attempts: u32, base_delay: Duration, rate_limit_delay: Duration) -> Self {
        Self {
            max_attempts: if max_attempts == 0 { 1 } else { max_attempts },
            base_delay,
            rate_limit_delay,
        }
    }

    /// Returns the total number of attempts, including the first.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns the base delay for connectivity backoff.
    #[must_use]
    pub const fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Returns the wait used after a 429 response without `Retry-After`.
    #[must_use]
    pub const fn rate_limit_delay(&self) -> Duration {
        self.rate_limit_delay
    }

    /// Returns the connectivity backoff after the zero-based `attempt` failed.
    #[must_use]
    pub const fn backoff(&self, attempt: u32) -> Duration {
        let multiplier = match 2u32.checked_pow(attempt) {
            Some(m) => m,
            None => u32::MAX,
        };
        self.base_delay.saturating_mul(multiplier)
    }

    /// Returns how long to wait before retrying after `error`, or `None` if
    /// the error is not retryable.
    #[must_use]
    pub fn delay_for(&self, error: &HttpError, attempt: u32) -> Option<Duration> {
        if !error.is_retryable() {
            return None;
        }
        match error {
            HttpError::RateLimited(e) => Some(e.retry_after.unwrap_or(self.rate_limit_delay)),
            _ => Some(self.backoff(attempt)),
        }
    }

    /// Runs `operation` under this policy.
    ///
    /// The closure receives the zero-based attempt index. Successes and
    /// non-retryable errors are returned as they are. When the last allowed
    /// attempt fails with a retryable error the result is
    /// [`HttpError::RetriesExhausted`] wrapping that error, even when only one
    /// attempt was allowed.
    ///
    /// Cancelling `cancel` aborts both an in-flight attempt and a pending wait
    /// with [`HttpError::Cancelled`].
    ///
    /// # Errors
    ///
    /// Returns the first non-retryable [`HttpError`], `RetriesExhausted` or
    /// `Cancelled`.
    pub async fn run<T, F, Fut>(
        &self,
        cancel: &CancellationToken,
        mut operation: F,
    ) -> Result<T, HttpError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, HttpError>>,
    {
        let mut attempt: u32 = 0;
        loop {
            let result = tokio::select! {
                biased;
                () = cancel.cancelled() => Err(HttpError::Cancelled),
                result = operation(attempt) => result,
            };

            let error = match result {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            let Some(delay) = self.delay_for(&error, attempt) else {
                return Err(error);
            };

            if attempt + 1 >= self.max_attempts {
                return Err(HttpError::RetriesExhausted(RetriesExhaustedError {
                    attempts: self.max_attempts,
                    last: Box::new(error),
                }));
            }

            warn!(
                attempt = attempt + 1,
                max_attempts = self.max_attempts,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error = %error,
                "retrying MoySklad request"
            );

            tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(HttpError::Cancelled),
                () = tokio::time::sleep(delay) => {}
            }

            attempt += 1;
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_ATTEMPTS,
            Self::DEFAULT_BASE_DELAY,
            Self::DEFAULT_BASE_DELAY,
        )
    }
}
