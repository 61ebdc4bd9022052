//! Configuration types for the MoySklad API client.
//!
//! This module provides the configuration used to construct a client:
//!
//! - [`MoySkladConfig`]: Immutable settings shared by every call
//! - [`MoySkladConfigBuilder`]: A builder for constructing [`MoySkladConfig`] instances
//! - [`AccessToken`]: A validated bearer token with masked debug output
//! - [`BaseUrl`]: A validated API base URL
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use moysklad_api::{AccessToken, MoySkladConfig};
//!
//! let config = MoySkladConfig::builder()
//!     .token(AccessToken::new("my-token").unwrap())
//!     .timeout(Duration::from_secs(30))
//!     .retry_count(5)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.retry_policy().max_attempts(), 5);
//! ```

mod newtypes;

pub use newtypes::{AccessToken, BaseUrl};

use std::time::Duration;

use chrono_tz::Tz;

use crate::clients::RetryPolicy;
use crate::error::ConfigError;
use crate::model::TimeZones;

/// Largest page the server returns for a list request.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Configuration for the MoySklad API client.
///
/// # Thread Safety
///
/// `MoySkladConfig` is `Clone`, `Send`, and `Sync`. It is never mutated after
/// [`MoySkladConfigBuilder::build`], so concurrent calls may share it freely.
#[derive(Clone, Debug)]
pub struct MoySkladConfig {
    token: AccessToken,
    base_url: BaseUrl,
    timeout: Duration,
    retry_policy: RetryPolicy,
    page_size: u32,
    debug: bool,
    user_time_zone: Tz,
    user_agent_prefix: Option<String>,
}

impl MoySkladConfig {
    /// Creates a new builder for constructing a `MoySkladConfig`.
    #[must_use]
    pub fn builder() -> MoySkladConfigBuilder {
        MoySkladConfigBuilder::new()
    }

    /// Returns the bearer token.
    #[must_use]
    pub const fn token(&self) -> &AccessToken {
        &self.token
    }

    /// Returns the API base URL.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the timeout applied to each HTTP attempt.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the retry policy.
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Returns the page size used when paginating list endpoints.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Returns whether verbose request/response logging is enabled.
    #[must_use]
    pub const fn debug(&self) -> bool {
        self.debug
    }

    /// Returns the caller's time zone used for date conversions.
    #[must_use]
    pub const fn user_time_zone(&self) -> Tz {
        self.user_time_zone
    }

    /// Returns the time zone pair used to convert server timestamps.
    #[must_use]
    pub const fn time_zones(&self) -> TimeZones {
        TimeZones::new(self.user_time_zone)
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }
}

// Verify MoySkladConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<MoySkladConfig>();
};

/// Builder for constructing [`MoySkladConfig`] instances.
///
/// Only `token` is required.
///
/// # Defaults
///
/// - `base_url`: [`BaseUrl::DEFAULT`]
/// - `timeout`: 60 seconds
/// - `retry_count`: 3
/// - `retry_delay`: 1 second
/// - `rate_limit_delay`: the `retry_delay`
/// - `page_size`: 1000
/// - `debug`: `false`
/// - `user_time_zone`: UTC
#[derive(Debug, Default)]
pub struct MoySkladConfigBuilder {
    token: Option<AccessToken>,
    base_url: Option<BaseUrl>,
    timeout: Option<Duration>,
    retry_count: Option<u32>,
    retry_delay: Option<Duration>,
    rate_limit_delay: Option<Duration>,
    page_size: Option<u32>,
    debug: Option<bool>,
    user_time_zone: Option<Tz>,
    user_agent_prefix: Option<String>,
}

impl MoySkladConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the bearer token (required).
    #[must_use]
    pub fn token(mut self, token: AccessToken) -> Self {
        self.token = Some(token);
        self
    }

    /// Sets the API base URL.
    #[must_use]
    pub fn base_url(mut self, base_url: BaseUrl) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Sets the timeout for a single HTTP attempt.
    ///
    /// A slow server fails the current attempt, which then counts against the
    /// retry budget like any other connectivity failure.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the total number of attempts per logical request.
    #[must_use]
    pub const fn retry_count(mut self, count: u32) -> Self {
        self.retry_count = Some(count);
        self
    }

    /// Sets the base delay for exponential connectivity backoff.
    #[must_use]
    pub const fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = Some(delay);
        self
    }

    /// Sets the wait used after a 429 response without `Retry-After`.
    ///
    /// Defaults to the [`retry_delay`](Self::retry_delay).
    #[must_use]
    pub const fn rate_limit_delay(mut self, delay: Duration) -> Self {
        self.rate_limit_delay = Some(delay);
        self
    }

    /// Sets the page size used by the pagination engine.
    #[must_use]
    pub const fn page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Enables verbose request/response logging.
    #[must_use]
    pub const fn debug(mut self, debug: bool) -> Self {
        self.debug = Some(debug);
        self
    }

    /// Sets the caller's time zone.
    #[must_use]
    pub const fn user_time_zone(mut self, tz: Tz) -> Self {
        self.user_time_zone = Some(tz);
        self
    }

    /// Sets a prefix for the `User-Agent` header.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`MoySkladConfig`], validating it in the process.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `token` is not set,
    /// [`ConfigError::InvalidRetryCount`] for a zero retry count and
    /// [`ConfigError::InvalidPageSize`] for a page size outside `1..=1000`.
    pub fn build(self) -> Result<MoySkladConfig, ConfigError> {
        let token = self
            .token
            .ok_or(ConfigError::MissingRequiredField { field: "token" })?;

        let retry_count = self.retry_count.unwrap_or(RetryPolicy::DEFAULT_ATTEMPTS);
        if retry_count == 0 {
            return Err(ConfigError::InvalidRetryCount);
        }

        let page_size = self.page_size.unwrap_or(MAX_PAGE_SIZE);
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::InvalidPageSize {
                size: page_size,
                max: MAX_PAGE_SIZE,
            });
        }

        let retry_delay = self.retry_delay.unwrap_or(RetryPolicy::DEFAULT_BASE_DELAY);
        let retry_policy = RetryPolicy::new(
            retry_count,
            retry_delay,
            self.rate_limit_delay.unwrap_or(retry_delay),
        );

        Ok(MoySkladConfig {
            token,
            base_url: self.base_url.unwrap_or_default(),
            timeout: self.timeout.unwrap_or(Duration::from_secs(60)),
            retry_policy,
            page_size,
            debug: self.debug.unwrap_or(false),
            user_time_zone: self.user_time_zone.unwrap_or(Tz::UTC),
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> AccessToken {
        AccessToken::new("token").unwrap()
    }

    #[test]
    fn test_builder_requires_token() {
        let result = MoySkladConfigBuilder::new().build();

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField { field: "token" })
        ));
    }

    #[test]
    fn test_builder_provides_sensible_defaults() {
        let config = MoySkladConfig::builder().token(token()).build().unwrap();

        assert_eq!(config.base_url().as_ref(), BaseUrl::DEFAULT);
        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert_eq!(config.retry_policy().max_attempts(), 3);
        assert_eq!(config.retry_policy().base_delay(), Duration::from_secs(1));
        assert_eq!(
            config.retry_policy().rate_limit_delay(),
            Duration::from_secs(1)
        );
        assert_eq!(config.page_size(), 1000);
        assert!(!config.debug());
        assert_eq!(config.user_time_zone(), Tz::UTC);
        assert!(config.user_agent_prefix().is_none());
    }

    #[test]
    fn test_rate_limit_delay_follows_retry_delay_when_unset() {
        let config = MoySkladConfig::builder()
            .token(token())
            .retry_delay(Duration::from_millis(250))
            .build()
            .unwrap();

        assert_eq!(
            config.retry_policy().rate_limit_delay(),
            Duration::from_millis(250)
        );
    }

    #[test]
    fn test_builder_rejects_zero_retry_count() {
        let result = MoySkladConfig::builder()
            .token(token())
            .retry_count(0)
            .build();

        assert!(matches!(result, Err(ConfigError::InvalidRetryCount)));
    }

    #[test]
    fn test_builder_rejects_page_size_out_of_range() {
        for size in [0, 1001] {
            let result = MoySkladConfig::builder()
                .token(token())
                .page_size(size)
                .build();
            assert!(matches!(
                result,
                Err(ConfigError::InvalidPageSize { size: s, max: 1000 }) if s == size
            ));
        }
    }

    #[test]
    fn test_builder_with_all_optional_fields() {
        let config = MoySkladConfig::builder()
            .token(token())
            .base_url(BaseUrl::new("https://api.example.com/v1").unwrap())
            .timeout(Duration::from_secs(5))
            .retry_count(5)
            .retry_delay(Duration::from_millis(250))
            .rate_limit_delay(Duration::from_secs(2))
            .page_size(100)
            .debug(true)
            .user_time_zone(chrono_tz::Europe::Berlin)
            .user_agent_prefix("Inventory/2.0")
            .build()
            .unwrap();

        assert_eq!(config.base_url().as_ref(), "https://api.example.com/v1/");
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.retry_policy().max_attempts(), 5);
        assert_eq!(
            config.retry_policy().base_delay(),
            Duration::from_millis(250)
        );
        assert_eq!(config.retry_policy().rate_limit_delay(), Duration::from_secs(2));
        assert_eq!(config.page_size(), 100);
        assert!(config.debug());
        assert_eq!(config.user_time_zone(), chrono_tz::Europe::Berlin);
        assert_eq!(config.user_agent_prefix(), Some("Inventory/2.0"));
    }

    #[test]
    fn test_config_is_clone_and_debug_masks_token() {
        let config = MoySkladConfig::builder()
            .token(AccessToken::new("secret-token").unwrap())
            .build()
            .unwrap();

        let cloned = config.clone();
        assert_eq!(cloned.token(), config.token());

        let debug_str = format!("{config:?}");
        assert!(debug_str.contains("MoySkladConfig"));
        assert!(!debug_str.contains("secret-token"));
    }
}
