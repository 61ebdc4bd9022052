//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use reqwest::Url;
use std::fmt;

/// A validated MoySklad bearer token.
///
/// This newtype ensures the token is non-empty and masks its value
/// in debug output to prevent accidental exposure in logs.
///
/// # Security
///
/// The `Debug` implementation masks the token, displaying only
/// `AccessToken(*****)` instead of the actual value.
///
/// # Example
///
/// ```rust
/// use moysklad_api::AccessToken;
///
/// let token = AccessToken::new("my-token").unwrap();
/// assert_eq!(token.as_ref(), "my-token");
/// assert_eq!(format!("{:?}", token), "AccessToken(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Creates a new validated token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyToken`] if the token is empty or whitespace.
    pub fn new(token: impl Into<String>) -> Result<Self, ConfigError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ConfigError::EmptyToken);
        }
        Ok(Self(token))
    }

    /// Returns the value of the `Authorization` header for this token.
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl AsRef<str> for AccessToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(*****)")
    }
}

/// A validated API base URL.
///
/// The URL is always stored with a trailing `/` so that relative endpoint
/// paths such as `entity/product` resolve underneath it rather than
/// replacing its last segment.
///
/// # Example
///
/// ```rust
/// use moysklad_api::BaseUrl;
///
/// let base = BaseUrl::new("https://api.example.com/v1").unwrap();
/// assert_eq!(base.as_ref(), "https://api.example.com/v1/");
///
/// // Links under the base URL are reduced to their relative part.
/// assert_eq!(
///     base.relative_link("HTTPS://API.EXAMPLE.COM/v1/entity/product/42"),
///     Some("entity/product/42")
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl {
    raw: String,
    url: Url,
}

impl BaseUrl {
    /// The production MoySklad JSON API endpoint.
    pub const DEFAULT: &'static str = "https://api.moysklad.ru/api/remap/1.2/";

    /// Creates a new validated base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the value does not parse as an
    /// absolute `http` or `https` URL.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let input = url.into();
        let trimmed = input.trim();
        let raw = format!("{}/", trimmed.trim_end_matches('/'));

        let parsed = Url::parse(&raw).map_err(|_| ConfigError::InvalidBaseUrl {
            url: input.clone(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(ConfigError::InvalidBaseUrl { url: input });
        }

        Ok(Self { raw, url: parsed })
    }

    /// Returns the parsed URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Returns the host name of the base URL.
    #[must_use]
    pub fn host(&self) -> Option<&str> {
        self.url.host_str()
    }

    /// Strips this base URL from the front of `link`, comparing ASCII
    /// case-insensitively.
    ///
    /// Returns `None` when the link points somewhere else.
    #[must_use]
    pub fn relative_link<'a>(&self, link: &'a str) -> Option<&'a str> {
        let prefix_len = self.raw.len();
        if link.len() < prefix_len || !link.is_char_boundary(prefix_len) {
            return None;
        }
        let (head, tail) = link.split_at(prefix_len);
        head.eq_ignore_ascii_case(&self.raw).then_some(tail)
    }
}

impl Default for BaseUrl {
    fn default() -> Self {
        Self::new(Self::DEFAULT).expect("default base URL is valid")
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
