//! Error types for the MoySklad API client.
//!
//! This module contains the configuration error type. Transport errors live in
//! [`crate::clients`], repository errors in [`crate::rest`].
//!
//! # Example
//!
//! ```rust
//! use moysklad_api::{AccessToken, ConfigError};
//!
//! let result = AccessToken::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyToken)));
//! ```

use thiserror::Error;

/// Errors that can occur while building a client configuration.
///
/// Each variant carries enough context to tell the caller which value to fix.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The bearer token was empty.
    #[error("Token cannot be empty. Please provide a valid MoySklad access token.")]
    EmptyToken,

    /// The base URL could not be parsed or is not an absolute http(s) URL.
    #[error("Invalid base URL '{url}'. Expected an absolute http(s) URL such as 'https://api.moysklad.ru/api/remap/1.2/'.")]
    InvalidBaseUrl {
        /// The URL that was provided.
        url: String,
    },

    /// The retry count was zero.
    #[error("Retry count must be at least 1 (the initial attempt counts as one).")]
    InvalidRetryCount,

    /// The page size is outside of the range accepted by the server.
    #[error("Invalid page size {size}. Expected a value between 1 and {max}.")]
    InvalidPageSize {
        /// The page size that was provided.
        size: u32,
        /// The largest page the server will return.
        max: u32,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// The underlying HTTP client could not be constructed.
    #[error("Failed to create HTTP client: {reason}")]
    HttpClient {
        /// The reason reported by the HTTP stack.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_token_error_message() {
        let message = ConfigError::EmptyToken.to_string();
        assert!(message.contains("Token cannot be empty"));
    }

    #[test]
    fn test_invalid_base_url_error_message() {
        let error = ConfigError::InvalidBaseUrl {
            url: "not a url".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("not a url"));
        assert!(message.contains("absolute http(s) URL"));
    }

    #[test]
    fn test_invalid_page_size_error_message() {
        let error = ConfigError::InvalidPageSize {
            size: 5000,
            max: 1000,
        };
        let message = error.to_string();
        assert!(message.contains("5000"));
        assert!(message.contains("1000"));
    }

    #[test]
    fn test_missing_required_field_error_message() {
        let error = ConfigError::MissingRequiredField { field: "token" };
        let message = error.to_string();
        assert!(message.contains("token"));
        assert!(message.contains("must be set"));
    }

    #[test]
    fn test_error_implements_std_error() {
        let error = ConfigError::EmptyToken;
        let _: &dyn std::error::Error = &error;
    }
}
