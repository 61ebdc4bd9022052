//! REST-specific error types for the MoySklad API client.
//!
//! # Error Handling
//!
//! - [`RestError::Http`]: Wraps transport and classified HTTP errors
//! - [`RestError::Deserialize`]: A successful response did not match the
//!   expected shape
//!
//! # Example
//!
//! ```rust,ignore
//! use moysklad_api::clients::{HttpError, RestError};
//!
//! match client.get::<serde_json::Value>("entity/product", &[], &cancel).await {
//!     Ok(products) => println!("{products}"),
//!     Err(RestError::Http(HttpError::Unauthorized(_))) => println!("Check the token"),
//!     Err(RestError::Deserialize { body, .. }) => println!("Unexpected body: {body}"),
//!     Err(e) => println!("Other error: {e}"),
//! }
//! ```

use thiserror::Error;

use crate::clients::{HttpError, InvalidHttpRequestError};

/// Error type for REST API operations.
#[derive(Debug, Error)]
pub enum RestError {
    /// An HTTP-level error occurred.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The response body could not be deserialized into the requested type.
    #[error("Failed to deserialize MoySklad response: {source}")]
    Deserialize {
        /// The underlying serde error.
        #[source]
        source: serde_json::Error,
        /// The body that failed to deserialize.
        body: String,
    },
}

impl From<InvalidHttpRequestError> for RestError {
    fn from(error: InvalidHttpRequestError) -> Self {
        Self::Http(HttpError::InvalidRequest(error))
    }
}

impl RestError {
    /// Returns the underlying [`HttpError`], if this is a transport error.
    #[must_use]
    pub const fn as_http(&self) -> Option<&HttpError> {
        match self {
            Self::Http(e) => Some(e),
            Self::Deserialize { .. } => None,
        }
    }

    /// Returns `true` if the server answered 404.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Http(HttpError::NotFound(_)))
    }
}

// Verify RestError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RestError>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_invalid_request_converts_through_http() {
        let error: RestError = InvalidHttpRequestError::EmptyTarget.into();
        assert!(matches!(
            error,
            RestError::Http(HttpError::InvalidRequest(InvalidHttpRequestError::EmptyTarget))
        ));
        assert_eq!(error.to_string(), "Request target cannot be empty.");
    }

    #[test]
    fn test_deserialize_error_keeps_body_and_source() {
        let source = serde_json::from_str::<u32>("\"x\"").unwrap_err();
        let error = RestError::Deserialize {
            source,
            body: "\"x\"".to_string(),
        };

        assert!(error.to_string().starts_with("Failed to deserialize"));
        assert!(error.source().is_some());
        assert!(error.as_http().is_none());
        assert!(!error.is_not_found());
    }

    #[test]
    fn test_is_not_found() {
        let error = RestError::Http(HttpError::NotFound(crate::clients::HttpResponseError {
            code: 404,
            message: "missing".to_string(),
            body: String::new(),
        }));
        assert!(error.is_not_found());
        assert_eq!(error.as_http().and_then(HttpError::status), Some(404));
    }
}
