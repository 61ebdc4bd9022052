//! Resource-specific error types for repository operations.
//!
//! [`ResourceError`] covers argument problems detected before any request is
//! sent, and wraps [`RestError`] for everything that happened on the wire.

use crate::clients::{HttpError, RestError};
use thiserror::Error;

/// Error type for repository operations.
///
/// # Example
///
/// ```rust
/// use moysklad_api::rest::ResourceError;
///
/// let error = ResourceError::EmptyId { resource: "Product" };
/// assert_eq!(error.to_string(), "Product ID cannot be empty");
/// ```
#[derive(Debug, Error)]
pub enum ResourceError {
    /// An identifier argument was empty or whitespace.
    #[error("{resource} ID cannot be empty")]
    EmptyId {
        /// The resource the ID belongs to.
        resource: &'static str,
    },

    /// A bulk operation was called with no items.
    #[error("{resource} batch cannot be empty")]
    EmptyBatch {
        /// The resource type of the batch.
        resource: &'static str,
    },

    /// An entity without an ID was passed to an operation that needs one.
    #[error("{resource} must have an ID for {operation}")]
    MissingId {
        /// The resource type.
        resource: &'static str,
        /// The operation that was attempted.
        operation: &'static str,
    },

    /// A document has neither materialized positions, a positions link,
    /// nor an ID.
    #[error("Cannot load positions: {resource} has neither a positions link nor an ID")]
    PositionsUnavailable {
        /// The document type.
        resource: &'static str,
    },

    /// A REST-level error occurred.
    #[error(transparent)]
    Rest(#[from] RestError),
}

impl From<HttpError> for ResourceError {
    fn from(error: HttpError) -> Self {
        Self::Rest(RestError::Http(error))
    }
}

impl ResourceError {
    /// Returns the underlying [`HttpError`], if the failure came from the wire.
    #[must_use]
    pub const fn as_http(&self) -> Option<&HttpError> {
        match self {
            Self::Rest(e) => e.as_http(),
            _ => None,
        }
    }

    /// Returns `true` if the server answered 404.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Rest(e) if e.is_not_found())
    }
}

// Verify ResourceError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResourceError>();
};
