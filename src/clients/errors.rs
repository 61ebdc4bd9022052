//! HTTP-specific error types for the MoySklad API client.
//!
//! This module contains the error taxonomy raised by the transport core and
//! the response classifier that produces it.
//!
//! # Error Handling
//!
//! - [`HttpResponseError`]: A non-2xx response (401, 404, other 4xx, 5xx)
//! - [`RateLimitedError`]: A 429 response, with the server-suggested wait
//! - [`ValidationFailedError`]: A 400 response, with the per-field error list
//!   when the server sent one
//! - [`RetriesExhaustedError`]: Only retryable failures occurred until the
//!   attempt budget ran out
//! - [`InvalidHttpRequestError`]: A request failed validation before sending
//! - [`HttpError`]: Unified error type encompassing all of the above, plus
//!   connectivity failures and cancellation
//!
//! Rate limiting and connectivity failures are retried by the client. Every
//! other kind surfaces on first occurrence.
//!
//! # Example
//!
//! ```rust,ignore
//! use moysklad_api::clients::HttpError;
//!
//! match client.request(request, &cancel).await {
//!     Ok(response) => println!("Success: {}", response.body),
//!     Err(HttpError::NotFound(e)) => println!("Missing: {}", e.message),
//!     Err(HttpError::Validation(e)) => {
//!         for error in e.errors.iter().flatten() {
//!             println!("{:?}: {:?}", error.parameter, error.message);
//!         }
//!     }
//!     Err(HttpError::RetriesExhausted(e)) => println!("Gave up after {}", e.attempts),
//!     Err(e) => println!("Other error: {e}"),
//! }
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clients::http_response::HttpResponse;

/// Message used when an error payload parses but carries no message.
const UNKNOWN_ERROR: &str = "Unknown Error";

/// A single entry of a structured error payload.
///
/// The server reports request problems as a list of these objects. The
/// `error` field of the wire format is exposed as [`message`](Self::message).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    /// Human-readable description of the problem.
    #[serde(rename = "error", default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// The request parameter the error refers to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
    /// The server's numeric error code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    /// Link to documentation about the error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

/// Error returned when a request receives a non-successful response that has
/// no more specific representation.
///
/// Used for 401, 404, other 4xx and 5xx responses.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("MoySklad API error {code}: {message}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// Message extracted from the error payload, or the raw body.
    pub message: String,
    /// The raw response body.
    pub body: String,
}

/// Error returned for a 429 response.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("MoySklad API error 429: {message}")]
pub struct RateLimitedError {
    /// Message extracted from the error payload, or the raw body.
    pub message: String,
    /// The raw response body.
    pub body: String,
    /// The `Retry-After` delta sent by the server, if any.
    pub retry_after: Option<Duration>,
}

/// Error returned for a 400 response.
///
/// When the server sent a structured error list it is kept in `errors`;
/// otherwise only the message is available.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("MoySklad API error {code}: {message}")]
pub struct ValidationFailedError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// Message extracted from the error payload, or the raw body.
    pub message: String,
    /// The raw response body.
    pub body: String,
    /// The structured per-field errors, when the payload had them.
    pub errors: Option<Vec<ValidationError>>,
}

/// Error returned when the attempt budget ran out while only retryable
/// failures occurred.
#[derive(Debug, Error)]
#[error("Maximum retry attempts exceeded ({attempts}). Last error: {last}")]
pub struct RetriesExhaustedError {
    /// The number of attempts that were made.
    pub attempts: u32,
    /// The failure of the final attempt.
    #[source]
    pub last: Box<HttpError>,
}

/// Error returned when a request fails validation before it is sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// A POST or PUT request was made without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },

    /// The request has no path or link.
    #[error("Request target cannot be empty.")]
    EmptyTarget,

    /// The request target could not be turned into a URL.
    #[error("Invalid request URL '{url}'.")]
    InvalidUrl {
        /// The URL that failed to parse.
        url: String,
    },

    /// The request body could not be serialized to JSON.
    #[error("Failed to serialize request body: {reason}")]
    Serialization {
        /// The serializer's error message.
        reason: String,
    },
}

/// Unified error type for all transport errors.
#[derive(Debug, Error)]
pub enum HttpError {
    /// 401: the token was rejected.
    #[error(transparent)]
    Unauthorized(HttpResponseError),

    /// 404: the resource does not exist.
    #[error(transparent)]
    NotFound(HttpResponseError),

    /// 429: too many requests.
    #[error(transparent)]
    RateLimited(RateLimitedError),

    /// 400: the request was rejected.
    #[error(transparent)]
    Validation(ValidationFailedError),

    /// Any other 4xx response.
    #[error(transparent)]
    Client(HttpResponseError),

    /// 5xx or any other unexpected status.
    #[error(transparent)]
    Server(HttpResponseError),

    /// The request could not complete (DNS, connection refused, timeout).
    #[error("Network error: {0}")]
    Connectivity(#[from] reqwest::Error),

    /// Only retryable failures occurred until attempts ran out.
    #[error(transparent)]
    RetriesExhausted(#[from] RetriesExhaustedError),

    /// The caller cancelled the operation.
    #[error("The operation was cancelled.")]
    Cancelled,

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),
}

impl HttpError {
    /// Classifies a completed, non-successful response.
    ///
    /// The body is parsed as an error payload carrying either a single
    /// `error` message or an `errors` list. A body that does not parse
    /// becomes the message verbatim. Status codes map in this order:
    ///
    /// 1. 401 -> [`Unauthorized`](Self::Unauthorized)
    /// 2. 404 -> [`NotFound`](Self::NotFound)
    /// 3. 429 -> [`RateLimited`](Self::RateLimited)
    /// 4. 400 with an error list -> [`Validation`](Self::Validation) with `errors`
    /// 5. 400 otherwise -> [`Validation`](Self::Validation) without `errors`
    /// 6. other 4xx -> [`Client`](Self::Client)
    /// 7. anything else -> [`Server`](Self::Server)
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::HashMap;
    /// use moysklad_api::clients::{HttpError, HttpResponse};
    ///
    /// let response = HttpResponse::new(
    ///     400,
    ///     HashMap::new(),
    ///     r#"{"errors":[{"error":"name is required","parameter":"name","code":3000}]}"#.to_string(),
    /// );
    ///
    /// match HttpError::from_response(&response) {
    ///     HttpError::Validation(e) => assert_eq!(e.errors.unwrap()[0].code, Some(3000)),
    ///     other => panic!("unexpected {other:?}"),
    /// }
    /// ```
    #[must_use]
    pub fn from_response(response: &HttpResponse) -> Self {
        let code = response.code;
        let body = response.body.clone();
        let (message, errors) = parse_error_payload(&response.body);

        let plain = |message: String, body: String| HttpResponseError {
            code,
            message,
            body,
        };

        match code {
            401 => Self::Unauthorized(plain(message, body)),
            404 => Self::NotFound(plain(message, body)),
            429 => Self::RateLimited(RateLimitedError {
                message,
                body,
                retry_after: response.retry_after,
            }),
            400 => Self::Validation(ValidationFailedError {
                code,
                message,
                body,
                errors,
            }),
            _ if (400..500).contains(&code) => Self::Client(plain(message, body)),
            _ => Self::Server(plain(message, body)),
        }
    }

    /// Returns `true` for the kinds the retry coordinator recovers from.
    ///
    /// A connectivity error raised while building the request is not
    /// transient and is excluded.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited(_) => true,
            Self::Connectivity(e) => !e.is_builder(),
            _ => false,
        }
    }

    /// Returns the HTTP status code of the response behind this error.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized(e) | Self::NotFound(e) | Self::Client(e) | Self::Server(e) => {
                Some(e.code)
            }
            Self::RateLimited(_) => Some(429),
            Self::Validation(e) => Some(e.code),
            Self::Connectivity(e) => e.status().map(|s| s.as_u16()),
            Self::RetriesExhausted(e) => e.last.status(),
            Self::Cancelled | Self::InvalidRequest(_) => None,
        }
    }

    /// Returns the raw response body, when the error came from a response.
    #[must_use]
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Self::Unauthorized(e) | Self::NotFound(e) | Self::Client(e) | Self::Server(e) => {
                Some(&e.body)
            }
            Self::RateLimited(e) => Some(&e.body),
            Self::Validation(e) => Some(&e.body),
            Self::RetriesExhausted(e) => e.last.response_body(),
            Self::Connectivity(_) | Self::Cancelled | Self::InvalidRequest(_) => None,
        }
    }

    /// Returns the server-suggested wait of a rate-limited response.
    #[must_use]
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited(e) => e.retry_after,
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct ApiErrorPayload {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    errors: Option<Vec<ValidationError>>,
}

/// Extracts the message and the structured error list from an error body.
///
/// Never fails: a body that is not a valid payload becomes the message.
fn parse_error_payload(body: &str) -> (String, Option<Vec<ValidationError>>) {
    let Ok(payload) = serde_json::from_str::<ApiErrorPayload>(body) else {
        return (body.to_string(), None);
    };

    match (payload.errors, payload.error) {
        (Some(errors), _) if !errors.is_empty() => {
            let message = errors
                .iter()
                .map(|e| e.message.as_deref().unwrap_or_default())
                .collect::<Vec<_>>()
                .join("; ");
            (message, Some(errors))
        }
        (_, Some(error)) if !error.is_empty() => (error, None),
        _ => (UNKNOWN_ERROR.to_string(), None),
    }
}

// Verify HttpError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpError>();
};
