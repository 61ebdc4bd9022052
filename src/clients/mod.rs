//! HTTP client types for MoySklad API communication.
//!
//! This module provides the transport core of the crate: building requests,
//! sending them with manual redirect handling, classifying failed responses
//! and retrying transient failures.
//!
//! # Overview
//!
//! - [`HttpClient`]: The async HTTP client (redirect-aware sender plus retries)
//! - [`HttpRequest`]: A request to be sent to the API
//! - [`HttpResponse`]: One completed exchange
//! - [`HttpMethod`]: Supported HTTP methods (GET, POST, PUT, DELETE)
//! - [`RequestTarget`]: A relative path or an absolute link
//! - [`RetryPolicy`]: Attempt budget and backoff rules
//! - [`HttpError`]: The error taxonomy produced by the response classifier
//! - [`rest::RestClient`]: Typed REST verbs on top of [`HttpClient`]
//!
//! # Retry Behavior
//!
//! - **429 (Rate Limited)**: waits the `Retry-After` delta, or the configured
//!   rate limit delay when the header is missing
//! - **Connectivity failures** (DNS, refused connection, timeout): waits
//!   `base_delay * 2^attempt`
//! - **Everything else**: returned immediately
//!
//! When the attempt budget runs out on retryable failures the caller receives
//! [`HttpError::RetriesExhausted`] wrapping the last failure.

mod errors;
mod http_client;
mod http_request;
mod http_response;
pub mod rest;
mod retry;
mod wire;

pub use errors::{
    HttpError, HttpResponseError, InvalidHttpRequestError, RateLimitedError,
    RetriesExhaustedError, ValidationError, ValidationFailedError,
};
pub use http_client::{HttpClient, ACCEPT_JSON, MAX_REDIRECTS, SDK_VERSION};
pub use http_request::{
    encode_query, HttpMethod, HttpRequest, HttpRequestBuilder, RequestTarget,
};
pub use http_response::{HttpResponse, REDIRECT_STATUSES};
pub use retry::RetryPolicy;
pub use wire::to_wire_value;

// Re-export REST client types at the clients module level
pub use rest::{RestClient, RestError};
