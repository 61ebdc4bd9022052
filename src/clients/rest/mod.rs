//! REST API client for the MoySklad JSON API.
//!
//! This module provides a higher-level client built on top of the
//! [`HttpClient`](crate::clients::HttpClient) with typed verbs.
//!
//! # Overview
//!
//! - [`RestClient`]: The REST client with `get()`, `get_by_href()`, `post()`,
//!   `put()` and `delete()` methods
//! - [`RestError`]: Error type for REST operations
//!
//! Responses are deserialized into a caller-chosen type. An empty success
//! body reads as JSON `null`, so `Option<T>`, `()` and
//! [`serde_json::Value`] accept bodiless responses.

mod client;
mod errors;

pub use client::RestClient;
pub use errors::RestError;
