//! # MoySklad API Rust Client
//!
//! An async client for the MoySklad JSON API (`api/remap/1.2`), built around
//! a transport core that survives flaky networks and rate limits.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`MoySkladConfig`] and [`MoySkladConfigBuilder`]
//! - A transport that follows redirects manually, classifies every response
//!   into a typed [`HttpError`], and retries rate limits and connectivity
//!   failures with backoff
//! - Exhaustive pagination of list endpoints, by path or by follow-link
//! - A generic [`rest::EntityRepository`] for CRUD, bulk and metadata calls,
//!   with helpers for the positions of trade documents
//! - Custom attributes and server-local timestamps in [`model`]
//!
//! Every async operation takes a
//! [`CancellationToken`](tokio_util::sync::CancellationToken). Cancelling it
//! aborts the in-flight request or retry wait with [`HttpError::Cancelled`].
//!
//! ## Quick Start
//!
//! ```rust
//! use std::time::Duration;
//! use moysklad_api::{AccessToken, MoySkladConfig};
//!
//! let config = MoySkladConfig::builder()
//!     .token(AccessToken::new("your-token").unwrap())
//!     .timeout(Duration::from_secs(30))
//!     .page_size(500)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.page_size(), 500);
//! ```
//!
//! ## Making API Requests
//!
//! ```rust,ignore
//! use moysklad_api::{MoySkladClient, MoySkladConfig, AccessToken};
//! use moysklad_api::rest::QueryBuilder;
//! use tokio_util::sync::CancellationToken;
//!
//! let client = MoySkladClient::new(config)?;
//! let cancel = CancellationToken::new();
//!
//! // One page
//! let page: moysklad_api::rest::ListEntity<serde_json::Value> = client
//!     .rest()
//!     .get("entity/product", &QueryBuilder::new().limit(10).to_params(), &cancel)
//!     .await?;
//!
//! // Every row
//! let all: Vec<serde_json::Value> = client
//!     .paginator()
//!     .fetch_all_by_path("entity/product", Vec::new(), &cancel)
//!     .await?;
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: All newtypes validate on construction
//! - **Thread-safe**: All client types are `Send + Sync`
//! - **Async-first**: Designed for use with the Tokio runtime

mod client;

pub mod clients;
pub mod config;
pub mod error;
pub mod model;
pub mod rest;

pub use client::MoySkladClient;
pub use config::{AccessToken, BaseUrl, MoySkladConfig, MoySkladConfigBuilder, MAX_PAGE_SIZE};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder, HttpResponse,
    HttpResponseError, InvalidHttpRequestError, RateLimitedError, RestClient, RestError,
    RetriesExhaustedError, RetryPolicy, ValidationFailedError,
};

pub use rest::ResourceError;
