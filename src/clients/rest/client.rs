//! REST client implementation for the MoySklad JSON API.
//!
//! This module provides the [`RestClient`] type: typed verbs over the
//! transport core. Every verb is one logical request, retried and
//! redirected by the underlying [`HttpClient`].

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::clients::rest::RestError;
use crate::clients::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RequestTarget};
use crate::config::MoySkladConfig;
use crate::error::ConfigError;

/// REST API client for the MoySklad JSON API.
///
/// Targets may be relative paths (`entity/product`) or absolute links taken
/// from a response's `meta.href`; see [`RequestTarget`].
///
/// # Thread Safety
///
/// `RestClient` is `Send + Sync` and can be shared across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use moysklad_api::{AccessToken, MoySkladConfig};
/// use moysklad_api::clients::RestClient;
/// use tokio_util::sync::CancellationToken;
///
/// let config = MoySkladConfig::builder()
///     .token(AccessToken::new("my-token").unwrap())
///     .build()?;
/// let client = RestClient::new(&config)?;
///
/// let cancel = CancellationToken::new();
/// let product: serde_json::Value = client.get("entity/product/42", &[], &cancel).await?;
/// ```
#[derive(Debug)]
pub struct RestClient {
    http_client: HttpClient,
}

// Verify RestClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RestClient>();
};

impl RestClient {
    /// Creates a new REST client.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClient`] if the HTTP client cannot be built.
    pub fn new(config: &MoySkladConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            http_client: HttpClient::new(config)?,
        })
    }

    /// Returns the underlying HTTP client.
    #[must_use]
    pub const fn http_client(&self) -> &HttpClient {
        &self.http_client
    }

    /// Sends a GET request and deserializes the response.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::Http`] for transport and classified failures and
    /// [`RestError::Deserialize`] if the body does not match `T`.
    pub async fn get<T: DeserializeOwned>(
        &self,
        target: impl Into<RequestTarget>,
        query: &[(String, String)],
        cancel: &CancellationToken,
    ) -> Result<T, RestError> {
        let request = HttpRequest::builder(HttpMethod::Get, target)
            .query(query.iter().cloned())
            .build()?;
        self.send_json(&request, cancel).await
    }

    /// Sends a GET request to an absolute link taken from a response.
    ///
    /// Links under the configured base URL are reduced to relative paths;
    /// other links are requested as-is.
    ///
    /// # Errors
    ///
    /// See [`get`](Self::get).
    pub async fn get_by_href<T: DeserializeOwned>(
        &self,
        href: &str,
        cancel: &CancellationToken,
    ) -> Result<T, RestError> {
        self.get(RequestTarget::Link(href.to_string()), &[], cancel)
            .await
    }

    /// Sends a POST request with a JSON body and deserializes the response.
    ///
    /// # Errors
    ///
    /// See [`get`](Self::get). Body serialization failures surface as
    /// [`HttpError::InvalidRequest`](crate::clients::HttpError::InvalidRequest).
    pub async fn post<B, T>(
        &self,
        target: impl Into<RequestTarget>,
        body: &B,
        cancel: &CancellationToken,
    ) -> Result<T, RestError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = HttpRequest::builder(HttpMethod::Post, target)
            .json(body)
            .build()?;
        self.send_json(&request, cancel).await
    }

    /// Sends a PUT request with a JSON body and deserializes the response.
    ///
    /// # Errors
    ///
    /// See [`post`](Self::post).
    pub async fn put<B, T>(
        &self,
        target: impl Into<RequestTarget>,
        body: &B,
        cancel: &CancellationToken,
    ) -> Result<T, RestError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = HttpRequest::builder(HttpMethod::Put, target)
            .json(body)
            .build()?;
        self.send_json(&request, cancel).await
    }

    /// Sends a DELETE request. The response body is discarded.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::Http`] for transport and classified failures.
    pub async fn delete(
        &self,
        target: impl Into<RequestTarget>,
        cancel: &CancellationToken,
    ) -> Result<(), RestError> {
        let request = HttpRequest::builder(HttpMethod::Delete, target).build()?;
        self.http_client.request(&request, cancel).await?;
        Ok(())
    }

    /// Sends a prepared request and returns the raw successful response.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::Http`] for transport and classified failures.
    pub async fn send(
        &self,
        request: &HttpRequest,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse, RestError> {
        Ok(self.http_client.request(request, cancel).await?)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: &HttpRequest,
        cancel: &CancellationToken,
    ) -> Result<T, RestError> {
        let response = self.send(request, cancel).await?;
        response.json().map_err(|source| RestError::Deserialize {
            source,
            body: response.body,
        })
    }
}
