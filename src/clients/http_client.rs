//! HTTP client for MoySklad API communication.
//!
//! This module provides the [`HttpClient`] type. It owns the transport core:
//! a redirect-aware sender ([`HttpClient::send`]) and the retrying entry
//! point ([`HttpClient::request`]) that classifies failures and hands them
//! to the [`RetryPolicy`].

use std::collections::HashMap;

use reqwest::redirect::Policy;
use reqwest::Url;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::clients::errors::{HttpError, InvalidHttpRequestError};
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::clients::retry::RetryPolicy;
use crate::config::{AccessToken, BaseUrl, MoySkladConfig};
use crate::error::ConfigError;

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Largest number of redirects followed for one attempt.
pub const MAX_REDIRECTS: usize = 10;

/// The `Accept` value the API requires. It must match exactly.
pub const ACCEPT_JSON: &str = "application/json;charset=utf-8";

/// HTTP client for making requests to the MoySklad API.
///
/// The client handles:
/// - URL construction from the configured base URL
/// - Fixed headers (`Accept`, `Accept-Encoding`, `User-Agent`) and the bearer token
/// - Manual redirect following, re-applying authentication on every hop
/// - Classification of non-2xx responses into [`HttpError`]
/// - Retries for rate limiting and connectivity failures
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync` and holds no per-request state, so one
/// instance can serve concurrent calls.
///
/// # Example
///
/// ```rust,ignore
/// use moysklad_api::{AccessToken, MoySkladConfig};
/// use moysklad_api::clients::{HttpClient, HttpMethod, HttpRequest};
/// use tokio_util::sync::CancellationToken;
///
/// let config = MoySkladConfig::builder()
///     .token(AccessToken::new("my-token").unwrap())
///     .build()
///     .unwrap();
/// let client = HttpClient::new(&config)?;
///
/// let request = HttpRequest::builder(HttpMethod::Get, "entity/product")
///     .query_param("limit", "10")
///     .build()?;
///
/// let response = client.request(&request, &CancellationToken::new()).await?;
/// ```
#[derive(Debug)]
pub struct HttpClient {
    /// The internal reqwest HTTP client. Redirects are disabled on it.
    client: reqwest::Client,
    base_url: BaseUrl,
    token: AccessToken,
    /// Headers sent on every request and every redirect hop.
    default_headers: HashMap<String, String>,
    retry_policy: RetryPolicy,
    debug: bool,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClient`] if the underlying reqwest client
    /// cannot be created (e.g., TLS initialization failure).
    pub fn new(config: &MoySkladConfig) -> Result<Self, ConfigError> {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let user_agent = format!("{user_agent_prefix}MoySklad-Rust-Client/{SDK_VERSION}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), ACCEPT_JSON.to_string());
        default_headers.insert("Accept-Encoding".to_string(), "gzip".to_string());

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .gzip(true)
            .redirect(Policy::none())
            .timeout(config.timeout())
            .build()
            .map_err(|e| ConfigError::HttpClient {
                reason: e.to_string(),
            })?;

        if config.debug() {
            debug!(
                base_url = %config.base_url(),
                timeout_ms = u64::try_from(config.timeout().as_millis()).unwrap_or(u64::MAX),
                max_attempts = config.retry_policy().max_attempts(),
                "created MoySklad HTTP client"
            );
        }

        Ok(Self {
            client,
            base_url: config.base_url().clone(),
            token: config.token().clone(),
            default_headers,
            retry_policy: *config.retry_policy(),
            debug: config.debug(),
        })
    }

    /// Returns the base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the headers sent with every request, excluding `Authorization`.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Returns the retry policy used by [`request`](Self::request).
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Sends a request and returns its successful response.
    ///
    /// Each attempt goes through [`send`](Self::send); a non-2xx final
    /// response is classified with [`HttpError::from_response`]. Rate
    /// limiting and connectivity failures are retried according to the
    /// configured [`RetryPolicy`].
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Request validation fails (`InvalidRequest`)
    /// - The response is a classified failure (`Unauthorized`, `NotFound`,
    ///   `Validation`, `Client`, `Server`)
    /// - Every allowed attempt hit a retryable failure (`RetriesExhausted`)
    /// - `cancel` fires (`Cancelled`)
    pub async fn request(
        &self,
        request: &HttpRequest,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        self.retry_policy
            .run(cancel, move |_| async move {
                let response = self.send(request, cancel).await?;
                if response.is_ok() {
                    Ok(response)
                } else {
                    Err(HttpError::from_response(&response))
                }
            })
            .await
    }

    /// Performs one attempt of `request`, following redirects.
    ///
    /// Up to [`MAX_REDIRECTS`] redirects (301, 302, 303, 307, 308) are
    /// followed. A relative `Location` resolves against the base URL. A 303
    /// turns the next hop into a bodiless GET; every other redirect keeps
    /// the method and body. Fixed headers and the token are applied to each
    /// hop. Intermediate responses are discarded. If the limit is reached
    /// the last redirect response is returned as-is.
    ///
    /// The response is not classified: a non-2xx status is still `Ok`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Connectivity`] on transport failures,
    /// [`HttpError::InvalidRequest`] for an unusable URL or `Location` and
    /// [`HttpError::Cancelled`] if `cancel` fires.
    pub async fn send(
        &self,
        request: &HttpRequest,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let mut url = request.url(&self.base_url)?;
        let mut method = request.http_method;
        let mut body = request.body.as_ref();
        let mut redirects = 0;

        loop {
            let response = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(HttpError::Cancelled),
                response = self.execute(method, &url, body) => response?,
            };

            if !response.is_redirect() || redirects >= MAX_REDIRECTS {
                return Ok(response);
            }
            let Some(location) = response.location() else {
                return Ok(response);
            };

            let next = self
                .base_url
                .url()
                .join(location)
                .map_err(|_| InvalidHttpRequestError::InvalidUrl {
                    url: location.to_string(),
                })?;

            if response.code == 303 {
                method = HttpMethod::Get;
                body = None;
            }
            redirects += 1;

            if self.debug {
                debug!(
                    status = response.code,
                    from = %url,
                    to = %next,
                    hop = redirects,
                    "following MoySklad redirect"
                );
            }
            url = next;
        }
    }

    /// Executes a single HTTP exchange and reads the whole body.
    async fn execute(
        &self,
        method: HttpMethod,
        url: &Url,
        body: Option<&Value>,
    ) -> Result<HttpResponse, HttpError> {
        let mut req_builder = self
            .client
            .request(method.into(), url.clone())
            .header("Authorization", self.token.bearer());

        for (key, value) in &self.default_headers {
            req_builder = req_builder.header(key, value);
        }

        if let Some(body) = body {
            req_builder = req_builder.json(body);
        }

        if self.debug {
            debug!(%method, %url, body = ?body, "sending MoySklad request");
        }

        let res = req_builder.send().await?;

        let code = res.status().as_u16();
        let headers = Self::parse_response_headers(res.headers());
        let body_text = res.text().await?;

        if self.debug {
            debug!(%method, %url, status = code, body = %body_text, "received MoySklad response");
        }

        Ok(HttpResponse::new(code, headers, body_text))
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}
