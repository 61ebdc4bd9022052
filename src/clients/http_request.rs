//! HTTP request types for the MoySklad API client.
//!
//! This module provides the [`HttpRequest`] type and its builder. A request
//! names its target either as a path relative to the configured base URL or
//! as an absolute link taken from a previous response; both resolve through
//! [`HttpRequest::url`].

use std::fmt;

use reqwest::Url;
use serde::Serialize;
use serde_json::Value;

use crate::clients::errors::InvalidHttpRequestError;
use crate::clients::wire::to_wire_value;
use crate::config::BaseUrl;

/// HTTP methods supported by the MoySklad API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources and bulk operations.
    Post,
    /// HTTP PUT method for updating resources.
    Put,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "get"),
            Self::Post => write!(f, "post"),
            Self::Put => write!(f, "put"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::GET,
            HttpMethod::Post => Self::POST,
            HttpMethod::Put => Self::PUT,
            HttpMethod::Delete => Self::DELETE,
        }
    }
}

/// Where a request is sent.
///
/// Converting from a string picks the variant automatically: values starting
/// with `http://` or `https://` are links, everything else is a path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestTarget {
    /// A path relative to the base URL, e.g. `entity/product`.
    Path(String),
    /// An absolute URL taken from a response, e.g. a `meta.href`.
    Link(String),
}

impl RequestTarget {
    /// Returns the raw path or link.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Path(value) | Self::Link(value) => value,
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            Self::Path(path) => path.trim_start_matches('/').is_empty(),
            Self::Link(link) => link.is_empty(),
        }
    }
}

impl From<&str> for RequestTarget {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<String> for RequestTarget {
    fn from(value: String) -> Self {
        let lower = value.get(..8).unwrap_or(&value).to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Link(value)
        } else {
            Self::Path(value)
        }
    }
}

impl fmt::Display for RequestTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request to be sent to the MoySklad API.
///
/// Use [`HttpRequest::builder`] to construct requests with the builder pattern.
/// A built request is immutable; a redirect produces a new request at the
/// transport level rather than modifying this one.
///
/// # Example
///
/// ```rust
/// use moysklad_api::clients::{HttpRequest, HttpMethod};
/// use serde_json::json;
///
/// // GET request with ordered query parameters
/// let get_request = HttpRequest::builder(HttpMethod::Get, "entity/product")
///     .query_param("filter", "archived=false")
///     .query_param("limit", "100")
///     .build()
///     .unwrap();
///
/// // POST request with a JSON body
/// let post_request = HttpRequest::builder(HttpMethod::Post, "entity/product")
///     .json(&json!({"name": "Widget"}))
///     .build()
///     .unwrap();
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    /// The HTTP method for this request.
    pub http_method: HttpMethod,
    /// The path or link this request is sent to.
    pub target: RequestTarget,
    /// Query parameters, in the order they are sent.
    pub query: Vec<(String, String)>,
    /// The normalized JSON body, if any.
    pub body: Option<Value>,
}

impl HttpRequest {
    /// Creates a new builder for constructing an `HttpRequest`.
    #[must_use]
    pub fn builder(method: HttpMethod, target: impl Into<RequestTarget>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(method, target.into())
    }

    /// Validates the request, ensuring it meets all requirements.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if:
    /// - the target is empty
    /// - `http_method` is `Post` or `Put` but `body` is `None`
    pub fn verify(&self) -> Result<(), InvalidHttpRequestError> {
        if self.target.is_empty() {
            return Err(InvalidHttpRequestError::EmptyTarget);
        }

        if matches!(self.http_method, HttpMethod::Post | HttpMethod::Put) && self.body.is_none() {
            return Err(InvalidHttpRequestError::MissingBody {
                method: self.http_method.to_string(),
            });
        }

        Ok(())
    }

    /// Resolves the full request URL against `base`.
    ///
    /// Paths are appended to the base URL. Links that start with the base URL
    /// (compared case-insensitively) are reduced to their relative part and
    /// treated like paths; other links are used as-is. Query parameters are
    /// appended after any query string the target already carries.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError::InvalidUrl`] if the result does not
    /// parse as a URL.
    pub fn url(&self, base: &BaseUrl) -> Result<Url, InvalidHttpRequestError> {
        let mut url = match &self.target {
            RequestTarget::Path(path) => join_base(base, path),
            RequestTarget::Link(link) => base
                .relative_link(link)
                .map_or_else(|| link.clone(), |relative| join_base(base, relative)),
        };

        if !self.query.is_empty() {
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(&encode_query(&self.query));
        }

        Url::parse(&url).map_err(|_| InvalidHttpRequestError::InvalidUrl { url })
    }
}

fn join_base(base: &BaseUrl, path: &str) -> String {
    format!("{}{}", base.as_ref(), path.trim_start_matches('/'))
}

/// Encodes query parameters as `key=value` pairs joined with `&`.
///
/// Keys and values are percent-encoded; order and duplicates are preserved.
#[must_use]
pub fn encode_query(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Builder for constructing [`HttpRequest`] instances.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    http_method: HttpMethod,
    target: RequestTarget,
    query: Vec<(String, String)>,
    body: Option<Value>,
    body_error: Option<String>,
}

impl HttpRequestBuilder {
    fn new(method: HttpMethod, target: RequestTarget) -> Self {
        Self {
            http_method: method,
            target,
            query: Vec::new(),
            body: None,
            body_error: None,
        }
    }

    /// Appends query parameters, keeping their order.
    #[must_use]
    pub fn query<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Appends a single query parameter.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Sets the JSON body.
    ///
    /// The value is serialized immediately with [`to_wire_value`]. A
    /// serialization failure is reported by [`build`](Self::build).
    #[must_use]
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Self {
        match to_wire_value(body) {
            Ok(value) => {
                self.body = Some(value);
                self.body_error = None;
            }
            Err(e) => self.body_error = Some(e.to_string()),
        }
        self
    }

    /// Builds the [`HttpRequest`], validating it in the process.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if the body failed to serialize or
    /// the request fails validation.
    pub fn build(self) -> Result<HttpRequest, InvalidHttpRequestError> {
        if let Some(reason) = self.body_error {
            return Err(InvalidHttpRequestError::Serialization { reason });
        }

        let request = HttpRequest {
            http_method: self.http_method,
            target: self.target,
            query: self.query,
            body: self.body,
        };
        request.verify()?;
        Ok(request)
    }
}
