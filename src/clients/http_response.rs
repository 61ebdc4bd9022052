//! HTTP response types for the MoySklad API client.
//!
//! This module provides the [`HttpResponse`] type: the status, headers and raw
//! body of one completed exchange. Responses are produced per attempt and
//! discarded once the caller has consumed the body.

use std::collections::HashMap;
use std::time::Duration;

use serde::de::DeserializeOwned;

/// Status codes that the redirect-aware sender follows.
pub const REDIRECT_STATUSES: [u16; 5] = [301, 302, 303, 307, 308];

/// An HTTP response from the MoySklad API.
///
/// Header names are stored lowercased; a header may carry several values.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers (headers may have multiple values).
    pub headers: HashMap<String, Vec<String>>,
    /// The raw response body, decompressed and decoded as text.
    pub body: String,
    /// Delay suggested by the `Retry-After` header.
    pub retry_after: Option<Duration>,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`, parsing the `Retry-After` header.
    ///
    /// Only the delta-seconds form of `Retry-After` is understood; an
    /// HTTP-date or malformed value yields `None`.
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, body: String) -> Self {
        let retry_after = headers
            .get("retry-after")
            .and_then(|values| values.first())
            .and_then(|value| parse_retry_after(value));

        Self {
            code,
            headers,
            body,
            retry_after,
        }
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns `true` if the status is one the client follows as a redirect.
    #[must_use]
    pub fn is_redirect(&self) -> bool {
        REDIRECT_STATUSES.contains(&self.code)
    }

    /// Returns the first value of a header, matched case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the `Location` header value, if present.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.header("location")
    }

    /// Deserializes the body into `T`.
    ///
    /// An empty body is treated as JSON `null`, so `Option<T>`, `()` and
    /// [`serde_json::Value`] targets accept bodiless responses.
    ///
    /// # Errors
    ///
    /// Returns the [`serde_json::Error`] if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        if self.body.trim().is_empty() {
            serde_json::from_str("null")
        } else {
            serde_json::from_str(&self.body)
        }
    }
}

/// Parses a `Retry-After` delta in (possibly fractional) seconds.
fn parse_retry_after(value: &str) -> Option<Duration> {
    let seconds = value.trim().parse::<f64>().ok()?;
    Duration::try_from_secs_f64(seconds).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn with_header(name: &str, value: &str) -> HashMap<String, Vec<String>> {
        let mut headers = HashMap::new();
        headers.insert(name.to_string(), vec![value.to_string()]);
        headers
    }

    #[test]
    fn test_is_ok_returns_true_for_2xx() {
        for code in 200..=299 {
            let response = HttpResponse::new(code, HashMap::new(), String::new());
            assert!(
                response.is_ok(),
                "Expected is_ok() to be true for code {code}"
            );
        }
    }

    #[test]
    fn test_is_ok_returns_false_for_other_codes() {
        for code in [199, 300, 302, 400, 404, 429, 500] {
            let response = HttpResponse::new(code, HashMap::new(), String::new());
            assert!(!response.is_ok(), "code {code}");
        }
    }

    #[test]
    fn test_is_redirect_matches_followed_statuses_only() {
        for code in REDIRECT_STATUSES {
            assert!(HttpResponse::new(code, HashMap::new(), String::new()).is_redirect());
        }
        for code in [300, 304, 305, 200, 404] {
            assert!(!HttpResponse::new(code, HashMap::new(), String::new()).is_redirect());
        }
    }

    #[test]
    fn test_retry_after_parsing() {
        let response = HttpResponse::new(429, with_header("retry-after", "5"), String::new());
        assert_eq!(response.retry_after, Some(Duration::from_secs(5)));

        let response = HttpResponse::new(429, with_header("retry-after", "2.5"), String::new());
        assert_eq!(response.retry_after, Some(Duration::from_millis(2500)));
    }

    #[test]
    fn test_retry_after_ignores_dates_and_garbage() {
        for value in [
            "Wed, 21 Oct 2015 07:28:00 GMT",
            "soon",
            "-3",
            "NaN",
            "inf",
            "1e30",
        ] {
            let response = HttpResponse::new(429, with_header("retry-after", value), String::new());
            assert_eq!(response.retry_after, None, "value {value}");
        }
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let response = HttpResponse::new(
            302,
            with_header("location", "https://api.example.com/next"),
            String::new(),
        );
        assert_eq!(response.header("Location"), Some("https://api.example.com/next"));
        assert_eq!(response.location(), Some("https://api.example.com/next"));
        assert_eq!(response.header("X-Missing"), None);
    }

    #[test]
    fn test_json_deserializes_body() {
        let response = HttpResponse::new(200, HashMap::new(), r#"{"id":"a","n":1}"#.to_string());
        let value: serde_json::Value = response.json().unwrap();
        assert_eq!(value, json!({"id": "a", "n": 1}));
    }

    #[test]
    fn test_json_treats_empty_body_as_null() {
        let response = HttpResponse::new(200, HashMap::new(), String::new());
        let value: Option<serde_json::Value> = response.json().unwrap();
        assert!(value.is_none());

        let unit: () = response.json().unwrap();
        let () = unit;
    }
}
