//! HTTP response type for the Braintree bridge.
//!
//! This module provides the [`HttpResponse`] type: the raw outcome of one
//! attempt, before any GraphQL interpretation.

use std::collections::HashMap;
use std::time::Duration;

/// Longest server-requested wait that is honored; larger values are capped.
pub const MAX_RETRY_AFTER: Duration = Duration::from_secs(300);

/// A raw HTTP response from the Braintree GraphQL endpoint.
///
/// The body is kept as text; parsing is the executor's job so that a
/// malformed body becomes a diagnosable protocol error.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers, lowercased (headers may have multiple values).
    pub headers: HashMap<String, Vec<String>>,
    /// The response body text.
    pub body: String,
    /// Wait requested by the server (from `Retry-After` header).
    pub retry_request_after: Option<Duration>,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`, parsing the `Retry-After` header.
    ///
    /// Only numeric `Retry-After` values (whole or fractional seconds) are
    /// honored; HTTP-date values are ignored. Values beyond
    /// [`MAX_RETRY_AFTER`] are capped.
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, body: String) -> Self {
        let retry_request_after = headers
            .get("retry-after")
            .and_then(|values| values.first())
            .and_then(|value| value.trim().parse::<f64>().ok())
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
            .map(|wait| wait.min(MAX_RETRY_AFTER));

        Self {
            code,
            headers,
            body,
            retry_request_after,
        }
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns `true` for responses worth retrying: 429 and any 5xx.
    #[must_use]
    pub const fn is_retryable_status(&self) -> bool {
        self.code == 429 || self.code >= 500
    }

    /// Returns the `Content-Type` header value, if present.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Returns the first value of a header by lowercase name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> HashMap<String, Vec<String>> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), vec![(*v).to_string()]))
            .collect()
    }

    #[test]
    fn test_is_ok_returns_true_for_2xx() {
        for code in 200..=299 {
            let response = HttpResponse::new(code, HashMap::new(), String::new());
            assert!(response.is_ok(), "Expected is_ok() to be true for code {code}");
        }
    }

    #[test]
    fn test_retryable_status_classification() {
        for (code, expected) in [(200, false), (400, false), (404, false), (429, true), (500, true), (503, true)] {
            let response = HttpResponse::new(code, HashMap::new(), String::new());
            assert_eq!(response.is_retryable_status(), expected, "code {code}");
        }
    }

    #[test]
    fn test_retry_after_parsing() {
        let response = HttpResponse::new(429, headers(&[("retry-after", "5")]), String::new());
        assert_eq!(response.retry_request_after, Some(Duration::from_secs(5)));

        let response = HttpResponse::new(429, headers(&[("retry-after", "2.5")]), String::new());
        assert_eq!(response.retry_request_after, Some(Duration::from_millis(2500)));
    }

    #[test]
    fn test_retry_after_out_of_range_is_capped() {
        let response = HttpResponse::new(
            429,
            headers(&[("retry-after", "99999999999999999999")]),
            String::new(),
        );
        assert_eq!(response.retry_request_after, Some(MAX_RETRY_AFTER));

        let response = HttpResponse::new(200, headers(&[("retry-after", "1e400")]), "{}".to_string());
        assert!(response.retry_request_after.is_none());

        let response = HttpResponse::new(429, headers(&[("retry-after", "NaN")]), String::new());
        assert!(response.retry_request_after.is_none());
    }

    #[test]
    fn test_retry_after_ignores_non_numeric_values() {
        let response = HttpResponse::new(
            429,
            headers(&[("retry-after", "Wed, 21 Oct 2015 07:28:00 GMT")]),
            String::new(),
        );
        assert!(response.retry_request_after.is_none());

        let response = HttpResponse::new(429, headers(&[("retry-after", "-3")]), String::new());
        assert!(response.retry_request_after.is_none());
    }

    #[test]
    fn test_content_type_lookup() {
        let response = HttpResponse::new(
            200,
            headers(&[("content-type", "application/json; charset=utf-8")]),
            "{}".to_string(),
        );
        assert_eq!(response.content_type(), Some("application/json; charset=utf-8"));
    }
}
