//! HTTP-specific error types for the Braintree bridge.
//!
//! - [`HttpStatusError`]: non-2xx HTTP responses from Braintree
//! - [`HttpError`]: unified error type for one HTTP attempt
//!
//! These errors never leave the request executor as `Err`; the executor
//! classifies them and folds them into an error-shaped GraphQL result.

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use crate::json;

/// Error returned when an attempt receives a non-successful response.
///
/// The message follows the `HTTP Status Error: <code> - <detail>` format,
/// where the detail is taken from the response body when possible.
///
/// # Example
///
/// ```rust
/// use braintree_bridge::clients::HttpStatusError;
///
/// let error = HttpStatusError::from_body(401, r#"{"error": {"message": "Authentication failed"}}"#, None);
/// assert_eq!(error.to_string(), "HTTP Status Error: 401 - Authentication failed");
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct HttpStatusError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// Human-readable description including the status code.
    pub message: String,
    /// Wait requested by the server through `Retry-After`, if numeric.
    pub retry_after: Option<Duration>,
}

impl HttpStatusError {
    /// Builds a status error, extracting a detail from the response body.
    ///
    /// The detail is the first `errors[].message`, else `error.message`,
    /// else the first 200 characters of the body.
    #[must_use]
    pub fn from_body(code: u16, body: &str, content_type: Option<&str>) -> Self {
        let detail = json::parse_body(body, content_type)
            .ok()
            .and_then(|parsed| Self::detail_from(&parsed))
            .unwrap_or_else(|| format!("Response: {}", json::snippet(body)));

        Self {
            code,
            message: format!("HTTP Status Error: {code} - {detail}"),
            retry_after: None,
        }
    }

    /// Attaches the server-requested wait to this error.
    #[must_use]
    pub const fn with_retry_after(mut self, retry_after: Option<Duration>) -> Self {
        self.retry_after = retry_after;
        self
    }

    fn detail_from(body: &Value) -> Option<String> {
        body.get("errors")
            .and_then(Value::as_array)
            .and_then(|errors| errors.first())
            .and_then(|first| first.get("message"))
            .or_else(|| body.get("error").and_then(|e| e.get("message")))
            .and_then(Value::as_str)
            .map(String::from)
    }
}

/// Unified error type for a single HTTP attempt.
#[derive(Debug, Error)]
pub enum HttpError {
    /// A non-2xx HTTP response.
    #[error(transparent)]
    Status(#[from] HttpStatusError),

    /// Network, connection, or timeout error.
    #[error("HTTP Request Error connecting to Braintree: {0}")]
    Network(#[from] reqwest::Error),
}

impl HttpError {
    /// Returns `true` for failures that may succeed on another attempt:
    /// 429, 5xx, and connection-level errors other than request-building errors.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Status(e) => e.code == 429 || e.code >= 500,
            Self::Network(e) => !e.is_builder(),
        }
    }

    /// Returns the wait requested by a 429 response, if any.
    #[must_use]
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Status(e) if e.code == 429 => e.retry_after,
            _ => None,
        }
    }

    /// Returns the HTTP status code, if the attempt got a response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status(e) => Some(e.code),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_uses_graphql_error_message() {
        let error = HttpStatusError::from_body(
            422,
            r#"{"errors": [{"message": "Variable 'input' has an invalid value"}]}"#,
            Some("application/json"),
        );
        assert_eq!(
            error.message,
            "HTTP Status Error: 422 - Variable 'input' has an invalid value"
        );
    }

    #[test]
    fn test_status_error_falls_back_to_body_snippet() {
        let body = format!("<html>{}</html>", "x".repeat(400));
        let error = HttpStatusError::from_body(403, &body, Some("text/html"));
        assert!(error.message.starts_with("HTTP Status Error: 403 - Response: <html>"));
        assert!(error.message.ends_with("..."));
    }

    #[test]
    fn test_status_error_with_empty_body() {
        let error = HttpStatusError::from_body(404, "", None);
        assert_eq!(error.message, "HTTP Status Error: 404 - Response: ");
    }

    #[test]
    fn test_status_transience() {
        let transient = |code| {
            HttpError::Status(HttpStatusError {
                code,
                message: String::new(),
                retry_after: None,
            })
            .is_transient()
        };
        assert!(transient(429));
        assert!(transient(500));
        assert!(transient(502));
        assert!(!transient(400));
        assert!(!transient(401));
        assert!(!transient(404));
    }

    #[test]
    fn test_error_types_implement_std_error() {
        let error: &dyn std::error::Error = &HttpStatusError {
            code: 400,
            message: "test".to_string(),
            retry_after: None,
        };
        let _ = error;
    }
}
