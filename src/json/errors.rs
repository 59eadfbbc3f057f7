//! Protocol error type for response bodies that cannot be used.

use serde_json::{json, Value};
use thiserror::Error;

/// Error returned when a response body is not usable GraphQL JSON.
///
/// Protocol errors are never retried: a malformed body or an HTML error page
/// will not fix itself on a second attempt.
///
/// # Example
///
/// ```rust
/// use braintree_bridge::json::ProtocolError;
///
/// let error = ProtocolError::with_context("Invalid JSON response", "{\"data\": ");
/// assert_eq!(error.to_string(), "Invalid JSON response");
/// assert_eq!(error.context(), Some("{\"data\": "));
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ProtocolError {
    message: String,
    context: Option<String>,
    position: Option<usize>,
}

impl ProtocolError {
    /// Creates a protocol error without body context.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            position: None,
        }
    }

    /// Creates a protocol error carrying a snippet of the offending body.
    #[must_use]
    pub fn with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Some(context.into()),
            position: None,
        }
    }

    /// Records the byte offset at which parsing failed.
    #[must_use]
    pub const fn with_position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    /// Returns the error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the body snippet, if any.
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Returns the byte offset of a JSON syntax error, if any.
    #[must_use]
    pub const fn position(&self) -> Option<usize> {
        self.position
    }

    /// Converts the error into a GraphQL error entry value.
    #[must_use]
    pub fn to_error_entry(&self) -> Value {
        let mut entry = json!({ "message": self.message });
        if let Some(context) = &self.context {
            entry["context"] = Value::String(context.clone());
        }
        if let Some(position) = self.position {
            entry["position"] = json!(position);
        }
        entry
    }

    /// Converts the error into a `{"errors": [..]}` value.
    #[must_use]
    pub fn to_graphql_value(&self) -> Value {
        json!({ "errors": [self.to_error_entry()] })
    }
}
