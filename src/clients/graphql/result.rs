//! Normalized GraphQL result type.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::json::{self, ProtocolError};

/// Message used for error entries that carry no `message` field.
const UNKNOWN_ERROR: &str = "Unknown error";

/// One entry of a GraphQL `errors` array.
///
/// Fields other than `message` (`path`, `locations`, `extensions`, parse
/// context) are preserved in `extra`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GraphqlErrorEntry {
    /// The error message.
    pub message: String,
    /// Any additional fields of the entry.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GraphqlErrorEntry {
    /// Creates an entry with only a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            extra: Map::new(),
        }
    }

    fn from_value(value: Value) -> Self {
        match value {
            Value::Object(mut map) => {
                let message = match map.remove("message") {
                    Some(Value::String(message)) => message,
                    Some(Value::Null) | None => UNKNOWN_ERROR.to_string(),
                    Some(other) => other.to_string(),
                };
                Self {
                    message,
                    extra: map,
                }
            }
            Value::String(message) => Self::new(message),
            other => Self::new(other.to_string()),
        }
    }
}

/// The outcome of one executor call: `{data?, errors?, extensions?}`.
///
/// Success and failure may co-occur (partial data); callers check
/// [`has_errors`](Self::has_errors) before reading `data`.
///
/// # Example
///
/// ```rust
/// use braintree_bridge::clients::graphql::GraphqlResult;
/// use serde_json::json;
///
/// let result = GraphqlResult::from_value(json!({
///     "data": null,
///     "errors": [{"message": "Not found"}, {"message": "Try again"}]
/// }));
/// assert!(result.has_errors());
/// assert_eq!(result.joined_errors(), "Not found, Try again");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct GraphqlResult {
    /// The `data` member, kept as `Some(Value::Null)` when explicitly null.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// The `errors` member.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<GraphqlErrorEntry>>,
    /// The `extensions` member.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

impl GraphqlResult {
    /// Builds a result from a parsed response body.
    ///
    /// A body that is not a JSON object becomes an error result.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        let mut map = match value {
            Value::Object(map) => map,
            other => {
                return Self::from_error(format!(
                    "Unexpected response structure: {}",
                    json::snippet(&other.to_string())
                ));
            }
        };

        let errors = map.remove("errors").and_then(|errors| match errors {
            Value::Null => None,
            Value::Array(entries) => Some(
                entries
                    .into_iter()
                    .map(GraphqlErrorEntry::from_value)
                    .collect(),
            ),
            other => Some(vec![GraphqlErrorEntry::from_value(other)]),
        });

        Self {
            data: map.remove("data"),
            errors,
            extensions: map.remove("extensions"),
        }
    }

    /// Builds a result carrying a single error message.
    #[must_use]
    pub fn from_error(message: impl Into<String>) -> Self {
        Self {
            errors: Some(vec![GraphqlErrorEntry::new(message)]),
            ..Self::default()
        }
    }

    /// Builds a result from a protocol error, keeping its context and position.
    #[must_use]
    pub fn from_protocol_error(error: &ProtocolError) -> Self {
        Self {
            errors: Some(vec![GraphqlErrorEntry::from_value(error.to_error_entry())]),
            ..Self::default()
        }
    }

    /// Returns `true` when the result carries at least one error entry.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.errors.as_ref().is_some_and(|errors| !errors.is_empty())
    }

    /// Returns the error entries (empty when there are none).
    #[must_use]
    pub fn errors(&self) -> &[GraphqlErrorEntry] {
        self.errors.as_deref().unwrap_or_default()
    }

    /// Returns an iterator over error messages.
    pub fn error_messages(&self) -> impl Iterator<Item = &str> {
        self.errors().iter().map(|entry| entry.message.as_str())
    }

    /// Joins all error messages with `", "`.
    #[must_use]
    pub fn joined_errors(&self) -> String {
        self.error_messages().collect::<Vec<_>>().join(", ")
    }

    /// Returns the `data` member when it is present and not null.
    #[must_use]
    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref().filter(|data| !data.is_null())
    }

    /// Converts the result to a JSON value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        json::to_json_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_splits_members() {
        let result = GraphqlResult::from_value(json!({
            "data": {"ping": "pong"},
            "extensions": {"requestId": "abc"}
        }));

        assert!(!result.has_errors());
        assert_eq!(result.data(), Some(&json!({"ping": "pong"})));
        assert_eq!(result.extensions, Some(json!({"requestId": "abc"})));
    }

    #[test]
    fn test_from_value_keeps_explicit_null_data() {
        let result = GraphqlResult::from_value(json!({"data": null}));

        assert_eq!(result.data, Some(Value::Null));
        assert!(result.data().is_none());
        assert_eq!(result.to_value(), json!({"data": null}));
    }

    #[test]
    fn test_error_entries_keep_extra_fields() {
        let result = GraphqlResult::from_value(json!({
            "errors": [{
                "message": "Variable 'input' has an invalid value",
                "locations": [{"line": 1, "column": 10}],
                "extensions": {"errorClass": "VALIDATION"}
            }]
        }));

        let entry = &result.errors()[0];
        assert_eq!(entry.message, "Variable 'input' has an invalid value");
        assert_eq!(entry.extra["extensions"]["errorClass"], "VALIDATION");
        assert_eq!(
            result.to_value()["errors"][0]["locations"][0]["line"],
            1
        );
    }

    #[test]
    fn test_error_entries_without_message() {
        let result = GraphqlResult::from_value(json!({"errors": [{"path": ["a"]}, "plain"]}));
        assert_eq!(result.joined_errors(), "Unknown error, plain");
    }

    #[test]
    fn test_empty_errors_array_is_not_a_failure() {
        let result = GraphqlResult::from_value(json!({"data": {}, "errors": []}));
        assert!(!result.has_errors());
        assert_eq!(result.joined_errors(), "");
    }

    #[test]
    fn test_non_object_body_becomes_error() {
        let result = GraphqlResult::from_value(json!([1, 2, 3]));
        assert!(result.has_errors());
        assert!(result.joined_errors().starts_with("Unexpected response structure"));
    }

    #[test]
    fn test_from_protocol_error_keeps_context() {
        let error = ProtocolError::with_context("Invalid JSON response", "{oops").with_position(1);
        let result = GraphqlResult::from_protocol_error(&error);

        let value = result.to_value();
        assert_eq!(value["errors"][0]["message"], "Invalid JSON response");
        assert_eq!(value["errors"][0]["context"], "{oops");
        assert_eq!(value["errors"][0]["position"], 1);
    }
}
