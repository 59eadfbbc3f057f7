//! Safe JSON serialization and parsing.
//!
//! Everything in this module is total: no function returns an error to its
//! caller or panics on malformed input. Values that cannot be represented
//! degrade to their textual form, and bodies that cannot be parsed degrade
//! to a GraphQL-shaped error value.
//!
//! # Overview
//!
//! - [`to_json_string`]: serialize anything to JSON text
//! - [`to_json_value`]: serialize anything to a [`Value`], degrading per element
//! - [`sanitize`]: depth-cap a [`Value`]
//! - [`parse_body`] / [`safe_parse`]: parse an upstream response body
//!
//! # Example
//!
//! ```rust
//! use braintree_bridge::json::{safe_parse, to_json_string};
//!
//! let parsed = safe_parse("{\"data\": {\"ping\": \"pong\"}}", Some("application/json"));
//! assert_eq!(parsed["data"]["ping"], "pong");
//!
//! let broken = safe_parse("{\"data\": ", Some("application/json"));
//! assert!(broken["errors"][0]["message"].as_str().unwrap().contains("Invalid JSON"));
//!
//! let text = to_json_string(&broken);
//! assert!(serde_json::from_str::<serde_json::Value>(&text).is_ok());
//! ```

mod errors;
mod lenient;

pub use errors::ProtocolError;

use std::fmt;

use serde::Serialize;
use serde_json::{json, Map, Value};

/// Default recursion cap for [`sanitize`].
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Maximum number of characters of an offending body kept as context.
pub const CONTEXT_SNIPPET_CHARS: usize = 200;

/// Characters shown on each side of a JSON syntax error position.
const ERROR_WINDOW_CHARS: usize = 10;

/// Fallback text used when nothing else can be produced.
const NON_SERIALIZABLE_FALLBACK: &str = r#"{"error":"Non-serializable response"}"#;

/// Serializes `value` to JSON text without ever failing.
///
/// Serialization is attempted directly first. On failure the value is
/// converted through [`to_json_value`] and [`sanitize`], and as a last resort
/// a fixed `{"error": "Non-serializable response"}` document is returned.
#[must_use]
pub fn to_json_string<T>(value: &T) -> String
where
    T: Serialize + fmt::Debug + ?Sized,
{
    match serde_json::to_string(value) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("JSON serialization error: {e}");
            let sanitized = sanitize(&to_json_value(value), DEFAULT_MAX_DEPTH);
            serde_json::to_string(&sanitized).unwrap_or_else(|e| {
                tracing::warn!("Failed to sanitize non-serializable value: {e}");
                NON_SERIALIZABLE_FALLBACK.to_string()
            })
        }
    }
}

/// Converts `value` to a JSON [`Value`], degrading instead of failing.
///
/// Degradation happens per element: a field or item whose `Serialize` impl
/// reports an error becomes a `"<non-serializable: ..>"` string while the
/// surrounding structure is kept, and non-string map keys are written as
/// their JSON text. Only a value that fails as a whole falls back to its
/// `Debug` representation. Date and time types from `chrono` serialize to
/// ISO-8601 text through serde and so keep that form.
///
/// # Example
///
/// ```rust
/// use std::collections::BTreeMap;
///
/// use braintree_bridge::json::to_json_value;
/// use serde_json::json;
///
/// let mut amounts = BTreeMap::new();
/// amounts.insert((2024, 1), "10.00");
/// assert_eq!(to_json_value(&amounts), json!({"[2024,1]": "10.00"}));
/// ```
#[must_use]
pub fn to_json_value<T>(value: &T) -> Value
where
    T: Serialize + fmt::Debug + ?Sized,
{
    lenient::to_value(value).unwrap_or_else(|e| {
        tracing::debug!("Falling back to Debug text: {e}");
        Value::String(format!("{value:?}"))
    })
}

/// Rewrites `value` depth-first, replacing anything nested deeper than
/// `max_depth` with its compact JSON text.
///
/// The top-level value is depth 0.
///
/// # Example
///
/// ```rust
/// use braintree_bridge::json::sanitize;
/// use serde_json::json;
///
/// let deep = json!({"a": {"b": {"c": 1}}});
/// assert_eq!(sanitize(&deep, 1), json!({"a": {"b": "{\"c\":1}"}}));
/// ```
#[must_use]
pub fn sanitize(value: &Value, max_depth: usize) -> Value {
    sanitize_at(value, max_depth, 0)
}

fn sanitize_at(value: &Value, max_depth: usize, depth: usize) -> Value {
    if depth > max_depth {
        return match value {
            Value::Object(_) | Value::Array(_) => Value::String(value.to_string()),
            leaf => leaf.clone(),
        };
    }
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), sanitize_at(v, max_depth, depth + 1)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|v| sanitize_at(v, max_depth, depth + 1))
                .collect(),
        ),
        leaf => leaf.clone(),
    }
}

/// Parses an upstream response body.
///
/// # Errors
///
/// Returns [`ProtocolError`] when the body is empty, is an HTML page served
/// with a non-JSON content type, or is not valid JSON.
pub fn parse_body(text: &str, content_type: Option<&str>) -> Result<Value, ProtocolError> {
    if text.trim().is_empty() {
        return Err(ProtocolError::new("Empty or non-string response"));
    }

    if let Some(content_type) = content_type.filter(|ct| !ct.is_empty()) {
        let content_type = content_type.to_lowercase();
        if !content_type.contains("application/json") {
            tracing::warn!("Content-Type is {content_type}, not application/json");
            if content_type.contains("text/html") && looks_like_html(text) {
                return Err(ProtocolError::with_context(
                    "Received HTML instead of JSON - possible authentication or URL error",
                    snippet(text),
                ));
            }
        }
    }

    serde_json::from_str(text).map_err(|e| {
        let offset = byte_offset(text, e.line(), e.column());
        let window = error_window(text, offset);
        tracing::warn!(
            "JSON parse error at position {offset}: {e}; context: ...{window}..."
        );
        ProtocolError::with_context(
            format!("Invalid JSON response: {e} at position {offset}"),
            snippet(text),
        )
        .with_position(offset)
    })
}

/// Parses an upstream response body, returning a GraphQL-shaped error value
/// on failure.
#[must_use]
pub fn safe_parse(text: &str, content_type: Option<&str>) -> Value {
    parse_body(text, content_type).unwrap_or_else(|e| e.to_graphql_value())
}

/// Returns the first [`CONTEXT_SNIPPET_CHARS`] characters of `text`, with an
/// ellipsis when truncated.
#[must_use]
pub fn snippet(text: &str) -> String {
    truncate_chars(text, CONTEXT_SNIPPET_CHARS)
}

/// Truncates `text` to `max` characters, appending `...` when shortened.
#[must_use]
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}

/// Builds a `{"errors": [{"message": ..}]}` value.
#[must_use]
pub fn error_value(message: impl Into<String>) -> Value {
    json!({ "errors": [{ "message": message.into() }] })
}

fn looks_like_html(text: &str) -> bool {
    let head = truncate_chars(text, 1000).to_lowercase();
    head.contains("<html") || head.contains("<!doctype")
}

/// Converts serde_json's 1-based line/column into a byte offset.
fn byte_offset(text: &str, line: usize, column: usize) -> usize {
    if line == 0 {
        return 0;
    }
    let line_start: usize = text
        .split_inclusive('\n')
        .take(line - 1)
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(text.len())
}

fn error_window(text: &str, offset: usize) -> String {
    let start = floor_char_boundary(text, offset.saturating_sub(ERROR_WINDOW_CHARS));
    let end = floor_char_boundary(text, (offset + ERROR_WINDOW_CHARS).min(text.len()));
    text.get(start..end).unwrap_or_default().to_string()
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser::Error as _;
    use serde::Serializer;
    use std::collections::HashMap;

    #[derive(Debug)]
    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("cannot serialize"))
        }
    }

    #[test]
    fn test_to_json_string_serializes_plain_values() {
        let text = to_json_string(&json!({"success": true}));
        assert_eq!(text, r#"{"success":true}"#);
    }

    #[test]
    fn test_to_json_string_degrades_failing_serialize_impl() {
        let text = to_json_string(&Unserializable);
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, Value::String("Unserializable".to_string()));
    }

    #[test]
    fn test_to_json_value_handles_non_string_map_keys() {
        let mut map = HashMap::new();
        map.insert((1, 2), "tuple key");

        assert_eq!(to_json_value(&map), json!({"[1,2]": "tuple key"}));
    }

    #[test]
    fn test_to_json_string_degrades_only_the_failing_field() {
        #[derive(Debug, Serialize)]
        struct Refund {
            id: &'static str,
            amount: &'static str,
            receipt: Unserializable,
        }

        let text = to_json_string(&Refund {
            id: "cmVmdW5kXzE",
            amount: "5.00",
            receipt: Unserializable,
        });

        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            parsed,
            json!({
                "id": "cmVmdW5kXzE",
                "amount": "5.00",
                "receipt": "<non-serializable: cannot serialize>"
            })
        );
    }

    #[test]
    fn test_to_json_value_keeps_iso_dates() {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(to_json_value(&date), json!("2024-01-01"));
    }

    #[test]
    fn test_sanitize_caps_depth() {
        let mut value = json!("leaf");
        for _ in 0..50 {
            value = json!({ "nested": value });
        }

        let sanitized = sanitize(&value, DEFAULT_MAX_DEPTH);

        let mut cursor = &sanitized;
        for _ in 0..=DEFAULT_MAX_DEPTH {
            cursor = &cursor["nested"];
        }
        assert!(cursor.is_string());
        assert!(serde_json::to_string(&sanitized).is_ok());
    }

    #[test]
    fn test_sanitize_leaves_shallow_values_untouched() {
        let value = json!({"a": [1, 2, {"b": null}], "c": "d"});
        assert_eq!(sanitize(&value, DEFAULT_MAX_DEPTH), value);
    }

    #[test]
    fn test_parse_body_rejects_empty_text() {
        let err = parse_body("   ", Some("application/json")).unwrap_err();
        assert_eq!(err.message(), "Empty or non-string response");
    }

    #[test]
    fn test_parse_body_diagnoses_html() {
        let html = "<!DOCTYPE html><html><body>Login</body></html>";
        let err = parse_body(html, Some("text/html; charset=utf-8")).unwrap_err();
        assert!(err.message().contains("Received HTML instead of JSON"));
        assert_eq!(err.context(), Some(html));
    }

    #[test]
    fn test_parse_body_reports_error_position() {
        let err = parse_body(r#"{"data": {"ping": pong}}"#, Some("application/json")).unwrap_err();
        assert!(err.message().starts_with("Invalid JSON response:"));
        assert!(err.message().contains("at position 18"));
        assert_eq!(err.position(), Some(18));
    }

    #[test]
    fn test_parse_body_truncates_context() {
        let body = format!("{{\"data\": {}", "x".repeat(500));
        let err = parse_body(&body, None).unwrap_err();
        let context = err.context().unwrap();
        assert!(context.ends_with("..."));
        assert_eq!(context.chars().count(), CONTEXT_SNIPPET_CHARS + 3);
    }

    #[test]
    fn test_parse_body_accepts_json_with_other_content_type() {
        let value = parse_body(r#"{"data": null}"#, Some("text/plain")).unwrap();
        assert_eq!(value, json!({"data": null}));
    }

    #[test]
    fn test_safe_parse_returns_graphql_error_shape() {
        let value = safe_parse("not json", None);
        assert!(value["errors"][0]["message"].is_string());
        assert!(value["errors"][0]["context"].is_string());
    }

    #[test]
    fn test_byte_offset_handles_multiple_lines() {
        let text = "{\n  \"a\": ?\n}";
        assert_eq!(byte_offset(text, 2, 8), 9);
        assert_eq!(&text[9..10], "?");
    }

    #[test]
    fn test_truncate_chars_respects_multibyte_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé...");
        assert_eq!(truncate_chars("héllo", 10), "héllo");
    }
}
