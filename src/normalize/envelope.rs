//! The tool result envelope.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::json;

/// The uniform `{success, <payload-key>: value, error?, message?, raw_response?}`
/// result returned by every tool.
///
/// The payload key is chosen per tool (`transaction`, `customer`,
/// `verification`, ...). Additional tool fields such as `count` or
/// `reversal_type` sit next to it.
///
/// # Example
///
/// ```rust
/// use braintree_bridge::normalize::ToolEnvelope;
/// use serde_json::json;
///
/// let envelope = ToolEnvelope::success("transaction", json!({"id": "dHJhbnNhY3Rpb25fMQ"}));
/// assert_eq!(
///     envelope.to_value(),
///     json!({"success": true, "transaction": {"id": "dHJhbnNhY3Rpb25fMQ"}})
/// );
///
/// let envelope = ToolEnvelope::failure("Transaction not found");
/// assert_eq!(envelope.to_value(), json!({"success": false, "error": "Transaction not found"}));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ToolEnvelope {
    success: bool,
    payload: Option<(String, Value)>,
    fields: Map<String, Value>,
    error: Option<String>,
    message: Option<String>,
    raw_response: Option<Value>,
}

impl ToolEnvelope {
    /// Creates a successful envelope carrying `value` under `key`.
    #[must_use]
    pub fn success(key: impl Into<String>, value: Value) -> Self {
        Self {
            success: true,
            payload: Some((key.into(), value)),
            fields: Map::new(),
            error: None,
            message: None,
            raw_response: None,
        }
    }

    /// Creates a failed envelope with an error message.
    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            payload: None,
            fields: Map::new(),
            error: Some(error.into()),
            message: None,
            raw_response: None,
        }
    }

    /// Replaces the payload.
    #[must_use]
    pub fn with_payload(mut self, key: impl Into<String>, value: Value) -> Self {
        self.payload = Some((key.into(), value));
        self
    }

    /// Adds a tool-specific field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    /// Attaches a human-readable message or remediation hint.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attaches the original upstream result for debugging.
    #[must_use]
    pub fn with_raw_response(mut self, raw_response: Value) -> Self {
        self.raw_response = Some(raw_response);
        self
    }

    /// Returns `true` for successful envelopes.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.success
    }

    /// Returns the payload key and value, if any.
    #[must_use]
    pub fn payload(&self) -> Option<(&str, &Value)> {
        self.payload
            .as_ref()
            .map(|(key, value)| (key.as_str(), value))
    }

    /// Returns a tool-specific field.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Returns the error message, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns the message or hint, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns the attached raw response, if any.
    #[must_use]
    pub const fn raw_response(&self) -> Option<&Value> {
        self.raw_response.as_ref()
    }

    /// Converts the envelope to a JSON object. Payloads are kept as-is.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("success".to_string(), Value::Bool(self.success));
        if let Some((key, value)) = &self.payload {
            map.insert(key.clone(), value.clone());
        }
        for (key, value) in &self.fields {
            map.insert(key.clone(), value.clone());
        }
        if let Some(error) = &self.error {
            map.insert("error".to_string(), Value::String(error.clone()));
        }
        if let Some(message) = &self.message {
            map.insert("message".to_string(), Value::String(message.clone()));
        }
        if let Some(raw_response) = &self.raw_response {
            map.insert("raw_response".to_string(), raw_response.clone());
        }
        Value::Object(map)
    }

    /// Converts the envelope to JSON text. Never fails.
    #[must_use]
    pub fn to_json(&self) -> String {
        json::to_json_string(&self.to_value())
    }
}

impl Serialize for ToolEnvelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}
