//! Response normalization into tool envelopes.
//!
//! [`normalize`] turns a [`GraphqlResult`] into a [`ToolEnvelope`] by
//! following an [`ExtractionRule`]:
//!
//! 1. GraphQL errors win: their messages are joined with `", "` and a
//!    remediation hint for the [`ToolContext`] is attached when one matches.
//! 2. The rule's path is walked through `data`. A missing key or a `null`
//!    value yields `"<entity> not found"`, without hint or raw response.
//! 3. A value of the wrong JSON type yields a structural failure that keeps
//!    the original result under `raw_response`.
//! 4. The found value is shaped: connections are flattened, polymorphic
//!    payloads are resolved into their variants.
//!
//! # Example
//!
//! ```rust
//! use braintree_bridge::clients::graphql::GraphqlResult;
//! use braintree_bridge::normalize::{normalize, ExtractionRule, ToolContext};
//! use serde_json::json;
//!
//! const RULE: ExtractionRule = ExtractionRule::node(&["node"], "transaction", "Transaction");
//!
//! let result = GraphqlResult::from_value(json!({"data": {"node": null}}));
//! let envelope = normalize(&result, &RULE, ToolContext::Lookup);
//!
//! assert!(!envelope.is_success());
//! assert_eq!(envelope.error(), Some("Transaction not found"));
//! ```

mod envelope;
mod extract;
mod hints;
mod variants;

pub use envelope::ToolEnvelope;
pub use extract::{flatten_connection, typename, walk, Connection, Extracted};
pub use hints::{
    remediation_hint, ToolContext, CONVERT_LEGACY_ID, DELETE_PAYMENT_METHODS_FIRST,
    SINGLE_USE_PAYMENT_METHOD,
};
pub use variants::{PaymentMethodKind, Reversal, VerificationStatus};

use serde_json::{json, Value};

use crate::clients::graphql::GraphqlResult;

/// How the value found at a rule's path is placed in the envelope.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    /// The value is the payload as-is.
    Node,
    /// The value is a connection; its nodes become the payload with `count`
    /// and `page_info` fields.
    Connection,
    /// The value is a payment method; a `payment_method_type` field is added.
    PaymentMethod,
    /// The value is a transaction or a refund; a `reversal_type` field is added.
    Reversal,
    /// The value is a vault payload with an optional `verification`.
    Vault,
    /// The value is a verification; success follows its status.
    Verification,
    /// The mutation returns no entity; the tool supplies the payload.
    Acknowledged,
    /// The value must be this exact string; anything else is an unexpected
    /// response that keeps the original result under `raw_response`.
    Exact(&'static str),
}

/// Where a tool's payload lives in `data` and how to present it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExtractionRule {
    /// Keys to follow from `data`.
    pub path: &'static [&'static str],
    /// Envelope key of the payload.
    pub payload_key: &'static str,
    /// Entity name used in "not found" errors.
    pub entity: &'static str,
    /// Presentation of the found value.
    pub shape: Shape,
    /// Required `__typename` of the found value, when checked.
    pub expected_typename: Option<&'static str>,
}

impl ExtractionRule {
    /// A rule placing the value at `path` under `payload_key`.
    #[must_use]
    pub const fn node(
        path: &'static [&'static str],
        payload_key: &'static str,
        entity: &'static str,
    ) -> Self {
        Self {
            path,
            payload_key,
            entity,
            shape: Shape::Node,
            expected_typename: None,
        }
    }

    /// Replaces the shape of this rule.
    #[must_use]
    pub const fn shaped(mut self, shape: Shape) -> Self {
        self.shape = shape;
        self
    }

    /// Requires the found value to have this `__typename`.
    #[must_use]
    pub const fn typed(mut self, typename: &'static str) -> Self {
        self.expected_typename = Some(typename);
        self
    }

    fn not_found(&self) -> ToolEnvelope {
        ToolEnvelope::failure(format!("{} not found", self.entity))
    }
}

/// Builds the error envelope of a result with GraphQL errors.
///
/// Returns `None` when the result carries no errors.
#[must_use]
pub fn normalize_errors(result: &GraphqlResult, context: ToolContext) -> Option<ToolEnvelope> {
    if !result.has_errors() {
        return None;
    }
    let joined = result.joined_errors();
    let envelope = ToolEnvelope::failure(joined.clone());
    Some(match remediation_hint(context, &joined) {
        Some(hint) => envelope.with_message(hint),
        None => envelope,
    })
}

/// Normalizes a result into a tool envelope. Never fails.
#[must_use]
pub fn normalize(result: &GraphqlResult, rule: &ExtractionRule, context: ToolContext) -> ToolEnvelope {
    if let Some(envelope) = normalize_errors(result, context) {
        return envelope;
    }

    let data = result.data().unwrap_or(&Value::Null);
    let found = match walk(data, rule.path) {
        Extracted::Found(value) => value,
        Extracted::Missing => return rule.not_found(),
        Extracted::Malformed(error) => return structural_failure(result, error),
    };

    if let Some(expected) = rule.expected_typename {
        if typename(found).is_some_and(|actual| actual != expected) {
            return rule.not_found();
        }
    }

    match rule.shape {
        Shape::Node => ToolEnvelope::success(rule.payload_key, found.clone()),
        Shape::Acknowledged => ToolEnvelope::success(rule.payload_key, Value::Bool(true)),
        Shape::Connection => match flatten_connection(found) {
            Ok(connection) => connection_envelope(rule, connection),
            Err(error) => structural_failure(result, error),
        },
        Shape::PaymentMethod => ToolEnvelope::success(rule.payload_key, found.clone()).with_field(
            "payment_method_type",
            json!(PaymentMethodKind::of(found).as_str()),
        ),
        Shape::Reversal => match Reversal::from_value(found) {
            Some(reversal) => ToolEnvelope::success(rule.payload_key, reversal.value().clone())
                .with_field("reversal_type", json!(reversal.kind())),
            None => structural_failure(
                result,
                format!(
                    "Unexpected reversal type: {}",
                    typename(found).unwrap_or("missing __typename")
                ),
            ),
        },
        Shape::Vault => vault_envelope(rule, found),
        Shape::Verification => verification_envelope(rule, found),
        Shape::Exact(expected) => match found.as_str() {
            Some(actual) if actual == expected => {
                ToolEnvelope::success(rule.payload_key, found.clone())
            }
            Some(actual) => unexpected_value(result, rule, actual),
            None => unexpected_value(result, rule, &found.to_string()),
        },
    }
}

fn unexpected_value(result: &GraphqlResult, rule: &ExtractionRule, actual: &str) -> ToolEnvelope {
    structural_failure(
        result,
        format!(
            "Unexpected response from Braintree {}: {actual}",
            rule.payload_key
        ),
    )
}

fn structural_failure(result: &GraphqlResult, error: String) -> ToolEnvelope {
    tracing::warn!("{error}");
    ToolEnvelope::failure(error).with_raw_response(result.to_value())
}

fn connection_envelope(rule: &ExtractionRule, connection: Connection) -> ToolEnvelope {
    let count = connection.nodes.len();
    let envelope = ToolEnvelope::success(rule.payload_key, Value::Array(connection.nodes))
        .with_field("count", json!(count));
    match connection.page_info {
        Some(page_info) => envelope.with_field("page_info", page_info),
        None => envelope,
    }
}

/// A failed verification aborts vaulting even if a payment method came back.
fn vault_envelope(rule: &ExtractionRule, found: &Value) -> ToolEnvelope {
    let verification = found.get("verification").filter(|v| !v.is_null());

    if let Some(verification) = verification {
        let status = VerificationStatus::of(verification);
        if !status.is_verified() {
            return ToolEnvelope::failure(format!(
                "Payment method verification failed: {}",
                status.message()
            ))
            .with_field("verification", verification.clone());
        }
    }

    let Some(payment_method) = found.get("paymentMethod").filter(|v| !v.is_null()) else {
        return rule.not_found();
    };

    let envelope = ToolEnvelope::success(rule.payload_key, payment_method.clone()).with_field(
        "payment_method_type",
        json!(PaymentMethodKind::of(payment_method).as_str()),
    );
    match verification {
        Some(verification) => envelope.with_field("verification", verification.clone()),
        None => envelope,
    }
}

fn verification_envelope(rule: &ExtractionRule, found: &Value) -> ToolEnvelope {
    let status = VerificationStatus::of(found);
    if status.is_verified() {
        ToolEnvelope::success(rule.payload_key, found.clone()).with_message(status.message())
    } else {
        ToolEnvelope::failure(status.message()).with_field(rule.payload_key, found.clone())
    }
}
