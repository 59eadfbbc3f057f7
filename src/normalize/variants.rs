//! Tagged variants for polymorphic response shapes.
//!
//! Each type is resolved once from a `__typename` or status discriminator so
//! tools never re-inspect raw JSON.

use std::fmt;

use serde_json::Value;

use crate::normalize::extract::typename;

/// The result of reversing a transaction.
///
/// Braintree voids an unsettled transaction and refunds a settled one.
#[derive(Clone, Debug, PartialEq)]
pub enum Reversal {
    /// The transaction was voided; the payload is the transaction.
    Transaction(Value),
    /// The transaction was refunded; the payload is the refund.
    Refund(Value),
}

impl Reversal {
    /// Resolves a reversal payload by its `__typename`.
    ///
    /// Returns `None` for any other type.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match typename(value)? {
            "Transaction" => Some(Self::Transaction(value.clone())),
            "Refund" => Some(Self::Refund(value.clone())),
            _ => None,
        }
    }

    /// Returns `"transaction"` or `"refund"`.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Transaction(_) => "transaction",
            Self::Refund(_) => "refund",
        }
    }

    /// Returns the payload.
    #[must_use]
    pub const fn value(&self) -> &Value {
        match self {
            Self::Transaction(value) | Self::Refund(value) => value,
        }
    }
}

/// The instrument behind a payment method, from `details.__typename`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PaymentMethodKind {
    /// `CreditCardDetails`.
    CreditCard,
    /// `PayPalAccountDetails`.
    PayPal,
    /// `VenmoAccountDetails`.
    Venmo,
    /// `UsBankAccountDetails`.
    UsBankAccount,
    /// `ApplePayCardDetails`.
    ApplePay,
    /// `GooglePayCardDetails`.
    GooglePay,
    /// Any other details type, or none.
    Other,
}

impl PaymentMethodKind {
    /// Resolves the kind from a details `__typename`.
    #[must_use]
    pub fn from_typename(name: &str) -> Self {
        match name {
            "CreditCardDetails" => Self::CreditCard,
            "PayPalAccountDetails" => Self::PayPal,
            "VenmoAccountDetails" => Self::Venmo,
            "UsBankAccountDetails" => Self::UsBankAccount,
            "ApplePayCardDetails" => Self::ApplePay,
            "GooglePayCardDetails" => Self::GooglePay,
            _ => Self::Other,
        }
    }

    /// Resolves the kind of a payment method payload.
    #[must_use]
    pub fn of(payment_method: &Value) -> Self {
        payment_method
            .get("details")
            .and_then(typename)
            .map_or(Self::Other, Self::from_typename)
    }

    /// Returns the snake_case name used in envelopes.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CreditCard => "credit_card",
            Self::PayPal => "paypal",
            Self::Venmo => "venmo",
            Self::UsBankAccount => "us_bank_account",
            Self::ApplePay => "apple_pay",
            Self::GooglePay => "google_pay",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for PaymentMethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The status of a payment method verification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VerificationStatus {
    /// `VERIFIED`.
    Verified,
    /// `PROCESSOR_DECLINED`.
    ProcessorDeclined,
    /// `GATEWAY_REJECTED`.
    GatewayRejected,
    /// `FAILED`.
    Failed,
    /// `VERIFYING` or `PENDING`.
    Pending,
    /// Any other status, including a missing one.
    Other(String),
}

impl VerificationStatus {
    /// Resolves the status of a verification payload.
    #[must_use]
    pub fn of(verification: &Value) -> Self {
        match verification.get("status").and_then(Value::as_str) {
            Some("VERIFIED") => Self::Verified,
            Some("PROCESSOR_DECLINED") => Self::ProcessorDeclined,
            Some("GATEWAY_REJECTED") => Self::GatewayRejected,
            Some("FAILED") => Self::Failed,
            Some("VERIFYING" | "PENDING") => Self::Pending,
            Some(other) => Self::Other(other.to_string()),
            None => Self::Other("UNKNOWN".to_string()),
        }
    }

    /// Returns `true` only for [`VerificationStatus::Verified`].
    #[must_use]
    pub const fn is_verified(&self) -> bool {
        matches!(self, Self::Verified)
    }

    /// Returns a human-readable description of the status.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Verified => "Payment method verified successfully".to_string(),
            Self::ProcessorDeclined => {
                "Verification declined by the processor; ask the customer for another payment method"
                    .to_string()
            }
            Self::GatewayRejected => {
                "Verification rejected by gateway fraud or risk rules".to_string()
            }
            Self::Failed => "Verification failed".to_string(),
            Self::Pending => "Verification is still in progress".to_string(),
            Self::Other(status) => format!("Verification finished with status {status}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reversal_resolves_by_typename() {
        let voided = Reversal::from_value(&json!({"__typename": "Transaction", "status": "VOIDED"}));
        assert_eq!(voided.as_ref().map(Reversal::kind), Some("transaction"));

        let refunded = Reversal::from_value(&json!({"__typename": "Refund", "id": "r1"}));
        assert_eq!(refunded.as_ref().map(Reversal::kind), Some("refund"));
        assert_eq!(refunded.unwrap().value()["id"], "r1");
    }

    #[test]
    fn test_reversal_unknown_typename() {
        assert!(Reversal::from_value(&json!({"__typename": "Dispute"})).is_none());
        assert!(Reversal::from_value(&json!({"id": "x"})).is_none());
    }

    #[test]
    fn test_payment_method_kind_from_details() {
        let card = json!({"id": "pm", "details": {"__typename": "CreditCardDetails", "last4": "1111"}});
        assert_eq!(PaymentMethodKind::of(&card), PaymentMethodKind::CreditCard);

        let paypal = json!({"details": {"__typename": "PayPalAccountDetails"}});
        assert_eq!(PaymentMethodKind::of(&paypal).as_str(), "paypal");

        assert_eq!(PaymentMethodKind::of(&json!({})), PaymentMethodKind::Other);
    }

    #[test]
    fn test_verification_status_messages() {
        let status = VerificationStatus::of(&json!({"status": "VERIFIED"}));
        assert!(status.is_verified());

        let status = VerificationStatus::of(&json!({"status": "PROCESSOR_DECLINED"}));
        assert!(!status.is_verified());
        assert!(status.message().contains("declined"));

        assert_eq!(
            VerificationStatus::of(&json!({"status": "VERIFYING"})),
            VerificationStatus::Pending
        );
        assert_eq!(
            VerificationStatus::of(&json!({})).message(),
            "Verification finished with status UNKNOWN"
        );
    }
}
