//! Remediation hints keyed by tool context.
//!
//! Hints come from a single phrase table so the matching heuristic can be
//! changed in one place.

/// The family of tool that produced an error, used to pick a hint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ToolContext {
    /// Connectivity checks.
    Ping,
    /// Legacy ID conversion.
    Identity,
    /// Single-entity reads and searches.
    Lookup,
    /// Mutations on existing transactions.
    Transaction,
    /// Operations that consume a payment method or nonce.
    PaymentMethod,
    /// Customer creation and updates.
    Customer,
    /// Customer deletion.
    CustomerDelete,
    /// Raw documents sent through the escape hatch.
    Raw,
}

/// Which contexts a hint applies to.
#[derive(Clone, Copy, Debug)]
enum Scope {
    Only(&'static [ToolContext]),
    Except(&'static [ToolContext]),
}

impl Scope {
    fn contains(self, context: ToolContext) -> bool {
        match self {
            Self::Only(contexts) => contexts.contains(&context),
            Self::Except(contexts) => !contexts.contains(&context),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Hint {
    phrase: &'static str,
    scope: Scope,
    message: &'static str,
}

/// Hint shown when a customer still has vaulted payment methods.
pub const DELETE_PAYMENT_METHODS_FIRST: &str = "This customer still has vaulted payment methods. \
Fetch the customer to list them, delete each one with delete_payment_method, then delete the customer again.";

/// Hint shown when an entity cannot be found.
pub const CONVERT_LEGACY_ID: &str = "The ID may be a legacy ID. \
Convert it with get_graphql_id_from_legacy_id and retry with the returned GraphQL ID.";

/// Hint shown when a single-use payment method cannot be used again.
pub const SINGLE_USE_PAYMENT_METHOD: &str = "Single-use payment methods (nonces) can be used once \
and expire after three hours. Vault the payment method for repeated use or request a new nonce.";

const PAYMENT_METHOD_CONTEXTS: &[ToolContext] = &[ToolContext::PaymentMethod];

const HINTS: &[Hint] = &[
    Hint {
        phrase: "payment methods",
        scope: Scope::Only(&[ToolContext::CustomerDelete]),
        message: DELETE_PAYMENT_METHODS_FIRST,
    },
    Hint {
        phrase: "not found",
        scope: Scope::Except(&[ToolContext::Identity, ToolContext::Ping, ToolContext::Raw]),
        message: CONVERT_LEGACY_ID,
    },
    Hint {
        phrase: "already been consumed",
        scope: Scope::Only(PAYMENT_METHOD_CONTEXTS),
        message: SINGLE_USE_PAYMENT_METHOD,
    },
    Hint {
        phrase: "expired",
        scope: Scope::Only(PAYMENT_METHOD_CONTEXTS),
        message: SINGLE_USE_PAYMENT_METHOD,
    },
];

/// Returns the first hint whose phrase occurs in `errors` (case-insensitive)
/// and which applies to `context`.
///
/// # Example
///
/// ```rust
/// use braintree_bridge::normalize::{remediation_hint, ToolContext};
///
/// let hint = remediation_hint(ToolContext::Lookup, "Transaction not found");
/// assert!(hint.unwrap().contains("get_graphql_id_from_legacy_id"));
///
/// assert!(remediation_hint(ToolContext::Identity, "Transaction not found").is_none());
/// ```
#[must_use]
pub fn remediation_hint(context: ToolContext, errors: &str) -> Option<&'static str> {
    let lower = errors.to_lowercase();
    HINTS
        .iter()
        .find(|hint| hint.scope.contains(context) && lower.contains(hint.phrase))
        .map(|hint| hint.message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_customer_payment_methods_hint() {
        let hint = remediation_hint(
            ToolContext::CustomerDelete,
            "Cannot delete a customer with vaulted Payment Methods",
        );
        assert_eq!(hint, Some(DELETE_PAYMENT_METHODS_FIRST));
    }

    #[test]
    fn test_payment_methods_phrase_ignored_outside_customer_delete() {
        assert!(remediation_hint(ToolContext::Customer, "payment methods limit").is_none());
    }

    #[test]
    fn test_not_found_hint_applies_to_lookups_and_mutations() {
        for context in [
            ToolContext::Lookup,
            ToolContext::Transaction,
            ToolContext::PaymentMethod,
            ToolContext::Customer,
            ToolContext::CustomerDelete,
        ] {
            assert_eq!(
                remediation_hint(context, "Node NOT FOUND"),
                Some(CONVERT_LEGACY_ID),
                "{context:?}"
            );
        }
    }

    #[test]
    fn test_not_found_hint_skipped_for_identity_and_raw() {
        assert!(remediation_hint(ToolContext::Identity, "not found").is_none());
        assert!(remediation_hint(ToolContext::Raw, "not found").is_none());
    }

    #[test]
    fn test_single_use_hints() {
        assert_eq!(
            remediation_hint(
                ToolContext::PaymentMethod,
                "Cannot use a payment_method_nonce more than once; it has already been consumed"
            ),
            Some(SINGLE_USE_PAYMENT_METHOD)
        );
        assert_eq!(
            remediation_hint(ToolContext::PaymentMethod, "Payment method nonce expired"),
            Some(SINGLE_USE_PAYMENT_METHOD)
        );
        assert!(remediation_hint(ToolContext::Transaction, "Authorization expired").is_none());
    }

    #[test]
    fn test_no_hint_for_unrelated_errors() {
        assert!(remediation_hint(ToolContext::Lookup, "Authentication failed").is_none());
    }
}
