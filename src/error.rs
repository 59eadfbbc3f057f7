//! Error types for the Braintree bridge.
//!
//! This module contains error types used for configuration and startup
//! validation. Errors that happen while talking to Braintree live in
//! [`crate::clients`] and are never surfaced to tool callers as `Err`; they
//! are folded into [`GraphqlResult`](crate::clients::graphql::GraphqlResult)
//! values instead.
//!
//! # Example
//!
//! ```rust
//! use braintree_bridge::{ConfigError, PublicKey};
//!
//! let result = PublicKey::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyPublicKey)));
//! ```

use thiserror::Error;

/// Errors that can occur while building the bridge configuration.
///
/// Each variant provides a clear, actionable error message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Merchant ID cannot be empty.
    #[error("Merchant ID cannot be empty. Please provide a valid Braintree merchant ID.")]
    EmptyMerchantId,

    /// Public key cannot be empty.
    #[error("Public key cannot be empty. Please provide a valid Braintree public key.")]
    EmptyPublicKey,

    /// Private key cannot be empty.
    #[error("Private key cannot be empty. Please provide a valid Braintree private key.")]
    EmptyPrivateKey,

    /// Braintree credentials are not configured.
    ///
    /// Mutating tools cannot be offered without credentials, so the tool
    /// catalog refuses to start.
    #[error("Braintree credentials not found. Set BRAINTREE_MERCHANT_ID, BRAINTREE_PUBLIC_KEY and BRAINTREE_PRIVATE_KEY.")]
    MissingCredentials,

    /// Environment selector is not recognized.
    #[error("Invalid environment '{value}'. Expected 'sandbox' or 'production'.")]
    InvalidEnvironment {
        /// The invalid value that was provided.
        value: String,
    },

    /// API version is invalid.
    #[error("Invalid API version '{version}'. Expected format: 'YYYY-MM-DD' (e.g., '2025-04-01').")]
    InvalidApiVersion {
        /// The invalid version string that was provided.
        version: String,
    },

    /// Endpoint URL is invalid.
    #[error("Invalid endpoint URL '{url}'. Please provide a valid URL with scheme (e.g., 'https://payments.sandbox.braintree-api.com/graphql').")]
    InvalidEndpointUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// Listen port is not a valid TCP port.
    #[error("Invalid port '{value}'. Expected a number between 1 and 65535.")]
    InvalidPort {
        /// The invalid value that was provided.
        value: String,
    },

    /// A built-in operation document failed validation.
    #[error("Operation '{operation}' has an invalid GraphQL document: {reason}")]
    InvalidOperationDocument {
        /// The tool the document belongs to.
        operation: &'static str,
        /// Why the document was rejected.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_public_key_error_message() {
        let error = ConfigError::EmptyPublicKey;
        let message = error.to_string();
        assert!(message.contains("Public key cannot be empty"));
        assert!(message.contains("valid Braintree public key"));
    }

    #[test]
    fn test_missing_credentials_names_environment_variables() {
        let message = ConfigError::MissingCredentials.to_string();
        assert!(message.contains("BRAINTREE_MERCHANT_ID"));
        assert!(message.contains("BRAINTREE_PRIVATE_KEY"));
    }

    #[test]
    fn test_invalid_environment_error_message() {
        let error = ConfigError::InvalidEnvironment {
            value: "staging".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("staging"));
        assert!(message.contains("sandbox"));
    }

    #[test]
    fn test_invalid_operation_document_names_operation() {
        let error = ConfigError::InvalidOperationDocument {
            operation: "fetch_transaction",
            reason: "Query cannot be empty and must be a string".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("fetch_transaction"));
        assert!(message.contains("cannot be empty"));
    }

    #[test]
    fn test_error_implements_std_error() {
        let error = ConfigError::EmptyPrivateKey;
        let _: &dyn std::error::Error = &error;
    }
}
