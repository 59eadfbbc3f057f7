//! Error types for the GraphQL request executor.
//!
//! # Error Handling
//!
//! The executor never returns these errors to tool code. Every failure is
//! folded into an error-shaped [`GraphqlResult`] through
//! [`ExecutionError::into_result`], so tools handle a single result shape.
//!
//! - [`ExecutionError::MissingCredentials`]: checked before any network I/O
//! - [`ExecutionError::Http`]: terminal or exhausted status and transport failures
//! - [`ExecutionError::Protocol`]: unusable response bodies, never retried

use thiserror::Error;

use crate::clients::graphql::GraphqlResult;
use crate::clients::HttpError;
use crate::json::ProtocolError;

/// Error type for one executor call.
///
/// # Example
///
/// ```rust
/// use braintree_bridge::clients::graphql::ExecutionError;
///
/// let result = ExecutionError::MissingCredentials.into_result();
/// assert_eq!(result.joined_errors(), "Server missing Braintree API credentials.");
/// ```
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// No credentials were configured.
    #[error("Server missing Braintree API credentials.")]
    MissingCredentials,

    /// An HTTP-level failure that was terminal or outlived the retry budget.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The response body could not be used.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

impl ExecutionError {
    /// Converts the error into an error-shaped [`GraphqlResult`].
    ///
    /// Protocol errors keep their body context and position.
    #[must_use]
    pub fn into_result(self) -> GraphqlResult {
        match self {
            Self::Protocol(error) => GraphqlResult::from_protocol_error(&error),
            other => GraphqlResult::from_error(other.to_string()),
        }
    }
}
