//! Error types for tool dispatch.
//!
//! Tool errors are preconditions checked before any request is built. They
//! never reach the network and are returned to callers as failure envelopes.

use thiserror::Error;

use crate::normalize::ToolEnvelope;

/// Error raised while turning a tool call into a GraphQL request.
///
/// # Example
///
/// ```rust
/// use braintree_bridge::tools::ToolError;
///
/// let error = ToolError::MissingArgument { field: "transaction_id" };
/// assert_eq!(
///     error.into_envelope().error(),
///     Some("'transaction_id' is required and cannot be empty")
/// );
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ToolError {
    /// No tool has this name.
    #[error("Unknown tool: {name}")]
    UnknownTool {
        /// The requested name.
        name: String,
    },

    /// The arguments do not decode into the tool's signature.
    #[error("Invalid arguments for {tool}: {reason}")]
    InvalidArguments {
        /// The tool being called.
        tool: &'static str,
        /// The decoding failure.
        reason: String,
    },

    /// A required argument is missing or blank.
    #[error("'{field}' is required and cannot be empty")]
    MissingArgument {
        /// The argument name.
        field: &'static str,
    },

    /// A search was requested without any filter.
    #[error("At least one search filter is required: {fields}")]
    MissingFilter {
        /// The accepted filter names.
        fields: &'static str,
    },

    /// An update carried no fields to change.
    #[error("Nothing to update: provide at least one of {fields}")]
    NothingToUpdate {
        /// The accepted field names.
        fields: &'static str,
    },

    /// A date range ends before it starts.
    #[error("Invalid date range: end date {end} is before start date {start}")]
    InvalidDateRange {
        /// The first day of the range.
        start: String,
        /// The last day of the range.
        end: String,
    },
}

impl ToolError {
    /// Converts the error into a failure envelope.
    #[must_use]
    pub fn into_envelope(self) -> ToolEnvelope {
        ToolEnvelope::failure(self.to_string())
    }
}
