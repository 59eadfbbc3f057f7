//! Static operation definitions and document validation.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::clients::graphql::GraphqlRequest;
use crate::error::ConfigError;
use crate::json;
use crate::normalize::{ExtractionRule, ToolContext};
use crate::tools::ToolError;

/// Leading tokens accepted for a GraphQL document.
const OPERATION_PREFIXES: &[&str] = &["query", "mutation", "{"];

/// Reason given for blank documents.
pub const EMPTY_DOCUMENT: &str = "Query cannot be empty and must be a string";

/// Reason given for documents with an unrecognized leading token.
pub const INVALID_DOCUMENT_FORMAT: &str =
    "Invalid GraphQL query format. Must start with 'query', 'mutation', or '{'";

/// Checks that `document` is non-blank and starts with `query`, `mutation`
/// or a bare selection brace.
///
/// # Errors
///
/// Returns the human-readable reason for rejecting the document.
///
/// # Example
///
/// ```rust
/// use braintree_bridge::tools::check_document;
///
/// assert!(check_document("  query Ping { ping }").is_ok());
/// assert!(check_document("{ ping }").is_ok());
/// assert!(check_document("subscription { ping }").is_err());
/// assert!(check_document("   ").is_err());
/// ```
pub fn check_document(document: &str) -> Result<(), &'static str> {
    let trimmed = document.trim();
    if trimmed.is_empty() {
        return Err(EMPTY_DOCUMENT);
    }
    if !OPERATION_PREFIXES
        .iter()
        .any(|prefix| trimmed.starts_with(prefix))
    {
        return Err(INVALID_DOCUMENT_FORMAT);
    }
    Ok(())
}

/// A tool's fixed GraphQL document, extraction rule and retry budget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Operation {
    /// The tool name.
    pub name: &'static str,
    /// The GraphQL document.
    pub document: &'static str,
    /// Where the payload lives in the response.
    pub rule: ExtractionRule,
    /// Hint context for errors.
    pub context: ToolContext,
    /// Retries allowed for transient failures.
    pub max_retries: u32,
}

impl Operation {
    /// Validates the document with [`check_document`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOperationDocument`] when the document is rejected.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_document(self.document).map_err(|reason| ConfigError::InvalidOperationDocument {
            operation: self.name,
            reason: reason.to_string(),
        })
    }

    /// Pairs this operation with typed variables.
    #[must_use]
    pub fn invoke<V>(&'static self, variables: &V) -> Invocation
    where
        V: Serialize + fmt::Debug,
    {
        Invocation {
            operation: self,
            variables: json::to_json_value(variables),
            echo: None,
        }
    }
}

/// One prepared call of an [`Operation`].
#[derive(Clone, Debug, PartialEq)]
pub struct Invocation {
    operation: &'static Operation,
    variables: Value,
    echo: Option<Value>,
}

impl Invocation {
    /// Uses `value` as the payload of a successful envelope.
    ///
    /// Mutations that return no entity echo the ID they acted on.
    #[must_use]
    pub fn echoing(mut self, value: Value) -> Self {
        self.echo = Some(value);
        self
    }

    /// Returns the operation.
    #[must_use]
    pub const fn operation(&self) -> &'static Operation {
        self.operation
    }

    /// Returns the variables.
    #[must_use]
    pub const fn variables(&self) -> &Value {
        &self.variables
    }

    /// Returns the echoed payload, if any.
    #[must_use]
    pub const fn echo(&self) -> Option<&Value> {
        self.echo.as_ref()
    }

    /// Builds the GraphQL request.
    #[must_use]
    pub fn request(&self) -> GraphqlRequest {
        GraphqlRequest::new(self.operation.document).with_variables(self.variables.clone())
    }
}

/// Returns the trimmed value of a required string argument.
pub(crate) fn required(field: &'static str, value: &str) -> Result<String, ToolError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ToolError::MissingArgument { field });
    }
    Ok(trimmed.to_string())
}

/// Returns the trimmed value of an optional string argument, dropping blanks.
pub(crate) fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}
