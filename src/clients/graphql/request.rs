//! GraphQL request type.

use serde::Serialize;
use serde_json::{Map, Value};

/// A GraphQL document plus its variables, sent as one POST body.
///
/// Requests are built once per tool call and never mutated afterwards;
/// [`with_variables`](Self::with_variables) consumes the request.
///
/// # Example
///
/// ```rust
/// use braintree_bridge::clients::graphql::GraphqlRequest;
/// use serde_json::json;
///
/// let request = GraphqlRequest::new("query Ping { ping }");
/// assert_eq!(request.to_body(), json!({"query": "query Ping { ping }"}));
///
/// let request = GraphqlRequest::new("query Node($id: ID!) { node(id: $id) { id } }")
///     .with_variables(json!({"id": "dHJhbnNhY3Rpb25fYWJj"}));
/// assert_eq!(request.variables().unwrap()["id"], "dHJhbnNhY3Rpb25fYWJj");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GraphqlRequest {
    query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    variables: Option<Map<String, Value>>,
}

impl GraphqlRequest {
    /// Creates a request with no variables.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: None,
        }
    }

    /// Returns a copy of this request carrying `variables`.
    ///
    /// Only JSON objects are accepted as variable mappings. Anything else,
    /// and an empty object, leaves the request without variables.
    #[must_use]
    pub fn with_variables(self, variables: Value) -> Self {
        let variables = match variables {
            Value::Object(map) if !map.is_empty() => Some(map),
            _ => None,
        };
        Self { variables, ..self }
    }

    /// Returns the GraphQL document.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Returns the variables mapping, if any.
    #[must_use]
    pub const fn variables(&self) -> Option<&Map<String, Value>> {
        self.variables.as_ref()
    }

    /// Returns the JSON body sent upstream.
    #[must_use]
    pub fn to_body(&self) -> Value {
        crate::json::to_json_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_body_omits_missing_variables() {
        let request = GraphqlRequest::new("{ ping }");
        assert_eq!(request.to_body(), json!({"query": "{ ping }"}));
    }

    #[test]
    fn test_body_includes_variables() {
        let request = GraphqlRequest::new("query Q($id: ID!) { node(id: $id) { id } }")
            .with_variables(json!({"id": "abc"}));

        assert_eq!(
            request.to_body(),
            json!({
                "query": "query Q($id: ID!) { node(id: $id) { id } }",
                "variables": {"id": "abc"}
            })
        );
    }

    #[test]
    fn test_empty_or_non_object_variables_are_dropped() {
        let request = GraphqlRequest::new("{ ping }").with_variables(json!({}));
        assert!(request.variables().is_none());

        let request = GraphqlRequest::new("{ ping }").with_variables(json!([1, 2]));
        assert!(request.variables().is_none());
    }

    #[test]
    fn test_with_variables_preserves_query() {
        let original = GraphqlRequest::new("{ ping }");
        let with_vars = original.clone().with_variables(json!({"a": 1}));

        assert_eq!(original.query(), with_vars.query());
        assert!(original.variables().is_none());
    }
}
