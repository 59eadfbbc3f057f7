//! The `execute_graphql` escape hatch.
//!
//! Arbitrary documents bypass the normalizer: the caller gets the result
//! JSON as-is, `data` and `errors` included.

use serde::Deserialize;
use serde_json::Value;

use crate::clients::graphql::{GraphqlClient, GraphqlRequest, DEFAULT_MAX_RETRIES};
use crate::json;
use crate::tools::operation::{check_document, EMPTY_DOCUMENT};

/// Arguments of `execute_graphql`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawArgs {
    /// The GraphQL document. Anything but a string is rejected.
    #[serde(default)]
    pub query: Value,
    /// Variables matching the document's declarations.
    #[serde(default)]
    pub variables: Option<Value>,
}

/// Validates the document and returns the request to send.
fn prepare(args: RawArgs) -> Result<GraphqlRequest, &'static str> {
    let Value::String(query) = args.query else {
        return Err(EMPTY_DOCUMENT);
    };
    check_document(&query)?;

    let request = GraphqlRequest::new(query.trim());
    Ok(match args.variables {
        Some(variables) => request.with_variables(variables),
        None => request,
    })
}

pub(crate) async fn execute_graphql(client: &GraphqlClient, args: RawArgs) -> String {
    let request = match prepare(args) {
        Ok(request) => request,
        Err(reason) => {
            tracing::warn!("Rejected GraphQL document: {reason}");
            return json::to_json_string(&json::error_value(reason));
        }
    };

    let result = client.execute(&request, DEFAULT_MAX_RETRIES).await;
    json::to_json_string(&result.to_value())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::operation::INVALID_DOCUMENT_FORMAT;
    use serde_json::json;

    fn args(value: Value) -> RawArgs {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_prepare_trims_document() {
        let request = prepare(args(json!({
            "query": "\n  query Node($id: ID!) { node(id: $id) { id } }\n",
            "variables": {"id": "abc"}
        })))
        .unwrap();

        assert_eq!(request.query(), "query Node($id: ID!) { node(id: $id) { id } }");
        assert_eq!(request.variables().unwrap()["id"], "abc");
    }

    #[test]
    fn test_prepare_rejects_non_string_query() {
        assert_eq!(prepare(args(json!({"query": 42}))), Err(EMPTY_DOCUMENT));
        assert_eq!(prepare(args(json!({}))), Err(EMPTY_DOCUMENT));
    }

    #[test]
    fn test_prepare_rejects_unknown_operation() {
        assert_eq!(
            prepare(args(json!({"query": "subscription { ping }"}))),
            Err(INVALID_DOCUMENT_FORMAT)
        );
    }

    #[test]
    fn test_rejected_document_returns_error_json_without_network() {
        let config = crate::BraintreeConfig::builder().build();
        let client = GraphqlClient::new(&config);

        let output = tokio_test::block_on(execute_graphql(&client, args(json!({"query": "   "}))));
        let value: Value = serde_json::from_str(&output).unwrap();

        assert_eq!(
            value,
            json!({"errors": [{"message": "Query cannot be empty and must be a string"}]})
        );
    }
}
