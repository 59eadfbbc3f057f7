//! Path walking and connection flattening over response data.

use serde_json::Value;

/// The outcome of walking an extraction path.
#[derive(Clone, Debug, PartialEq)]
pub enum Extracted<'a> {
    /// A non-null value at the end of the path.
    Found(&'a Value),
    /// A key along the path is absent or the final value is `null`.
    Missing,
    /// A value along the path is not an object.
    Malformed(String),
}

/// Walks `path` through `data`.
///
/// # Example
///
/// ```rust
/// use braintree_bridge::normalize::{walk, Extracted};
/// use serde_json::json;
///
/// let data = json!({"node": {"id": "abc"}});
/// assert_eq!(walk(&data, &["node", "id"]), Extracted::Found(&json!("abc")));
/// assert_eq!(walk(&data, &["node", "status"]), Extracted::Missing);
/// assert!(matches!(walk(&data, &["node", "id", "x"]), Extracted::Malformed(_)));
/// ```
#[must_use]
pub fn walk<'a>(data: &'a Value, path: &[&str]) -> Extracted<'a> {
    let mut current = data;
    for (depth, key) in path.iter().enumerate() {
        let map = match current {
            Value::Null => return Extracted::Missing,
            Value::Object(map) => map,
            other => {
                return Extracted::Malformed(format!(
                    "Unexpected response structure: expected an object at '{}', found {}",
                    path[..depth].join("."),
                    type_name(other)
                ));
            }
        };
        match map.get(*key) {
            Some(next) => current = next,
            None => return Extracted::Missing,
        }
    }
    if current.is_null() {
        Extracted::Missing
    } else {
        Extracted::Found(current)
    }
}

/// A flattened GraphQL connection.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Connection {
    /// The `edges[].node` values, in order.
    pub nodes: Vec<Value>,
    /// The `pageInfo` member, when selected.
    pub page_info: Option<Value>,
}

/// Flattens a `{edges: [{node}], pageInfo}` connection.
///
/// Missing or `null` edges give an empty node list, and edges whose node is
/// `null` are skipped.
///
/// # Errors
///
/// Returns a description when the connection, its `edges`, or an edge has
/// the wrong JSON type.
pub fn flatten_connection(connection: &Value) -> Result<Connection, String> {
    let map = connection.as_object().ok_or_else(|| {
        format!(
            "Unexpected response structure: expected a connection object, found {}",
            type_name(connection)
        )
    })?;

    let nodes = match map.get("edges") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(edges)) => edges
            .iter()
            .filter_map(|edge| edge_node(edge).transpose())
            .collect::<Result<Vec<_>, _>>()?,
        Some(other) => {
            return Err(format!(
                "Unexpected response structure: expected 'edges' to be a list, found {}",
                type_name(other)
            ))
        }
    };

    Ok(Connection {
        nodes,
        page_info: map.get("pageInfo").filter(|v| !v.is_null()).cloned(),
    })
}

fn edge_node(edge: &Value) -> Result<Option<Value>, String> {
    match edge {
        Value::Object(edge) => Ok(edge.get("node").filter(|n| !n.is_null()).cloned()),
        other => Err(format!(
            "Unexpected response structure: expected an edge object, found {}",
            type_name(other)
        )),
    }
}

/// Returns the `__typename` of an object value.
#[must_use]
pub fn typename(value: &Value) -> Option<&str> {
    value.get("__typename").and_then(Value::as_str)
}

const fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_walk_null_intermediate_is_missing() {
        let data = json!({"chargePaymentMethod": null});
        assert_eq!(
            walk(&data, &["chargePaymentMethod", "transaction"]),
            Extracted::Missing
        );
    }

    #[test]
    fn test_walk_null_terminal_is_missing() {
        let data = json!({"node": null});
        assert_eq!(walk(&data, &["node"]), Extracted::Missing);
    }

    #[test]
    fn test_walk_wrong_type_is_malformed() {
        let data = json!({"search": [1, 2]});
        match walk(&data, &["search", "transactions"]) {
            Extracted::Malformed(message) => {
                assert!(message.contains("'search'"));
                assert!(message.contains("a list"));
            }
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn test_walk_empty_path_returns_root() {
        let data = json!({"ping": "pong"});
        assert_eq!(walk(&data, &[]), Extracted::Found(&data));
    }

    #[test]
    fn test_flatten_connection_with_page_info() {
        let connection = json!({
            "pageInfo": {"hasNextPage": true, "endCursor": "c2"},
            "edges": [{"node": {"id": "1"}}, {"node": {"id": "2"}}]
        });

        let flattened = flatten_connection(&connection).unwrap();
        assert_eq!(flattened.nodes, vec![json!({"id": "1"}), json!({"id": "2"})]);
        assert_eq!(flattened.page_info.unwrap()["endCursor"], "c2");
    }

    #[test]
    fn test_flatten_connection_missing_or_null_edges() {
        assert!(flatten_connection(&json!({})).unwrap().nodes.is_empty());
        assert!(flatten_connection(&json!({"edges": null})).unwrap().nodes.is_empty());
        assert!(flatten_connection(&json!({"edges": []})).unwrap().nodes.is_empty());
    }

    #[test]
    fn test_flatten_connection_skips_null_nodes() {
        let connection = json!({"edges": [{"node": null}, {"node": {"id": "1"}}, {}]});
        assert_eq!(flatten_connection(&connection).unwrap().nodes.len(), 1);
    }

    #[test]
    fn test_flatten_connection_rejects_wrong_types() {
        assert!(flatten_connection(&json!("edges")).is_err());
        assert!(flatten_connection(&json!({"edges": {"node": {}}})).is_err());
        assert!(flatten_connection(&json!({"edges": [5]})).is_err());
    }
}
