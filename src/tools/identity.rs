//! Connectivity and identifier tools.

use serde::{Deserialize, Serialize};

use crate::clients::graphql::DEFAULT_MAX_RETRIES;
use crate::normalize::{ExtractionRule, Shape, ToolContext};
use crate::tools::operation::{required, Invocation, Operation};
use crate::tools::ToolError;

pub(crate) static PING: Operation = Operation {
    name: "ping",
    document: "query Ping { ping }",
    rule: ExtractionRule::node(&["ping"], "ping", "Ping response")
        .shaped(Shape::Exact("pong")),
    context: ToolContext::Ping,
    max_retries: 1,
};

pub(crate) static GRAPHQL_ID_FROM_LEGACY_ID: Operation = Operation {
    name: "get_graphql_id_from_legacy_id",
    document: "query IdFromLegacyId($legacyId: ID!, $type: LegacyIdType!) {
  idFromLegacyId(legacyId: $legacyId, type: $type)
}",
    rule: ExtractionRule::node(&["idFromLegacyId"], "graphql_id", "GraphQL ID for legacy ID"),
    context: ToolContext::Identity,
    max_retries: DEFAULT_MAX_RETRIES,
};

/// Arguments of `get_graphql_id_from_legacy_id`.
#[derive(Clone, Debug, Deserialize)]
pub struct LegacyIdArgs {
    /// The legacy identifier.
    pub legacy_id: String,
    /// `TRANSACTION`, `CUSTOMER`, `PAYMENT_METHOD`, `REFUND`, `DISPUTE`, ...
    pub legacy_id_type: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LegacyIdVariables {
    legacy_id: String,
    #[serde(rename = "type")]
    id_type: String,
}

pub(crate) fn ping() -> Invocation {
    PING.invoke(&serde_json::json!({}))
}

pub(crate) fn graphql_id_from_legacy_id(args: &LegacyIdArgs) -> Result<Invocation, ToolError> {
    let variables = LegacyIdVariables {
        legacy_id: required("legacy_id", &args.legacy_id)?,
        id_type: required("legacy_id_type", &args.legacy_id_type)?
            .to_uppercase()
            .replace(['-', ' '], "_"),
    };
    Ok(GRAPHQL_ID_FROM_LEGACY_ID.invoke(&variables))
}
