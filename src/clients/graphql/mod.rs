//! GraphQL request executor for the Braintree API.
//!
//! This module provides the request executor built on top of the
//! single-attempt [`HttpClient`](crate::clients::HttpClient).
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`GraphqlClient`]: executes a [`GraphqlRequest`] with retry and backoff
//! - [`GraphqlRequest`]: an immutable `{query, variables?}` body
//! - [`GraphqlResult`]: the normalized `{data?, errors?, extensions?}` outcome
//! - [`RetryState`]: attempt and wait bookkeeping for one call
//! - [`ExecutionError`]: internal failure taxonomy, folded into results
//!
//! # Example
//!
//! ```rust,ignore
//! use braintree_bridge::BraintreeConfig;
//! use braintree_bridge::clients::graphql::{GraphqlClient, GraphqlRequest};
//! use serde_json::json;
//!
//! let config = BraintreeConfig::from_env()?;
//! let client = GraphqlClient::new(&config);
//!
//! let request = GraphqlRequest::new(
//!     "query IdFromLegacyId($legacyId: ID!, $type: LegacyIdType!) { idFromLegacyId(legacyId: $legacyId, type: $type) }",
//! )
//! .with_variables(json!({"legacyId": "abc123", "type": "TRANSACTION"}));
//!
//! let result = client.execute(&request, 2).await;
//! ```

mod client;
mod errors;
mod request;
mod result;
pub mod retry;

pub use client::{Execution, GraphqlClient};
pub use errors::ExecutionError;
pub use request::GraphqlRequest;
pub use result::{GraphqlErrorEntry, GraphqlResult};
pub use retry::{is_transient_message, RetryState, DEFAULT_MAX_RETRIES};
