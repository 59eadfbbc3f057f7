//! HTTP and GraphQL client types for Braintree API communication.
//!
//! This module provides the transport layer for making authenticated
//! requests to the Braintree GraphQL endpoint.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`HttpClient`]: sends one authenticated POST per call
//! - [`HttpResponse`]: the raw status, headers and body of an attempt
//! - [`HttpError`]: status and network failures of an attempt
//! - [`graphql::GraphqlClient`]: the request executor with retry and backoff
//! - [`graphql::GraphqlResult`]: the normalized outcome of an executor call
//!
//! # Retry Behavior
//!
//! The executor retries transient failures with exponential backoff:
//!
//! - **429 (Rate Limited)**: waits for `Retry-After` when numeric, else the current backoff
//! - **5xx and connection errors**: waits for the current backoff
//! - **GraphQL errors** mentioning rate limits, timeouts or temporary failures: same
//! - **Other errors**: returned immediately without retry
//!
//! The backoff starts at one second and doubles after every retry.

mod errors;
pub mod graphql;
mod http_client;
mod http_response;

pub use errors::{HttpError, HttpStatusError};
pub use http_client::{HttpClient, SDK_VERSION};
pub use http_response::{HttpResponse, MAX_RETRY_AFTER};

pub use graphql::{GraphqlClient, GraphqlRequest, GraphqlResult};
