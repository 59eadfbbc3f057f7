//! # Braintree MCP Bridge
//!
//! A tool bridge for the Braintree GraphQL API: a catalog of payment
//! operations exposed as named tools that take JSON arguments and always
//! return JSON text.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`BraintreeConfig`] and [`BraintreeConfigBuilder`]
//! - Validated newtypes for merchant credentials and endpoints
//! - An async request executor with classified retry and exponential backoff
//! - Safe serialization that never panics and never emits invalid JSON
//! - Response normalization into uniform `{success, ...}` envelopes
//! - A catalog of transaction, payment method and customer tools via [`ToolCatalog`]
//!
//! ## Quick Start
//!
//! ```rust
//! use braintree_bridge::{BraintreeConfig, Credentials, Environment};
//!
//! let config = BraintreeConfig::builder()
//!     .credentials(Credentials::new("merchant-id", "public-key", "private-key").unwrap())
//!     .environment(Environment::Sandbox)
//!     .build();
//!
//! assert_eq!(config.api_version().to_string(), "2025-04-01");
//! ```
//!
//! ## Calling Tools
//!
//! ```rust,ignore
//! use braintree_bridge::{BraintreeConfig, ToolCatalog};
//! use serde_json::json;
//!
//! // Reads BRAINTREE_MERCHANT_ID, BRAINTREE_PUBLIC_KEY, BRAINTREE_PRIVATE_KEY, ...
//! let config = BraintreeConfig::from_env()?;
//! let catalog = ToolCatalog::new(&config)?;
//!
//! for tool in catalog.tools() {
//!     println!("{}: {}", tool.name, tool.description);
//! }
//!
//! let output = catalog
//!     .call("fetch_transaction", json!({"transaction_id": "dHJhbnNhY3Rpb25fYWJj"}))
//!     .await;
//! // {"success":true,"transaction":{...}} or {"success":false,"error":"..."}
//! ```
//!
//! ## Raw GraphQL
//!
//! ```rust,ignore
//! use braintree_bridge::{BraintreeConfig, GraphqlClient, GraphqlRequest};
//!
//! let client = GraphqlClient::new(&BraintreeConfig::from_env()?);
//! let result = client.execute(&GraphqlRequest::new("query Ping { ping }"), 1).await;
//! assert!(!result.has_errors());
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: Credentials and documents are checked at construction
//! - **Thread-safe**: The executor and the catalog are `Send + Sync`
//! - **Async-first**: Designed for use with Tokio async runtime
//! - **Total outputs**: Tool calls return JSON text and never panic

pub mod clients;
pub mod config;
pub mod error;
pub mod json;
pub mod normalize;
pub mod tools;

// Re-export public types at crate root for convenience
pub use config::{
    ApiVersion, BraintreeConfig, BraintreeConfigBuilder, Credentials, EndpointUrl, Environment,
    MerchantId, PrivateKey, PublicKey,
};
pub use error::ConfigError;

// Re-export executor types
pub use clients::{GraphqlClient, GraphqlRequest, GraphqlResult, HttpError};

// Re-export tool types
pub use normalize::ToolEnvelope;
pub use tools::{Tool, ToolCatalog, ToolDescriptor, ToolError};
