//! HTTP client for Braintree API communication.
//!
//! This module provides the [`HttpClient`] type: one authenticated POST to
//! the GraphQL endpoint per call. Retry decisions live one layer up in
//! [`GraphqlClient`](crate::clients::graphql::GraphqlClient).

use std::collections::HashMap;

use crate::clients::errors::{HttpError, HttpStatusError};
use crate::clients::graphql::GraphqlRequest;
use crate::clients::http_response::HttpResponse;
use crate::config::{BraintreeConfig, Credentials};
use crate::json;

/// Crate version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for sending GraphQL documents to Braintree.
///
/// The client handles:
/// - Endpoint selection from the configured environment or override URL
/// - Default headers including Basic authorization and `Braintree-Version`
/// - The per-attempt request timeout
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust
/// use braintree_bridge::{BraintreeConfig, Credentials};
/// use braintree_bridge::clients::HttpClient;
///
/// let credentials = Credentials::new("merchant", "public", "private").unwrap();
/// let config = BraintreeConfig::builder().credentials(credentials.clone()).build();
///
/// let client = HttpClient::new(&config, &credentials);
/// assert_eq!(client.url(), "https://payments.sandbox.braintree-api.com/graphql");
/// ```
#[derive(Debug)]
pub struct HttpClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Full GraphQL endpoint URL.
    url: String,
    /// Default headers to include in all requests.
    default_headers: HashMap<String, String>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client for the given configuration and credentials.
    ///
    /// If the TLS backend cannot be initialized with the configured timeout,
    /// reqwest's default client is used instead.
    #[must_use]
    pub fn new(config: &BraintreeConfig, credentials: &Credentials) -> Self {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}Braintree MCP Bridge v{SDK_VERSION} | Rust {rust_version}");

        let mut default_headers = HashMap::new();
        default_headers.insert(
            "Authorization".to_string(),
            credentials.authorization_header(),
        );
        default_headers.insert(
            "Braintree-Version".to_string(),
            config.api_version().to_string(),
        );
        default_headers.insert("Content-Type".to_string(), "application/json".to_string());
        default_headers.insert("Accept".to_string(), "application/json".to_string());
        default_headers.insert("User-Agent".to_string(), user_agent);

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(config.request_timeout())
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build configured HTTP client, using defaults: {e}");
                reqwest::Client::new()
            });

        Self {
            client,
            url: config.graphql_url().to_string(),
            default_headers,
        }
    }

    /// Returns the GraphQL endpoint URL for this client.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Sends one attempt of a GraphQL request.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] when the request cannot be sent or
    /// times out, and [`HttpError::Status`] for any non-2xx response.
    pub async fn send(&self, request: &GraphqlRequest) -> Result<HttpResponse, HttpError> {
        let mut req_builder = self.client.post(&self.url);
        for (key, value) in &self.default_headers {
            req_builder = req_builder.header(key, value);
        }
        req_builder = req_builder.body(json::to_json_string(&request.to_body()));

        let res = req_builder.send().await?;

        let code = res.status().as_u16();
        let res_headers = Self::parse_response_headers(res.headers());
        let body = res.text().await?;

        let response = HttpResponse::new(code, res_headers, body);
        tracing::info!("Braintree response status: {code}");

        if response.is_ok() {
            return Ok(response);
        }

        let status = HttpStatusError::from_body(code, &response.body, response.content_type());
        tracing::warn!("{status}");
        Err(status.with_retry_after(response.retry_request_after).into())
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EndpointUrl, Environment};

    fn credentials() -> Credentials {
        Credentials::new("merchant", "public", "private").unwrap()
    }

    #[test]
    fn test_client_uses_environment_endpoint() {
        let config = BraintreeConfig::builder()
            .environment(Environment::Production)
            .build();
        let client = HttpClient::new(&config, &credentials());

        assert_eq!(client.url(), "https://payments.braintree-api.com/graphql");
    }

    #[test]
    fn test_client_uses_endpoint_override() {
        let config = BraintreeConfig::builder()
            .endpoint(EndpointUrl::new("http://127.0.0.1:9999/graphql").unwrap())
            .build();
        let client = HttpClient::new(&config, &credentials());

        assert_eq!(client.url(), "http://127.0.0.1:9999/graphql");
    }

    #[test]
    fn test_authorization_and_version_headers() {
        let config = BraintreeConfig::builder().build();
        let client = HttpClient::new(&config, &credentials());
        let headers = client.default_headers();

        assert_eq!(
            headers.get("Authorization"),
            Some(&"Basic cHVibGljOnByaXZhdGU=".to_string())
        );
        assert_eq!(
            headers.get("Braintree-Version"),
            Some(&"2025-04-01".to_string())
        );
        assert_eq!(
            headers.get("Content-Type"),
            Some(&"application/json".to_string())
        );
        assert_eq!(headers.get("Accept"), Some(&"application/json".to_string()));
    }

    #[test]
    fn test_user_agent_header_format() {
        let config = BraintreeConfig::builder().build();
        let client = HttpClient::new(&config, &credentials());

        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.starts_with("Braintree MCP Bridge v"));
        assert!(user_agent.contains("Rust"));
    }

    #[test]
    fn test_user_agent_with_prefix() {
        let config = BraintreeConfig::builder()
            .user_agent_prefix("MyAgent/1.0")
            .build();
        let client = HttpClient::new(&config, &credentials());

        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.starts_with("MyAgent/1.0 | "));
        assert!(user_agent.contains("Braintree MCP Bridge"));
    }
}
