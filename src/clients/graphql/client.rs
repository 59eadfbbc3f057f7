//! GraphQL request executor for the Braintree API.
//!
//! This module provides the [`GraphqlClient`] type: one authenticated call
//! with classified retry and exponential backoff, always ending in a
//! [`GraphqlResult`].

use std::time::Duration;

use crate::clients::graphql::retry::{self, RetryState};
use crate::clients::graphql::{ExecutionError, GraphqlRequest, GraphqlResult};
use crate::clients::HttpClient;
use crate::config::{ApiVersion, BraintreeConfig};
use crate::json;

/// Number of query characters included in attempt trace lines.
const TRACE_QUERY_CHARS: usize = 100;

/// The result of one executor call together with its retry bookkeeping.
#[derive(Clone, Debug)]
pub struct Execution {
    /// The normalized result.
    pub result: GraphqlResult,
    /// Attempts made and waits taken during the call.
    pub state: RetryState,
}

/// GraphQL request executor for the Braintree API.
///
/// Outcomes of each attempt are classified as:
///
/// - **success**: 2xx, body parses, no transient GraphQL error. Returned immediately.
/// - **retryable**: 5xx, 429, connection errors and timeouts, or a GraphQL
///   error matching [`retry::TRANSIENT_PHRASES`]. Retried after a backoff that
///   starts at the configured initial backoff and doubles every retry.
/// - **terminal**: other 4xx, protocol errors, non-transient GraphQL errors.
///
/// A 429 response with a numeric `Retry-After` header waits that long instead
/// of the computed backoff. Once the retry budget is spent, the last attempt's
/// error is returned as it is.
///
/// # Thread Safety
///
/// `GraphqlClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use braintree_bridge::BraintreeConfig;
/// use braintree_bridge::clients::graphql::{GraphqlClient, GraphqlRequest};
///
/// let config = BraintreeConfig::from_env()?;
/// let client = GraphqlClient::new(&config);
///
/// let result = client.execute(&GraphqlRequest::new("query Ping { ping }"), 1).await;
/// if result.has_errors() {
///     println!("Ping failed: {}", result.joined_errors());
/// }
/// ```
#[derive(Debug)]
pub struct GraphqlClient {
    /// The transport; absent when no credentials were configured.
    http_client: Option<HttpClient>,
    /// The API version sent in `Braintree-Version`.
    api_version: ApiVersion,
    /// The first backoff of every call.
    initial_backoff: Duration,
}

// Verify GraphqlClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<GraphqlClient>();
};

impl GraphqlClient {
    /// Creates an executor from the configuration.
    ///
    /// This constructor is infallible. Without credentials every call
    /// returns a missing-credentials result without touching the network.
    #[must_use]
    pub fn new(config: &BraintreeConfig) -> Self {
        let http_client = config
            .credentials()
            .map(|credentials| HttpClient::new(config, credentials));

        if http_client.is_none() {
            tracing::error!("Braintree API credentials are not configured; requests will fail");
        } else {
            tracing::debug!(
                "GraphQL client configured for {} ({}) with API version {}",
                config.environment(),
                config.graphql_url(),
                config.api_version()
            );
        }

        Self {
            http_client,
            api_version: config.api_version(),
            initial_backoff: config.initial_backoff(),
        }
    }

    /// Returns the API version used by this client.
    #[must_use]
    pub const fn api_version(&self) -> ApiVersion {
        self.api_version
    }

    /// Returns `true` when credentials were configured.
    #[must_use]
    pub const fn has_credentials(&self) -> bool {
        self.http_client.is_some()
    }

    /// Returns the endpoint URL, when credentials were configured.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.http_client.as_ref().map(HttpClient::url)
    }

    /// Executes a request, retrying transient failures up to `max_retries` times.
    ///
    /// Never fails: errors are returned as an error-shaped [`GraphqlResult`].
    pub async fn execute(&self, request: &GraphqlRequest, max_retries: u32) -> GraphqlResult {
        self.execute_with_state(request, max_retries).await.result
    }

    /// Like [`execute`](Self::execute), also returning the retry bookkeeping.
    pub async fn execute_with_state(&self, request: &GraphqlRequest, max_retries: u32) -> Execution {
        let mut state = RetryState::new(self.initial_backoff);
        let result = match self.run(request, max_retries, &mut state).await {
            Ok(result) => result,
            Err(error) => {
                tracing::warn!("Braintree request failed: {error}");
                error.into_result()
            }
        };
        Execution { result, state }
    }

    async fn run(
        &self,
        request: &GraphqlRequest,
        max_retries: u32,
        state: &mut RetryState,
    ) -> Result<GraphqlResult, ExecutionError> {
        let Some(http_client) = &self.http_client else {
            return Err(ExecutionError::MissingCredentials);
        };

        let total = max_retries.saturating_add(1);
        loop {
            let attempt = state.begin_attempt();
            tracing::debug!(
                "Sending request to Braintree (attempt {attempt}/{total}): {}",
                json::truncate_chars(request.query(), TRACE_QUERY_CHARS)
            );

            match http_client.send(request).await {
                Ok(response) => {
                    let body = json::parse_body(&response.body, response.content_type())?;
                    let result = GraphqlResult::from_value(body);

                    if result.has_errors() {
                        tracing::warn!("GraphQL errors: {}", result.joined_errors());
                        if retry::is_transient_result(&result) && state.can_retry(max_retries) {
                            let wait = state.next_wait(None);
                            tracing::warn!("Retryable GraphQL error, retrying after {wait:?}");
                            tokio::time::sleep(wait).await;
                            continue;
                        }
                    }
                    return Ok(result);
                }
                Err(error) if error.is_transient() && state.can_retry(max_retries) => {
                    let wait = state.next_wait(error.retry_after());
                    tracing::warn!("{error}; retrying after {wait:?}");
                    tokio::time::sleep(wait).await;
                }
                Err(error) => return Err(error.into()),
            }
        }
    }
}
