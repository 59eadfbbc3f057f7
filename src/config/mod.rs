//! Configuration types for the Braintree bridge.
//!
//! This module is the credential and endpoint resolver: it turns
//! process configuration into an immutable [`BraintreeConfig`] that is built
//! once at startup and passed by reference to the request executor.
//!
//! # Overview
//!
//! - [`BraintreeConfig`]: resolved endpoint, API version, credentials and retry timing
//! - [`BraintreeConfigBuilder`]: builder for [`BraintreeConfig`]
//! - [`Credentials`]: merchant ID plus the public/private key pair
//! - [`Environment`]: sandbox or production
//! - [`ApiVersion`]: the `Braintree-Version` header value
//!
//! # Example
//!
//! ```rust
//! use braintree_bridge::{BraintreeConfig, Credentials, Environment};
//!
//! let config = BraintreeConfig::builder()
//!     .credentials(Credentials::new("merchant", "public", "private").unwrap())
//!     .environment(Environment::Sandbox)
//!     .build();
//!
//! assert_eq!(
//!     config.graphql_url(),
//!     "https://payments.sandbox.braintree-api.com/graphql"
//! );
//! ```

mod environment;
mod newtypes;
mod version;

pub use environment::Environment;
pub use newtypes::{EndpointUrl, MerchantId, PrivateKey, PublicKey};
pub use version::ApiVersion;

use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::ConfigError;

/// Default initial wait before the first retry.
pub const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_secs(1);

/// Shortest accepted initial backoff; smaller values are raised to it.
pub const MIN_INITIAL_BACKOFF: Duration = Duration::from_millis(1);

/// Default per-attempt network timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default listen host for persistent-connection transports.
pub const DEFAULT_LISTEN_HOST: &str = "127.0.0.1";

/// Default listen port for persistent-connection transports.
pub const DEFAULT_LISTEN_PORT: u16 = 8001;

/// Environment variable names read by [`BraintreeConfig::from_env`].
pub mod env_vars {
    /// Braintree merchant ID.
    pub const MERCHANT_ID: &str = "BRAINTREE_MERCHANT_ID";
    /// Braintree public key.
    pub const PUBLIC_KEY: &str = "BRAINTREE_PUBLIC_KEY";
    /// Braintree private key.
    pub const PRIVATE_KEY: &str = "BRAINTREE_PRIVATE_KEY";
    /// `sandbox` (default) or `production`.
    pub const ENVIRONMENT: &str = "BRAINTREE_ENVIRONMENT";
    /// `Braintree-Version` header override.
    pub const API_VERSION: &str = "BRAINTREE_API_VERSION";
    /// GraphQL endpoint override.
    pub const API_URL: &str = "BRAINTREE_API_URL";
    /// Listen host for persistent-connection transports.
    pub const LISTEN_HOST: &str = "BRAINTREE_MCP_HOST";
    /// Listen port for persistent-connection transports.
    pub const LISTEN_PORT: &str = "BRAINTREE_MCP_PORT";
}

/// Braintree API credentials.
///
/// # Security
///
/// The private key is masked in `Debug` output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    merchant_id: MerchantId,
    public_key: PublicKey,
    private_key: PrivateKey,
}

impl Credentials {
    /// Creates validated credentials from raw strings.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] of the first empty value.
    pub fn new(
        merchant_id: impl Into<String>,
        public_key: impl Into<String>,
        private_key: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            merchant_id: MerchantId::new(merchant_id)?,
            public_key: PublicKey::new(public_key)?,
            private_key: PrivateKey::new(private_key)?,
        })
    }

    /// Returns the merchant ID.
    #[must_use]
    pub const fn merchant_id(&self) -> &MerchantId {
        &self.merchant_id
    }

    /// Returns the public key.
    #[must_use]
    pub const fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Returns the `Authorization` header value: `Basic base64(public:private)`.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        let pair = format!(
            "{}:{}",
            self.public_key.as_ref(),
            self.private_key.as_ref()
        );
        format!("Basic {}", STANDARD.encode(pair))
    }
}

/// Resolved configuration for the Braintree bridge.
///
/// Credentials are optional here so that a bare executor can fail closed per
/// call; [`ToolCatalog::new`](crate::tools::ToolCatalog::new) requires them.
///
/// # Thread Safety
///
/// `BraintreeConfig` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug)]
pub struct BraintreeConfig {
    credentials: Option<Credentials>,
    environment: Environment,
    api_version: ApiVersion,
    endpoint: Option<EndpointUrl>,
    user_agent_prefix: Option<String>,
    initial_backoff: Duration,
    request_timeout: Duration,
    listen_host: String,
    listen_port: u16,
}

// Verify BraintreeConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<BraintreeConfig>();
};

impl BraintreeConfig {
    /// Creates a new builder for constructing a `BraintreeConfig`.
    #[must_use]
    pub fn builder() -> BraintreeConfigBuilder {
        BraintreeConfigBuilder::new()
    }

    /// Reads the configuration from process environment variables.
    ///
    /// Missing credentials are not an error here; they are logged and left
    /// unset so the caller decides whether that is fatal.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated as absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is present but invalid.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::HashMap;
    /// use braintree_bridge::{BraintreeConfig, Environment};
    ///
    /// let vars = HashMap::from([("BRAINTREE_ENVIRONMENT", "production")]);
    /// let config = BraintreeConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
    ///
    /// assert_eq!(config.environment(), Environment::Production);
    /// assert!(config.credentials().is_none());
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut builder = Self::builder();

        match (
            get(env_vars::MERCHANT_ID),
            get(env_vars::PUBLIC_KEY),
            get(env_vars::PRIVATE_KEY),
        ) {
            (Some(merchant_id), Some(public_key), Some(private_key)) => {
                builder = builder.credentials(Credentials::new(
                    merchant_id,
                    public_key,
                    private_key,
                )?);
            }
            _ => {
                tracing::error!("Braintree credentials not found in environment");
            }
        }

        if let Some(environment) = get(env_vars::ENVIRONMENT) {
            builder = builder.environment(environment.parse()?);
        }
        if let Some(version) = get(env_vars::API_VERSION) {
            builder = builder.api_version(version.parse()?);
        }
        if let Some(url) = get(env_vars::API_URL) {
            builder = builder.endpoint(EndpointUrl::new(url)?);
        }
        if let Some(host) = get(env_vars::LISTEN_HOST) {
            builder = builder.listen_host(host.trim());
        }
        if let Some(port) = get(env_vars::LISTEN_PORT) {
            let parsed = port
                .trim()
                .parse::<u16>()
                .ok()
                .filter(|p| *p != 0)
                .ok_or(ConfigError::InvalidPort { value: port })?;
            builder = builder.listen_port(parsed);
        }

        Ok(builder.build())
    }

    /// Returns the credentials, if configured.
    #[must_use]
    pub const fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Returns the credentials or [`ConfigError::MissingCredentials`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCredentials`] when none are configured.
    pub fn require_credentials(&self) -> Result<&Credentials, ConfigError> {
        self.credentials
            .as_ref()
            .ok_or(ConfigError::MissingCredentials)
    }

    /// Returns the environment.
    #[must_use]
    pub const fn environment(&self) -> Environment {
        self.environment
    }

    /// Returns the API version.
    #[must_use]
    pub const fn api_version(&self) -> ApiVersion {
        self.api_version
    }

    /// Returns the GraphQL endpoint, honoring an explicit override.
    #[must_use]
    pub fn graphql_url(&self) -> &str {
        self.endpoint
            .as_ref()
            .map_or_else(|| self.environment.graphql_url(), AsRef::as_ref)
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the wait before the first retry.
    #[must_use]
    pub const fn initial_backoff(&self) -> Duration {
        self.initial_backoff
    }

    /// Returns the per-attempt network timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Returns the listen host for persistent-connection transports.
    #[must_use]
    pub fn listen_host(&self) -> &str {
        &self.listen_host
    }

    /// Returns the listen port for persistent-connection transports.
    #[must_use]
    pub const fn listen_port(&self) -> u16 {
        self.listen_port
    }
}

/// Builder for constructing [`BraintreeConfig`] instances.
///
/// # Defaults
///
/// - `environment`: sandbox
/// - `api_version`: [`ApiVersion::latest`]
/// - `initial_backoff`: 1 second
/// - `request_timeout`: 30 seconds
/// - `listen_host` / `listen_port`: `127.0.0.1:8001`
#[derive(Debug, Default)]
pub struct BraintreeConfigBuilder {
    credentials: Option<Credentials>,
    environment: Option<Environment>,
    api_version: Option<ApiVersion>,
    endpoint: Option<EndpointUrl>,
    user_agent_prefix: Option<String>,
    initial_backoff: Option<Duration>,
    request_timeout: Option<Duration>,
    listen_host: Option<String>,
    listen_port: Option<u16>,
}

impl BraintreeConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API credentials.
    #[must_use]
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Sets the environment.
    #[must_use]
    pub const fn environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Sets the API version.
    #[must_use]
    pub const fn api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Overrides the GraphQL endpoint derived from the environment.
    #[must_use]
    pub fn endpoint(mut self, endpoint: EndpointUrl) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Sets the wait before the first retry. Later waits double it.
    ///
    /// A zero backoff is raised to [`MIN_INITIAL_BACKOFF`] so waits keep growing.
    #[must_use]
    pub const fn initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = Some(if backoff.is_zero() {
            MIN_INITIAL_BACKOFF
        } else {
            backoff
        });
        self
    }

    /// Sets the per-attempt network timeout.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sets the listen host for persistent-connection transports.
    #[must_use]
    pub fn listen_host(mut self, host: impl Into<String>) -> Self {
        self.listen_host = Some(host.into());
        self
    }

    /// Sets the listen port for persistent-connection transports.
    #[must_use]
    pub const fn listen_port(mut self, port: u16) -> Self {
        self.listen_port = Some(port);
        self
    }

    /// Builds the [`BraintreeConfig`], filling in defaults.
    #[must_use]
    pub fn build(self) -> BraintreeConfig {
        BraintreeConfig {
            credentials: self.credentials,
            environment: self.environment.unwrap_or_default(),
            api_version: self.api_version.unwrap_or_default(),
            endpoint: self.endpoint,
            user_agent_prefix: self.user_agent_prefix,
            initial_backoff: self.initial_backoff.unwrap_or(DEFAULT_INITIAL_BACKOFF),
            request_timeout: self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT),
            listen_host: self
                .listen_host
                .unwrap_or_else(|| DEFAULT_LISTEN_HOST.to_string()),
            listen_port: self.listen_port.unwrap_or(DEFAULT_LISTEN_PORT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_builder_provides_sensible_defaults() {
        let config = BraintreeConfig::builder().build();

        assert!(config.credentials().is_none());
        assert_eq!(config.environment(), Environment::Sandbox);
        assert_eq!(config.api_version(), ApiVersion::latest());
        assert_eq!(config.initial_backoff(), Duration::from_secs(1));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.listen_host(), "127.0.0.1");
        assert_eq!(config.listen_port(), 8001);
        assert!(config.user_agent_prefix().is_none());
    }

    #[test]
    fn test_zero_initial_backoff_is_raised_to_minimum() {
        let config = BraintreeConfig::builder()
            .initial_backoff(Duration::ZERO)
            .build();
        assert_eq!(config.initial_backoff(), MIN_INITIAL_BACKOFF);

        let config = BraintreeConfig::builder()
            .initial_backoff(Duration::from_micros(10))
            .build();
        assert_eq!(config.initial_backoff(), Duration::from_micros(10));
    }

    #[test]
    fn test_authorization_header_is_basic_base64() {
        let credentials = Credentials::new("merchant", "public", "private").unwrap();
        // base64("public:private")
        assert_eq!(
            credentials.authorization_header(),
            "Basic cHVibGljOnByaXZhdGU="
        );
    }

    #[test]
    fn test_credentials_debug_masks_private_key() {
        let credentials = Credentials::new("merchant", "public", "very-secret").unwrap();
        let debug = format!("{credentials:?}");
        assert!(!debug.contains("very-secret"));
        assert!(debug.contains("public"));
    }

    #[test]
    fn test_endpoint_override_wins_over_environment() {
        let config = BraintreeConfig::builder()
            .environment(Environment::Production)
            .endpoint(EndpointUrl::new("http://localhost:9999/graphql").unwrap())
            .build();

        assert_eq!(config.graphql_url(), "http://localhost:9999/graphql");
    }

    #[test]
    fn test_require_credentials_fails_when_absent() {
        let config = BraintreeConfig::builder().build();
        assert!(matches!(
            config.require_credentials(),
            Err(ConfigError::MissingCredentials)
        ));
    }

    #[test]
    fn test_from_lookup_reads_all_variables() {
        let config = BraintreeConfig::from_lookup(lookup_from(&[
            ("BRAINTREE_MERCHANT_ID", "merchant"),
            ("BRAINTREE_PUBLIC_KEY", "public"),
            ("BRAINTREE_PRIVATE_KEY", "private"),
            ("BRAINTREE_ENVIRONMENT", "production"),
            ("BRAINTREE_API_VERSION", "2024-07-01"),
            ("BRAINTREE_MCP_HOST", "0.0.0.0"),
            ("BRAINTREE_MCP_PORT", "9001"),
        ]))
        .unwrap();

        let credentials = config.require_credentials().unwrap();
        assert_eq!(credentials.merchant_id().as_ref(), "merchant");
        assert_eq!(config.environment(), Environment::Production);
        assert_eq!(config.api_version().to_string(), "2024-07-01");
        assert_eq!(config.graphql_url(), "https://payments.braintree-api.com/graphql");
        assert_eq!(config.listen_host(), "0.0.0.0");
        assert_eq!(config.listen_port(), 9001);
    }

    #[test]
    fn test_from_lookup_treats_partial_credentials_as_missing() {
        let config = BraintreeConfig::from_lookup(lookup_from(&[
            ("BRAINTREE_MERCHANT_ID", "merchant"),
            ("BRAINTREE_PUBLIC_KEY", "public"),
            ("BRAINTREE_PRIVATE_KEY", "  "),
        ]))
        .unwrap();

        assert!(config.credentials().is_none());
    }

    #[test]
    fn test_from_lookup_rejects_invalid_values() {
        let result = BraintreeConfig::from_lookup(lookup_from(&[(
            "BRAINTREE_ENVIRONMENT",
            "staging",
        )]));
        assert!(matches!(result, Err(ConfigError::InvalidEnvironment { .. })));

        let result =
            BraintreeConfig::from_lookup(lookup_from(&[("BRAINTREE_MCP_PORT", "not-a-port")]));
        assert!(matches!(result, Err(ConfigError::InvalidPort { .. })));

        let result = BraintreeConfig::from_lookup(lookup_from(&[("BRAINTREE_MCP_PORT", "0")]));
        assert!(matches!(result, Err(ConfigError::InvalidPort { .. })));
    }

    #[test]
    fn test_config_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<BraintreeConfig>();
    }
}
