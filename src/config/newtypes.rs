//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use std::fmt;

/// A validated Braintree merchant ID.
///
/// # Example
///
/// ```rust
/// use braintree_bridge::MerchantId;
///
/// let id = MerchantId::new("my-merchant").unwrap();
/// assert_eq!(id.as_ref(), "my-merchant");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MerchantId(String);

impl MerchantId {
    /// Creates a new validated merchant ID.
    ///
    /// Surrounding whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyMerchantId`] if the ID is empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ConfigError> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err(ConfigError::EmptyMerchantId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for MerchantId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated Braintree public key.
///
/// The public key is half of the Basic authentication pair; it is not a
/// secret on its own and is shown in debug output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey(String);

impl PublicKey {
    /// Creates a new validated public key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyPublicKey`] if the key is empty.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into().trim().to_string();
        if key.is_empty() {
            return Err(ConfigError::EmptyPublicKey);
        }
        Ok(Self(key))
    }
}

impl AsRef<str> for PublicKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated Braintree private key.
///
/// # Security
///
/// The `Debug` implementation masks the secret value, displaying only
/// `PrivateKey(*****)` instead of the actual key.
///
/// # Example
///
/// ```rust
/// use braintree_bridge::PrivateKey;
///
/// let key = PrivateKey::new("my-secret").unwrap();
/// assert_eq!(format!("{:?}", key), "PrivateKey(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey(String);

impl PrivateKey {
    /// Creates a new validated private key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyPrivateKey`] if the key is empty.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into().trim().to_string();
        if key.is_empty() {
            return Err(ConfigError::EmptyPrivateKey);
        }
        Ok(Self(key))
    }
}

impl AsRef<str> for PrivateKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(*****)")
    }
}

/// A validated GraphQL endpoint URL.
///
/// Used to point the bridge at a non-standard endpoint, such as a local
/// mock server in tests or an egress proxy.
///
/// # Example
///
/// ```rust
/// use braintree_bridge::EndpointUrl;
///
/// let url = EndpointUrl::new("http://localhost:3000/graphql").unwrap();
/// assert_eq!(url.scheme(), "http");
/// assert_eq!(url.host_name(), "localhost");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndpointUrl {
    url: String,
    scheme_end: usize,
    host_start: usize,
    host_end: usize,
}

impl EndpointUrl {
    /// Creates a new validated endpoint URL.
    ///
    /// Only `http` and `https` schemes are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEndpointUrl`] if the URL is invalid.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into().trim().to_string();
        let invalid = || ConfigError::InvalidEndpointUrl { url: url.clone() };

        let scheme_end = url.find("://").ok_or_else(invalid)?;
        let scheme = url.get(..scheme_end).ok_or_else(invalid)?;
        if !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https") {
            return Err(invalid());
        }

        let host_start = scheme_end + 3;
        let remainder = url.get(host_start..).ok_or_else(invalid)?;
        let host_end = remainder
            .find([':', '/', '?', '#'])
            .map_or(url.len(), |i| host_start + i);
        if host_end <= host_start {
            return Err(invalid());
        }

        Ok(Self {
            url,
            scheme_end,
            host_start,
            host_end,
        })
    }

    /// Returns the URL scheme (e.g., "https").
    #[must_use]
    pub fn scheme(&self) -> &str {
        self.url.get(..self.scheme_end).unwrap_or_default()
    }

    /// Returns the host name portion of the URL.
    #[must_use]
    pub fn host_name(&self) -> &str {
        self.url
            .get(self.host_start..self.host_end)
            .unwrap_or_default()
    }
}

impl AsRef<str> for EndpointUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for EndpointUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}
