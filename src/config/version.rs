//! Braintree API version definitions.
//!
//! Braintree versions its GraphQL API by release date and expects the
//! version in the `Braintree-Version` request header as `YYYY-MM-DD`.

use crate::error::ConfigError;
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

/// Braintree GraphQL API version.
///
/// # Example
///
/// ```rust
/// use braintree_bridge::ApiVersion;
///
/// let version: ApiVersion = "2024-07-01".parse().unwrap();
/// assert_eq!(version.to_string(), "2024-07-01");
/// assert!(version < ApiVersion::latest());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ApiVersion(NaiveDate);

impl ApiVersion {
    const FORMAT: &'static str = "%Y-%m-%d";

    /// Returns the API version this bridge is developed against.
    #[must_use]
    pub fn latest() -> Self {
        Self(NaiveDate::from_ymd_opt(2025, 4, 1).unwrap_or_default())
    }

    /// Returns the release date of this version.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.0
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        Self::latest()
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(Self::FORMAT))
    }
}

impl FromStr for ApiVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        // chrono accepts unpadded fields; the header value must be exact.
        if s.len() != 10 {
            return Err(ConfigError::InvalidApiVersion {
                version: s.to_string(),
            });
        }
        NaiveDate::parse_from_str(s, Self::FORMAT)
            .map(Self)
            .map_err(|_| ConfigError::InvalidApiVersion {
                version: s.to_string(),
            })
    }
}
