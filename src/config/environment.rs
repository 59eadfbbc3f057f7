//! Braintree environment selection.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// The Braintree environment requests are sent to.
///
/// Each environment has its own GraphQL endpoint and its own credentials.
///
/// # Example
///
/// ```rust
/// use braintree_bridge::Environment;
///
/// let env: Environment = "production".parse().unwrap();
/// assert_eq!(env.graphql_url(), "https://payments.braintree-api.com/graphql");
/// assert_eq!(Environment::default(), Environment::Sandbox);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Environment {
    /// The sandbox environment used for development and testing.
    #[default]
    Sandbox,
    /// The live production environment.
    Production,
}

impl Environment {
    /// Returns the GraphQL endpoint URL for this environment.
    #[must_use]
    pub const fn graphql_url(&self) -> &'static str {
        match self {
            Self::Sandbox => "https://payments.sandbox.braintree-api.com/graphql",
            Self::Production => "https://payments.braintree-api.com/graphql",
        }
    }

    /// Returns the lowercase name of the environment.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sandbox => "sandbox",
            Self::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sandbox" => Ok(Self::Sandbox),
            "production" => Ok(Self::Production),
            other => Err(ConfigError::InvalidEnvironment {
                value: other.to_string(),
            }),
        }
    }
}
