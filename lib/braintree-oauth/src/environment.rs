use std::fmt;
use std::str::FromStr;

/// The gateway environment a set of credentials belongs to.
///
/// Credentials issued by the gateway embed their environment
/// (`client_id$sandbox$...`), so the environment is usually inferred
/// rather than configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Environment {
    /// Local gateway, used for development and integration testing.
    Development,
    /// Internal QA gateway.
    Qa,
    /// Public sandbox.
    Sandbox,
    /// Live gateway.
    Production,
}

/// Error returned when an environment name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error, derive_more::Display)]
#[display("Unknown environment '{value}'")]
pub struct UnknownEnvironment {
    /// The rejected environment name.
    pub value: String,
}

impl Environment {
    /// Returns the environment name as embedded in credential strings.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Qa => "qa",
            Self::Sandbox => "sandbox",
            Self::Production => "production",
        }
    }

    /// Returns the default gateway base URL for this environment.
    pub fn base_url(self) -> &'static str {
        match self {
            Self::Development => "http://localhost:3000",
            Self::Qa => "https://gateway.qa.braintreepayments.com",
            Self::Sandbox => "https://api.sandbox.braintreegateway.com",
            Self::Production => "https://api.braintreegateway.com",
        }
    }
}

impl FromStr for Environment {
    type Err = UnknownEnvironment;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "development" | "integration" => Ok(Self::Development),
            "qa" => Ok(Self::Qa),
            "sandbox" => Ok(Self::Sandbox),
            "production" => Ok(Self::Production),
            _ => Err(UnknownEnvironment {
                value: value.to_string(),
            }),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
