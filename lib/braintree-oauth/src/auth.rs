use std::fmt;

use base64::Engine;
use http::HeaderValue;
use http::header::{AUTHORIZATION, HeaderName};
use serde::{Deserialize, Deserializer};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::environment::{Environment, UnknownEnvironment};

/// Errors raised while parsing or encoding gateway credentials.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum CredentialsError {
    /// The client id does not follow the `client_id$<environment>$<id>` layout.
    #[display("Client id must look like 'client_id$<environment>$<id>'")]
    InvalidClientId,

    /// The client secret does not follow the `client_secret$<environment>$<secret>` layout.
    #[display("Client secret must look like 'client_secret$<environment>$<secret>'")]
    InvalidClientSecret,

    /// The access token does not follow the
    /// `access_token$<environment>$<merchant_id>$<token>` layout.
    #[display("Access token must look like 'access_token$<environment>$<merchant_id>$<token>'")]
    InvalidAccessToken,

    /// Client id and client secret were issued for different environments.
    #[display(
        "Mismatched credential environments: client id is {client_id}, client secret is {client_secret}"
    )]
    MismatchedEnvironments {
        /// Environment embedded in the client id.
        client_id: Environment,
        /// Environment embedded in the client secret.
        client_secret: Environment,
    },

    /// The environment segment of a credential is not a known environment.
    #[display("Invalid credentials: {_0}")]
    #[from]
    UnknownEnvironment(UnknownEnvironment),

    /// The credential contains characters that cannot go into an HTTP header.
    #[display("Credentials cannot be used in an HTTP header: {message}")]
    InvalidHeader {
        /// Description of the invalid characters.
        message: String,
    },
}

/// Secret string that zeroes its memory on drop and never prints in full.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecureString(String);

impl SecureString {
    /// Wraps a secret value.
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// Returns the secret value.
    ///
    /// Avoid holding on to the returned reference longer than needed.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the secret is the empty string.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn mask_sensitive(value: &str) -> String {
        let count = value.chars().count();
        if count <= 8 {
            return "***".to_string();
        }
        let head = value.chars().take(4).collect::<String>();
        let tail = value.chars().skip(count - 4).collect::<String>();
        format!("{head}...{tail}")
    }
}

impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureString")
            .field("value", &"[REDACTED]")
            .finish()
    }
}

impl fmt::Display for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Self::mask_sensitive(&self.0))
    }
}

impl From<String> for SecureString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SecureString {
    fn from(value: &str) -> Self {
        Self::new(value.to_string())
    }
}

impl<'de> Deserialize<'de> for SecureString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self::new)
    }
}

/// Credentials used to authenticate against the gateway.
///
/// Client credentials drive the OAuth flows (token exchange, revocation,
/// connect URL). An access token acts on behalf of the merchant that
/// granted it and authenticates every other API call.
///
/// # Example
///
/// ```rust
/// use braintree_oauth::{Credentials, Environment};
///
/// let credentials = Credentials::client(
///     "client_id$sandbox$my_client",
///     "client_secret$sandbox$my_secret",
/// )?;
/// assert_eq!(credentials.environment(), Environment::Sandbox);
///
/// let credentials = Credentials::access_token("access_token$sandbox$merchant_42$abcdef")?;
/// assert_eq!(credentials.merchant_id(), Some("merchant_42"));
/// # Ok::<(), braintree_oauth::CredentialsError>(())
/// ```
#[derive(Clone)]
pub enum Credentials {
    /// OAuth application credentials, sent as HTTP Basic authentication.
    Client {
        /// The application client id.
        client_id: String,
        /// The application client secret.
        client_secret: SecureString,
        /// Environment shared by id and secret.
        environment: Environment,
    },

    /// Merchant access token, sent as a bearer token.
    AccessToken {
        /// The access token.
        token: SecureString,
        /// Merchant the token acts for.
        merchant_id: String,
        /// Environment the token was issued in.
        environment: Environment,
    },
}

impl Credentials {
    /// Parses OAuth client credentials.
    ///
    /// # Errors
    ///
    /// Fails if either value is malformed, names an unknown environment,
    /// or if both values name different environments.
    pub fn client(
        client_id: impl Into<String>,
        client_secret: impl Into<SecureString>,
    ) -> Result<Self, CredentialsError> {
        let client_id = client_id.into();
        let client_secret = client_secret.into();

        let id_environment = match split_credential(&client_id, "client_id", 3).as_deref() {
            Some([env, _id]) => env.parse::<Environment>()?,
            _ => return Err(CredentialsError::InvalidClientId),
        };
        let secret_environment =
            match split_credential(client_secret.as_str(), "client_secret", 3).as_deref() {
                Some([env, _secret]) => env.parse::<Environment>()?,
                _ => return Err(CredentialsError::InvalidClientSecret),
            };

        if id_environment != secret_environment {
            return Err(CredentialsError::MismatchedEnvironments {
                client_id: id_environment,
                client_secret: secret_environment,
            });
        }

        Ok(Self::Client {
            client_id,
            client_secret,
            environment: id_environment,
        })
    }

    /// Parses a merchant access token.
    ///
    /// # Errors
    ///
    /// Fails if the token is malformed or names an unknown environment.
    pub fn access_token(token: impl Into<SecureString>) -> Result<Self, CredentialsError> {
        let token = token.into();
        let (environment, merchant_id) =
            match split_credential(token.as_str(), "access_token", 4).as_deref() {
                Some([env, merchant_id, _hash]) => {
                    (env.parse::<Environment>()?, (*merchant_id).to_string())
                }
                _ => return Err(CredentialsError::InvalidAccessToken),
            };

        Ok(Self::AccessToken {
            token,
            merchant_id,
            environment,
        })
    }

    /// Returns the environment the credentials were issued for.
    pub fn environment(&self) -> Environment {
        match self {
            Self::Client { environment, .. } | Self::AccessToken { environment, .. } => {
                *environment
            }
        }
    }

    /// Returns the merchant id carried by an access token.
    pub fn merchant_id(&self) -> Option<&str> {
        match self {
            Self::Client { .. } => None,
            Self::AccessToken { merchant_id, .. } => Some(merchant_id),
        }
    }

    /// Returns the client id of OAuth client credentials.
    pub fn client_id(&self) -> Option<&str> {
        match self {
            Self::Client { client_id, .. } => Some(client_id),
            Self::AccessToken { .. } => None,
        }
    }

    /// Builds the `Authorization` header for these credentials.
    ///
    /// # Errors
    ///
    /// Fails if the credentials contain characters not allowed in headers.
    pub fn to_header(&self) -> Result<(HeaderName, HeaderValue), CredentialsError> {
        let header_value = match self {
            Self::Client {
                client_id,
                client_secret,
                ..
            } => {
                let raw = format!("{client_id}:{}", client_secret.as_str());
                let encoded = base64::engine::general_purpose::STANDARD.encode(raw);
                format!("Basic {encoded}")
            }
            Self::AccessToken { token, .. } => format!("Bearer {}", token.as_str()),
        };

        let mut value =
            HeaderValue::from_str(&header_value).map_err(|err| CredentialsError::InvalidHeader {
                message: err.to_string(),
            })?;
        value.set_sensitive(true);
        Ok((AUTHORIZATION, value))
    }
}

/// Splits `prefix$a$b...` into its segments after the prefix.
///
/// Returns `None` unless the prefix matches and all `parts - 1` trailing
/// segments are present and non-empty.
fn split_credential<'a>(value: &'a str, prefix: &str, parts: usize) -> Option<Vec<&'a str>> {
    let segments = value.splitn(parts, '$').collect::<Vec<_>>();
    match segments.split_first() {
        Some((head, rest))
            if *head == prefix
                && rest.len() == parts - 1
                && rest.iter().all(|segment| !segment.is_empty()) =>
        {
            Some(rest.to_vec())
        }
        _ => None,
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Client {
                client_id,
                environment,
                ..
            } => f
                .debug_struct("Client")
                .field("client_id", client_id)
                .field("client_secret", &"[REDACTED]")
                .field("environment", environment)
                .finish(),
            Self::AccessToken {
                merchant_id,
                environment,
                ..
            } => f
                .debug_struct("AccessToken")
                .field("token", &"[REDACTED]")
                .field("merchant_id", merchant_id)
                .field("environment", environment)
                .finish(),
        }
    }
}

impl fmt::Display for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Client { client_id, .. } => write!(f, "Client ({client_id})"),
            Self::AccessToken {
                token, merchant_id, ..
            } => write!(f, "AccessToken ({merchant_id}: {token})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLIENT_ID: &str = "client_id$development$integration_client_id";
    const CLIENT_SECRET: &str = "client_secret$development$integration_client_secret";

    #[test]
    fn should_parse_client_credentials() {
        let credentials = Credentials::client(CLIENT_ID, CLIENT_SECRET).expect("valid credentials");

        assert_eq!(credentials.environment(), Environment::Development);
        assert_eq!(credentials.client_id(), Some(CLIENT_ID));
        assert_eq!(credentials.merchant_id(), None);
    }

    #[test]
    fn should_reject_malformed_client_id() {
        let err = Credentials::client("integration_client_id", CLIENT_SECRET)
            .expect_err("missing prefix");
        assert_eq!(err, CredentialsError::InvalidClientId);

        let err = Credentials::client("client_id$development$", CLIENT_SECRET)
            .expect_err("empty id segment");
        assert_eq!(err, CredentialsError::InvalidClientId);
    }

    #[test]
    fn should_reject_malformed_client_secret() {
        let err = Credentials::client(CLIENT_ID, "client_id$development$oops")
            .expect_err("wrong prefix");
        assert_eq!(err, CredentialsError::InvalidClientSecret);
    }

    #[test]
    fn should_reject_mismatched_environments() {
        let err = Credentials::client(CLIENT_ID, "client_secret$sandbox$secret")
            .expect_err("mismatched environments");
        assert_eq!(
            err,
            CredentialsError::MismatchedEnvironments {
                client_id: Environment::Development,
                client_secret: Environment::Sandbox,
            }
        );
        assert_eq!(
            err.to_string(),
            "Mismatched credential environments: client id is development, client secret is sandbox"
        );
    }

    #[test]
    fn should_reject_unknown_environment() {
        let err = Credentials::client("client_id$mars$id", "client_secret$mars$secret")
            .expect_err("unknown environment");
        assert!(matches!(err, CredentialsError::UnknownEnvironment(_)));
    }

    #[test]
    fn should_parse_access_token() {
        let credentials =
            Credentials::access_token("access_token$sandbox$merchant_42$f00b4r").expect("valid");

        assert_eq!(credentials.environment(), Environment::Sandbox);
        assert_eq!(credentials.merchant_id(), Some("merchant_42"));
        assert_eq!(credentials.client_id(), None);
    }

    #[test]
    fn should_reject_malformed_access_token() {
        let err = Credentials::access_token("access_token$sandbox$merchant_42")
            .expect_err("missing token segment");
        assert_eq!(err, CredentialsError::InvalidAccessToken);
    }

    #[test]
    fn should_build_basic_header_for_client() {
        let credentials = Credentials::client("client_id$qa$id", "client_secret$qa$pw")
            .expect("valid credentials");
        let (name, value) = credentials.to_header().expect("valid header");

        assert_eq!(name, AUTHORIZATION);
        // "client_id$qa$id:client_secret$qa$pw"
        assert_eq!(
            value,
            "Basic Y2xpZW50X2lkJHFhJGlkOmNsaWVudF9zZWNyZXQkcWEkcHc="
        );
        assert!(value.is_sensitive());
    }

    #[test]
    fn should_build_bearer_header_for_access_token() {
        let credentials =
            Credentials::access_token("access_token$qa$merchant$abc").expect("valid token");
        let (name, value) = credentials.to_header().expect("valid header");

        assert_eq!(name, AUTHORIZATION);
        assert_eq!(value, "Bearer access_token$qa$merchant$abc");
    }

    #[test]
    fn should_reject_header_with_control_characters() {
        let credentials =
            Credentials::access_token("access_token$qa$merchant$\0abc").expect("valid layout");
        let err = credentials.to_header().expect_err("null byte");
        assert!(matches!(err, CredentialsError::InvalidHeader { .. }));
    }

    #[test]
    fn should_redact_debug_output() {
        let credentials = Credentials::client(CLIENT_ID, CLIENT_SECRET).expect("valid");
        let debug = format!("{credentials:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("integration_client_secret"));

        let credentials =
            Credentials::access_token("access_token$qa$merchant$supersecret").expect("valid");
        let debug = format!("{credentials:?}");
        assert!(!debug.contains("supersecret"));
    }

    #[test]
    fn should_mask_secure_string_display() {
        assert_eq!(SecureString::from("short").to_string(), "***");
        assert_eq!(SecureString::from("12345678").to_string(), "***");
        assert_eq!(SecureString::from("123456789").to_string(), "1234...6789");
        assert_eq!(SecureString::from("héllo-wörld").to_string(), "héll...örld");
    }
}
