//! OAuth response types.

use std::fmt;

use jiff::Timestamp;
use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer};

use crate::auth::{Credentials, CredentialsError, SecureString};

/// Token type issued by the gateway.
pub const BEARER: &str = "bearer";

/// Access credentials issued by a successful token exchange.
///
/// Only the gateway creates these; they are read-only. Token values are
/// zeroed on drop and redacted from `Debug` output.
///
/// Every exchange answers with a refresh token and a `bearer` token type. A
/// success body missing either does not decode, and the call fails with
/// [`GatewayError::UnexpectedResponse`](crate::GatewayError::UnexpectedResponse).
#[derive(Clone, Deserialize)]
pub struct OAuthCredentials {
    access_token: SecureString,
    refresh_token: SecureString,
    expires_at: Timestamp,
    #[serde(deserialize_with = "bearer_token_type")]
    token_type: String,
    #[serde(default)]
    scope: Option<String>,
}

impl OAuthCredentials {
    /// Returns the access token.
    pub fn access_token(&self) -> &str {
        self.access_token.as_str()
    }

    /// Returns the refresh token.
    pub fn refresh_token(&self) -> &str {
        self.refresh_token.as_str()
    }

    /// Returns when the access token expires.
    pub fn expires_at(&self) -> Timestamp {
        self.expires_at
    }

    /// Returns the token type, always [`BEARER`] up to ASCII case.
    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// Returns the scope granted to the token.
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// Returns `true` if the token has expired at the given instant.
    pub fn is_expired_at(&self, instant: Timestamp) -> bool {
        instant >= self.expires_at
    }

    /// Returns `true` if the token has expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Timestamp::now())
    }

    /// Turns the access token into credentials for merchant calls.
    ///
    /// # Errors
    ///
    /// Fails if the access token does not have the gateway layout.
    pub fn to_credentials(&self) -> Result<Credentials, CredentialsError> {
        Credentials::access_token(self.access_token.clone())
    }
}

impl fmt::Debug for OAuthCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthCredentials")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .field("token_type", &self.token_type)
            .field("scope", &self.scope)
            .finish()
    }
}

fn bearer_token_type<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let token_type = String::deserialize(deserializer)?;
    if !token_type.eq_ignore_ascii_case(BEARER) {
        return Err(de::Error::invalid_value(
            Unexpected::Str(&token_type),
            &BEARER,
        ));
    }
    Ok(token_type)
}

/// Outcome of a token revocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct OAuthResult {
    success: bool,
}

impl OAuthResult {
    /// Returns `true` if the token was revoked by this call.
    pub fn result(&self) -> bool {
        self.success
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CredentialsEnvelope {
    pub(crate) credentials: OAuthCredentials,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RevokeEnvelope {
    pub(crate) result: OAuthResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    const CREDENTIALS: &str = r#"{"credentials": {
        "access_token": "access_token$development$integration_merchant_id$4bff9793ed",
        "refresh_token": "refresh_token$development$integration_merchant_id$d1e0c1b7f5",
        "expires_at": "2026-10-17T12:00:00Z",
        "token_type": "bearer",
        "scope": "read_write"
    }}"#;

    fn credentials() -> OAuthCredentials {
        serde_json::from_str::<CredentialsEnvelope>(CREDENTIALS)
            .expect("valid credentials")
            .credentials
    }

    #[test]
    fn should_decode_credentials() {
        let credentials = credentials();

        assert_eq!(
            credentials.access_token(),
            "access_token$development$integration_merchant_id$4bff9793ed"
        );
        assert_eq!(
            credentials.refresh_token(),
            "refresh_token$development$integration_merchant_id$d1e0c1b7f5"
        );
        assert_eq!(credentials.token_type(), "bearer");
        assert_eq!(credentials.scope(), Some("read_write"));
        assert_eq!(
            credentials.expires_at(),
            "2026-10-17T12:00:00Z".parse::<Timestamp>().expect("valid timestamp")
        );
    }

    #[test]
    fn should_accept_uppercase_bearer() {
        let body = CREDENTIALS.replace(r#""bearer""#, r#""Bearer""#);
        let envelope = serde_json::from_str::<CredentialsEnvelope>(&body).expect("bearer");
        assert_eq!(envelope.credentials.token_type(), "Bearer");
    }

    #[test]
    fn should_reject_other_token_type() {
        let body = CREDENTIALS.replace(r#""bearer""#, r#""mac""#);
        let err = serde_json::from_str::<CredentialsEnvelope>(&body).expect_err("mac token");
        assert!(err.to_string().contains("mac"));
    }

    #[test]
    fn should_require_refresh_token() {
        let body = r#"{"credentials": {
            "access_token": "access_token$development$integration_merchant_id$4bff9793ed",
            "expires_at": "2026-10-17T12:00:00Z",
            "token_type": "bearer"
        }}"#;
        let err = serde_json::from_str::<CredentialsEnvelope>(body).expect_err("no refresh token");
        assert!(err.to_string().contains("refresh_token"));
    }

    #[test]
    fn should_detect_expiry() {
        let credentials = credentials();
        let before = "2026-10-17T11:59:59Z".parse::<Timestamp>().expect("valid");
        let after = "2026-10-17T12:00:00Z".parse::<Timestamp>().expect("valid");

        assert!(!credentials.is_expired_at(before));
        assert!(credentials.is_expired_at(after));
    }

    #[test]
    fn should_convert_to_access_token_credentials() {
        let credentials = credentials().to_credentials().expect("valid token");
        assert_eq!(credentials.merchant_id(), Some("integration_merchant_id"));
    }

    #[test]
    fn should_redact_debug_output() {
        let debug = format!("{:?}", credentials());
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("4bff9793ed"));
        assert!(!debug.contains("d1e0c1b7f5"));
    }

    #[test]
    fn should_decode_revocation_result() {
        let envelope = serde_json::from_str::<RevokeEnvelope>(r#"{"result": {"success": true}}"#)
            .expect("valid result");
        assert!(envelope.result.result());
    }
}
