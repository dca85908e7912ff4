use serde::Serialize;

use crate::auth::SecureString;
use crate::error::GatewayError;

/// The authorization grant exchanged for access credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Grant {
    /// One-time code returned to the redirect URI after the merchant
    /// approved the application.
    AuthorizationCode(SecureString),
    /// Refresh token obtained with an earlier exchange.
    RefreshToken(SecureString),
}

impl Grant {
    fn grant_type(&self) -> &'static str {
        match self {
            Self::AuthorizationCode(_) => "authorization_code",
            Self::RefreshToken(_) => "refresh_token",
        }
    }
}

/// Request for [`OAuthGateway::create_token_from_code`] and
/// [`OAuthGateway::create_token_from_refresh_token`].
///
/// A request carries either an authorization code or a refresh token,
/// never both.
///
/// [`OAuthGateway::create_token_from_code`]: super::OAuthGateway::create_token_from_code
/// [`OAuthGateway::create_token_from_refresh_token`]: super::OAuthGateway::create_token_from_refresh_token
///
/// # Example
///
/// ```rust
/// use braintree_oauth::OAuthCredentialsRequest;
///
/// let request = OAuthCredentialsRequest::from_code("abc123").with_scope("read_write");
/// assert_eq!(request.scope(), Some("read_write"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthCredentialsRequest {
    grant: Grant,
    scope: Option<String>,
}

impl OAuthCredentialsRequest {
    /// Creates a request exchanging an authorization code.
    pub fn from_code(code: impl Into<SecureString>) -> Self {
        Self {
            grant: Grant::AuthorizationCode(code.into()),
            scope: None,
        }
    }

    /// Creates a request exchanging a refresh token.
    pub fn from_refresh_token(refresh_token: impl Into<SecureString>) -> Self {
        Self {
            grant: Grant::RefreshToken(refresh_token.into()),
            scope: None,
        }
    }

    /// Sets the requested scope.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Sets several scopes, sent comma separated.
    #[must_use]
    pub fn with_scopes(mut self, scopes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let scope = scopes
            .into_iter()
            .map(Into::into)
            .collect::<Vec<String>>()
            .join(",");
        self.scope = Some(scope);
        self
    }

    /// Returns the grant.
    pub fn grant(&self) -> &Grant {
        &self.grant
    }

    /// Returns the requested scope.
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    pub(crate) fn ensure_code(&self) -> Result<(), GatewayError> {
        match &self.grant {
            Grant::AuthorizationCode(code) if code.is_empty() => Err(
                GatewayError::invalid_request("authorization code must not be empty"),
            ),
            Grant::AuthorizationCode(_) => Ok(()),
            Grant::RefreshToken(_) => Err(GatewayError::invalid_request(
                "expected an authorization code, got a refresh token",
            )),
        }
    }

    pub(crate) fn ensure_refresh_token(&self) -> Result<(), GatewayError> {
        match &self.grant {
            Grant::RefreshToken(token) if token.is_empty() => Err(
                GatewayError::invalid_request("refresh token must not be empty"),
            ),
            Grant::RefreshToken(_) => Ok(()),
            Grant::AuthorizationCode(_) => Err(GatewayError::invalid_request(
                "expected a refresh token, got an authorization code",
            )),
        }
    }

    pub(crate) fn to_body(&self) -> CredentialsBody<'_> {
        let (code, refresh_token) = match &self.grant {
            Grant::AuthorizationCode(code) => (Some(code.as_str()), None),
            Grant::RefreshToken(token) => (None, Some(token.as_str())),
        };
        CredentialsBody {
            credentials: GrantBody {
                grant_type: self.grant.grant_type(),
                code,
                refresh_token,
                scope: self.scope.as_deref(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CredentialsBody<'a> {
    credentials: GrantBody<'a>,
}

#[derive(Debug, Serialize)]
struct GrantBody<'a> {
    grant_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    refresh_token: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scope: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RevokeBody<'a> {
    pub(crate) token: &'a str,
}
