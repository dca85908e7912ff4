use tracing::debug;
use url::Url;

use super::connect::ConnectUrlRequest;
use super::credentials::{CredentialsEnvelope, OAuthCredentials, OAuthResult, RevokeEnvelope};
use super::request::{OAuthCredentialsRequest, RevokeBody};
use crate::auth::Credentials;
use crate::error::GatewayError;
use crate::http::Http;
use crate::result::GatewayResult;

const ACCESS_TOKENS_PATH: &str = "/oauth/access_tokens";
const REVOKE_ACCESS_TOKEN_PATH: &str = "/oauth/revoke_access_token";
const CONNECT_PATH: &str = "/oauth/connect";

/// OAuth flows of a partner application.
///
/// Obtained from [`BraintreeGateway::oauth`](crate::BraintreeGateway::oauth).
/// Every operation authenticates with the application client credentials;
/// a gateway configured with an access token fails with
/// [`GatewayError::Configuration`].
#[derive(Debug, Clone, Copy)]
pub struct OAuthGateway<'a> {
    http: &'a Http,
}

impl<'a> OAuthGateway<'a> {
    pub(crate) fn new(http: &'a Http) -> Self {
        Self { http }
    }

    /// Exchanges an authorization code for access credentials.
    ///
    /// # Errors
    ///
    /// An unknown or expired code is not an error: it comes back as a
    /// [`GatewayResult::Failure`] with an `OAuthInvalidGrant` error on
    /// `Credentials.Code`. Errors are reserved for requests without a
    /// code, gateways without client credentials, rejected client
    /// credentials and transport failures.
    pub async fn create_token_from_code(
        &self,
        request: &OAuthCredentialsRequest,
    ) -> Result<GatewayResult<OAuthCredentials>, GatewayError> {
        self.ensure_client_credentials()?;
        request.ensure_code()?;
        debug!(scope = ?request.scope(), "exchanging authorization code");
        self.exchange(request).await
    }

    /// Exchanges a refresh token for a new pair of access credentials.
    ///
    /// # Errors
    ///
    /// Same as [`create_token_from_code`](Self::create_token_from_code),
    /// with a refresh token instead of a code.
    pub async fn create_token_from_refresh_token(
        &self,
        request: &OAuthCredentialsRequest,
    ) -> Result<GatewayResult<OAuthCredentials>, GatewayError> {
        self.ensure_client_credentials()?;
        request.ensure_refresh_token()?;
        debug!(scope = ?request.scope(), "exchanging refresh token");
        self.exchange(request).await
    }

    /// Revokes an access token.
    ///
    /// Once revoked, any call authenticated with the token fails with
    /// [`GatewayError::Authentication`].
    ///
    /// # Errors
    ///
    /// Fails on an empty token, a gateway without client credentials,
    /// rejected client credentials and transport failures.
    pub async fn revoke_access_token(
        &self,
        access_token: &str,
    ) -> Result<GatewayResult<OAuthResult>, GatewayError> {
        self.ensure_client_credentials()?;
        if access_token.is_empty() {
            return Err(GatewayError::invalid_request(
                "access token must not be empty",
            ));
        }

        debug!("revoking access token");
        let result = self
            .http
            .post::<_, RevokeEnvelope>(
                REVOKE_ACCESS_TOKEN_PATH,
                &RevokeBody {
                    token: access_token,
                },
            )
            .await?;
        Ok(result.map(|envelope| envelope.result))
    }

    /// Builds the URL a merchant opens to grant the application access.
    ///
    /// No request is sent.
    ///
    /// # Errors
    ///
    /// Fails if the gateway is not configured with client credentials.
    pub fn connect_url(&self, request: &ConnectUrlRequest) -> Result<Url, GatewayError> {
        let client_id = self.ensure_client_credentials()?;
        let mut url = self.http.config().url_for(CONNECT_PATH)?;
        request.apply(client_id, &mut url);
        Ok(url)
    }

    async fn exchange(
        &self,
        request: &OAuthCredentialsRequest,
    ) -> Result<GatewayResult<OAuthCredentials>, GatewayError> {
        let result = self
            .http
            .post::<_, CredentialsEnvelope>(ACCESS_TOKENS_PATH, &request.to_body())
            .await?;
        Ok(result.map(|envelope| envelope.credentials))
    }

    fn ensure_client_credentials(&self) -> Result<&'a str, GatewayError> {
        match &self.http.config().credentials {
            Credentials::Client { client_id, .. } => Ok(client_id.as_str()),
            Credentials::AccessToken { .. } => Err(GatewayError::configuration(
                "OAuth operations require client credentials",
            )),
        }
    }
}
