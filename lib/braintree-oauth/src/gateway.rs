use crate::auth::SecureString;
use crate::config::GatewayConfig;
use crate::customer::CustomerGateway;
use crate::error::GatewayError;
use crate::http::Http;
use crate::oauth::OAuthGateway;

/// Entry point to the gateway.
///
/// Cloning is cheap: clones share the configuration and the connection
/// pool. A gateway holds no mutable state and can be used from several
/// tasks at once.
///
/// # Example
///
/// ```rust
/// use braintree_oauth::{BraintreeGateway, Environment};
///
/// let gateway = BraintreeGateway::from_access_token("access_token$sandbox$merchant_42$abcdef")?;
/// assert_eq!(gateway.config().environment(), Environment::Sandbox);
/// assert_eq!(gateway.config().merchant_id(), Some("merchant_42"));
/// # Ok::<(), braintree_oauth::GatewayError>(())
/// ```
#[derive(Debug, Clone)]
pub struct BraintreeGateway {
    http: Http,
}

impl BraintreeGateway {
    /// Creates a gateway from a configuration.
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            http: Http::new(config),
        }
    }

    /// Creates a gateway for OAuth flows, with the default settings of the
    /// credentials' environment.
    ///
    /// # Errors
    ///
    /// Fails if the credentials are malformed.
    pub fn from_client_credentials(
        client_id: impl Into<String>,
        client_secret: impl Into<SecureString>,
    ) -> Result<Self, GatewayError> {
        let config = GatewayConfig::client_credentials(client_id, client_secret)?.build()?;
        Ok(Self::new(config))
    }

    /// Creates a gateway acting for the merchant that granted the token.
    ///
    /// # Errors
    ///
    /// Fails if the token is malformed.
    pub fn from_access_token(access_token: impl Into<SecureString>) -> Result<Self, GatewayError> {
        let config = GatewayConfig::access_token(access_token)?.build()?;
        Ok(Self::new(config))
    }

    /// Returns the configuration.
    pub fn config(&self) -> &GatewayConfig {
        self.http.config()
    }

    /// Returns the OAuth operations.
    pub fn oauth(&self) -> OAuthGateway<'_> {
        OAuthGateway::new(&self.http)
    }

    /// Returns the customer operations.
    pub fn customer(&self) -> CustomerGateway<'_> {
        CustomerGateway::new(&self.http)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::Environment;

    #[test]
    fn test_gateway_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<BraintreeGateway>();
    }

    #[test]
    fn should_create_from_client_credentials() {
        let gateway = BraintreeGateway::from_client_credentials(
            "client_id$qa$client",
            "client_secret$qa$secret",
        )
        .expect("valid credentials");

        assert_eq!(gateway.config().environment(), Environment::Qa);
        assert_eq!(gateway.config().credentials().client_id(), Some("client_id$qa$client"));
    }

    #[test]
    fn should_reject_malformed_access_token() {
        let err = BraintreeGateway::from_access_token("not-a-token").expect_err("malformed");
        assert!(matches!(err, GatewayError::Credentials(_)));
    }

    #[test]
    fn should_share_config_between_clones() {
        let gateway = BraintreeGateway::from_access_token("access_token$sandbox$merchant_42$abc")
            .expect("valid token");
        let clone = gateway.clone();

        assert!(std::ptr::eq(gateway.config(), clone.config()));
    }
}
