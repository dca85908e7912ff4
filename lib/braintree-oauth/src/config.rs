//! Gateway configuration and builder.

use std::fmt;
use std::time::Duration;

use url::Url;

use crate::auth::{Credentials, SecureString};
use crate::environment::Environment;
use crate::error::GatewayError;

/// Default timeout for a gateway request.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Immutable gateway configuration.
///
/// Use [`GatewayConfigBuilder`] to create instances. A configuration holds
/// one set of credentials: either OAuth client credentials (for the OAuth
/// flows) or a merchant access token (for calls made on behalf of that
/// merchant).
#[derive(Clone)]
pub struct GatewayConfig {
    pub(crate) credentials: Credentials,
    pub(crate) environment: Environment,
    pub(crate) base_url: Url,
    pub(crate) merchant_id: Option<String>,
    pub(crate) timeout: Duration,
    pub(crate) http_client: reqwest::Client,
}

impl GatewayConfig {
    /// Creates a builder from OAuth client credentials.
    ///
    /// # Errors
    ///
    /// Fails if the credentials are malformed.
    pub fn client_credentials(
        client_id: impl Into<String>,
        client_secret: impl Into<SecureString>,
    ) -> Result<GatewayConfigBuilder, GatewayError> {
        let credentials = Credentials::client(client_id, client_secret)?;
        Ok(GatewayConfigBuilder::new(credentials))
    }

    /// Creates a builder from a merchant access token.
    ///
    /// # Errors
    ///
    /// Fails if the token is malformed.
    pub fn access_token(
        access_token: impl Into<SecureString>,
    ) -> Result<GatewayConfigBuilder, GatewayError> {
        let credentials = Credentials::access_token(access_token)?;
        Ok(GatewayConfigBuilder::new(credentials))
    }

    /// Returns the credentials.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns the environment.
    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Returns the gateway base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the merchant id used for merchant-scoped calls.
    pub fn merchant_id(&self) -> Option<&str> {
        self.merchant_id.as_deref()
    }

    /// Returns the request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resolves an absolute gateway path against the base URL.
    pub(crate) fn url_for(&self, path: &str) -> Result<Url, GatewayError> {
        let raw = format!("{}{path}", self.base_url.as_str().trim_end_matches('/'));
        Url::parse(&raw).map_err(|err| GatewayError::InvalidBaseUrl {
            url: raw,
            reason: err.to_string(),
        })
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("credentials", &self.credentials)
            .field("environment", &self.environment)
            .field("base_url", &self.base_url.as_str())
            .field("merchant_id", &self.merchant_id)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Builder for [`GatewayConfig`].
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use braintree_oauth::GatewayConfig;
///
/// let config = GatewayConfig::client_credentials(
///     "client_id$development$integration_client_id",
///     "client_secret$development$integration_client_secret",
/// )?
/// .with_base_url("http://127.0.0.1:3000")
/// .with_timeout(Duration::from_secs(5))
/// .build()?;
///
/// assert_eq!(config.base_url().as_str(), "http://127.0.0.1:3000/");
/// # Ok::<(), braintree_oauth::GatewayError>(())
/// ```
#[derive(Clone)]
pub struct GatewayConfigBuilder {
    credentials: Credentials,
    environment: Option<Environment>,
    base_url: Option<String>,
    merchant_id: Option<String>,
    timeout: Duration,
    http_client: Option<reqwest::Client>,
}

impl GatewayConfigBuilder {
    /// Creates a builder for the given credentials.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            environment: None,
            base_url: None,
            merchant_id: None,
            timeout: DEFAULT_TIMEOUT,
            http_client: None,
        }
    }

    /// Declares the expected environment.
    ///
    /// The environment is inferred from the credentials; setting it makes
    /// [`build`](Self::build) fail if the credentials belong elsewhere.
    #[must_use]
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Overrides the environment's default base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the merchant id for merchant-scoped calls.
    ///
    /// Access tokens already carry their merchant id.
    #[must_use]
    pub fn with_merchant_id(mut self, merchant_id: impl Into<String>) -> Self {
        self.merchant_id = Some(merchant_id.into());
        self
    }

    /// Sets the request timeout (default 60 seconds).
    ///
    /// Ignored when a custom HTTP client is provided.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Uses a preconfigured reqwest client.
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Fails if the declared environment or merchant id contradicts the
    /// credentials, if the base URL is not an absolute `http`/`https` URL,
    /// or if the HTTP client cannot be created.
    pub fn build(self) -> Result<GatewayConfig, GatewayError> {
        let Self {
            credentials,
            environment,
            base_url,
            merchant_id,
            timeout,
            http_client,
        } = self;

        let inferred = credentials.environment();
        if let Some(declared) = environment
            && declared != inferred
        {
            return Err(GatewayError::configuration(format!(
                "credentials belong to {inferred}, not {declared}"
            )));
        }

        let merchant_id = match (merchant_id, credentials.merchant_id()) {
            (Some(declared), Some(from_token)) if declared != from_token => {
                return Err(GatewayError::configuration(format!(
                    "merchant id {declared} does not match the access token merchant {from_token}"
                )));
            }
            (Some(declared), _) => Some(declared),
            (None, from_token) => from_token.map(ToString::to_string),
        };

        let raw_url = base_url.unwrap_or_else(|| inferred.base_url().to_string());
        let base_url = Url::parse(&raw_url).map_err(|err| GatewayError::InvalidBaseUrl {
            url: raw_url.clone(),
            reason: err.to_string(),
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(GatewayError::InvalidBaseUrl {
                url: raw_url,
                reason: format!("unsupported scheme '{}'", base_url.scheme()),
            });
        }

        let http_client = match http_client {
            Some(client) => client,
            None => reqwest::Client::builder().timeout(timeout).build()?,
        };

        Ok(GatewayConfig {
            credentials,
            environment: inferred,
            base_url,
            merchant_id,
            timeout,
            http_client,
        })
    }
}

impl fmt::Debug for GatewayConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfigBuilder")
            .field("credentials", &self.credentials)
            .field("environment", &self.environment)
            .field("base_url", &self.base_url)
            .field("merchant_id", &self.merchant_id)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
