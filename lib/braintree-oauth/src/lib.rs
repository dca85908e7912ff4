//! # Braintree OAuth
//!
//! OAuth token exchange and revocation for partner applications of the
//! Braintree payment gateway.
//!
//! - **[`BraintreeGateway`]** - Entry point, configured with OAuth client
//!   credentials or with a merchant access token
//! - **[`OAuthGateway`]** - Code and refresh token exchange, revocation,
//!   connect URL
//! - **[`GatewayResult`]** - Outcome of a call that reached the gateway
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use braintree_oauth::{BraintreeGateway, CustomerRequest, OAuthCredentialsRequest};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = BraintreeGateway::from_client_credentials(
//!     "client_id$sandbox$my_client",
//!     "client_secret$sandbox$my_secret",
//! )?;
//!
//! // Exchange the code received on the redirect URI
//! let request = OAuthCredentialsRequest::from_code("code-from-redirect");
//! let credentials = gateway
//!     .oauth()
//!     .create_token_from_code(&request)
//!     .await?
//!     .into_result()?;
//!
//! // Act on behalf of the merchant
//! let merchant = BraintreeGateway::from_access_token(credentials.access_token())?;
//! let customer = merchant
//!     .customer()
//!     .create(&CustomerRequest::new().with_first_name("Ada"))
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Two outcome channels
//!
//! Operations return `Result<GatewayResult<T>, GatewayError>`:
//!
//! - a **business failure** (unknown authorization code, invalid email) is an
//!   `Ok(GatewayResult::Failure(..))`, with field-level
//!   [`ValidationErrors`]
//! - everything else is an `Err(GatewayError)`: malformed requests and
//!   configuration, rejected credentials (a revoked token gives
//!   [`GatewayError::Authentication`]), transport and server failures
//!
//! ```rust,no_run
//! use braintree_oauth::{BraintreeGateway, GatewayResult, OAuthCredentialsRequest, ValidationErrorCode};
//!
//! # async fn example(gateway: BraintreeGateway) -> Result<(), braintree_oauth::GatewayError> {
//! let request = OAuthCredentialsRequest::from_code("bad_code");
//! if let GatewayResult::Failure(failure) = gateway.oauth().create_token_from_code(&request).await? {
//!     let on_code = failure.errors().for_object("Credentials").on_field("Code");
//!     assert_eq!(
//!         on_code.first().map(|error| error.code()),
//!         Some(&ValidationErrorCode::OAuthInvalidGrant)
//!     );
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Logging
//!
//! Requests and responses are traced with [`tracing`] at `debug` level,
//! rejected credentials at `warn` level. Secrets never appear in logs or in
//! `Debug` output.

mod auth;
mod config;
mod customer;
mod environment;
mod error;
mod gateway;
mod http;
pub mod oauth;
mod result;
mod validation;

pub use self::auth::{Credentials, CredentialsError, SecureString};
pub use self::config::{GatewayConfig, GatewayConfigBuilder};
pub use self::customer::{Customer, CustomerGateway, CustomerRequest};
pub use self::environment::{Environment, UnknownEnvironment};
pub use self::error::GatewayError;
pub use self::gateway::BraintreeGateway;
pub use self::oauth::{
    ConnectUrlRequest, Grant, OAuthCredentials, OAuthCredentialsRequest, OAuthGateway,
    OAuthResult,
};
pub use self::result::{ErrorResponse, GatewayResult};
pub use self::validation::{ValidationError, ValidationErrorCode, ValidationErrors};
