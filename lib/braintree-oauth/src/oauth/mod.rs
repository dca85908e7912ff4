//! OAuth support for partner applications.
//!
//! A partner application acts on behalf of merchants. The merchant approves
//! the application on the page built by [`OAuthGateway::connect_url`] and is
//! redirected back with a one-time authorization code. The application then
//! exchanges:
//!
//! - the code for an access token and a refresh token
//!   ([`OAuthGateway::create_token_from_code`]),
//! - the refresh token for a new pair before the access token expires
//!   ([`OAuthGateway::create_token_from_refresh_token`]).
//!
//! Access tokens authenticate calls made for the merchant (see
//! [`BraintreeGateway::from_access_token`](crate::BraintreeGateway::from_access_token))
//! until they expire or are revoked with
//! [`OAuthGateway::revoke_access_token`].
//!
//! # Example
//!
//! ```rust,no_run
//! use braintree_oauth::{BraintreeGateway, GatewayResult, OAuthCredentialsRequest};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = BraintreeGateway::from_client_credentials(
//!     "client_id$sandbox$my_client",
//!     "client_secret$sandbox$my_secret",
//! )?;
//!
//! let request = OAuthCredentialsRequest::from_code("code-from-redirect").with_scope("read_write");
//! match gateway.oauth().create_token_from_code(&request).await? {
//!     GatewayResult::Success(credentials) => {
//!         println!("token expires at {}", credentials.expires_at());
//!     }
//!     GatewayResult::Failure(failure) => {
//!         println!("rejected: {}", failure.message());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod connect;
mod credentials;
mod gateway;
mod request;

pub use self::connect::ConnectUrlRequest;
pub use self::credentials::{BEARER, OAuthCredentials, OAuthResult};
#[cfg(test)]
pub(crate) use self::credentials::CredentialsEnvelope;
pub use self::gateway::OAuthGateway;
pub use self::request::{Grant, OAuthCredentialsRequest};
