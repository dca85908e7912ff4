//! Authentication of incoming calls.

use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use base64::Engine;
use tracing::debug;

use crate::config::ServerConfig;
use crate::errors::ApiError;
use crate::store::TokenStore;

/// A call authenticated with the application client credentials (Basic).
#[derive(Debug, Clone, Copy)]
pub(crate) struct ClientAuth;

/// A call authenticated with a live access token (Bearer).
#[derive(Debug, Clone)]
pub(crate) struct MerchantAuth {
    pub(crate) merchant_id: String,
}

fn authorization<'a>(parts: &'a Parts, scheme: &str) -> Option<&'a str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(scheme))
}

impl<S> FromRequestParts<S> for ClientAuth
where
    Arc<ServerConfig>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = Arc::<ServerConfig>::from_ref(state);

        let decoded = authorization(parts, "Basic ")
            .and_then(|encoded| {
                base64::engine::general_purpose::STANDARD
                    .decode(encoded)
                    .ok()
            })
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .ok_or(ApiError::Unauthenticated)?;

        match decoded.split_once(':') {
            Some((client_id, client_secret)) if config.accepts(client_id, client_secret) => {
                Ok(Self)
            }
            _ => {
                debug!("rejecting client credentials");
                Err(ApiError::Unauthenticated)
            }
        }
    }
}

impl<S> FromRequestParts<S> for MerchantAuth
where
    TokenStore: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let store = TokenStore::from_ref(state);
        let token = authorization(parts, "Bearer ").ok_or(ApiError::Unauthenticated)?;
        let merchant_id = store.authenticate(token).await?;

        Ok(Self { merchant_id })
    }
}
