#![allow(missing_docs)]
//! An in-memory authorization server speaking the Braintree OAuth wire
//! format.
//!
//! Grants are created through `/oauth_testing/grants`, exchanged through
//! `/oauth/access_tokens` and revoked through `/oauth/revoke_access_token`.
//! `/merchants/{merchant_id}/customers` accepts live access tokens only.
use std::net::SocketAddr;

use anyhow::Context;
use tower_http::trace::TraceLayer;
use tracing::info;

mod config;
mod errors;
mod extractors;
mod routes;
mod state;
mod store;

pub use self::config::{RefreshRotation, RevocationReplay, ServerConfig, UnknownPolicy};
pub use self::routes::app_router;
pub use self::state::AppState;

/// Launch the server
///
/// # Errors
///
/// fail if the socket cannot be created (e.g. port already used)
/// fail if the server cannot be launch
pub async fn run(addr: SocketAddr, config: ServerConfig) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("opening {addr}"))?;
    info!("Using address {addr}");

    launch(listener, config).await
}

/// Launch the server
///
/// # Errors
///
/// fail if the server cannot be launch
pub async fn launch(
    listener: tokio::net::TcpListener,
    config: ServerConfig,
) -> anyhow::Result<()> {
    info!(?config, "starting fake gateway");
    let state = AppState::new(config);
    let app = app_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    axum::serve(listener, app.into_make_service())
        .await
        .context("starting server")?;

    Ok(())
}
