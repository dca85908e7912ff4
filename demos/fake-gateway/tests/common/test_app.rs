#![allow(clippy::missing_errors_doc, dead_code, missing_docs)]
use std::net::SocketAddr;

use anyhow::Context;
use braintree_oauth::{BraintreeGateway, GatewayConfig};
use serde_json::json;
use tokio::task::JoinHandle;
use tracing::info;

use fake_gateway::{ServerConfig, launch};

/// A running fake gateway and a client gateway pointing at it.
#[derive(Debug, derive_more::Deref)]
pub struct TestApp {
    #[deref]
    gateway: BraintreeGateway,
    config: ServerConfig,
    addr: SocketAddr,
    server: JoinHandle<()>,
}

impl TestApp {
    pub async fn start(config: ServerConfig) -> anyhow::Result<Self> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("binding test listener")?;
        let addr = listener.local_addr().context("reading local address")?;

        let server_config = config.clone();
        let server = tokio::spawn(async move {
            if let Err(error) = launch(listener, server_config).await {
                tracing::error!(?error, "fake gateway stopped");
            }
        });
        info!(%addr, "fake gateway launched");

        let gateway = BraintreeGateway::new(
            GatewayConfig::client_credentials(&config.client_id, config.client_secret.as_str())?
                .with_base_url(format!("http://{addr}"))
                .build()?,
        );

        Ok(Self {
            gateway,
            config,
            addr,
            server,
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// A gateway acting for the merchant that owns `access_token`.
    pub fn merchant_gateway(&self, access_token: &str) -> anyhow::Result<BraintreeGateway> {
        let config = GatewayConfig::access_token(access_token)?
            .with_base_url(self.base_url())
            .build()?;
        Ok(BraintreeGateway::new(config))
    }

    /// A gateway using other client credentials against the same server.
    pub fn client_gateway(
        &self,
        client_id: &str,
        client_secret: &str,
    ) -> anyhow::Result<BraintreeGateway> {
        let config = GatewayConfig::client_credentials(client_id, client_secret)?
            .with_base_url(self.base_url())
            .build()?;
        Ok(BraintreeGateway::new(config))
    }

    /// Creates an authorization code, as a merchant approving the application would.
    pub async fn create_grant(&self, merchant_id: &str, scope: &str) -> anyhow::Result<String> {
        let response = reqwest::Client::new()
            .post(format!("{}/oauth_testing/grants", self.base_url()))
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .json(&json!({
                "merchant_public_id": merchant_id,
                "scope": scope,
            }))
            .send()
            .await
            .context("creating grant")?
            .error_for_status()
            .context("grant rejected")?;

        let body = response
            .json::<serde_json::Value>()
            .await
            .context("reading grant")?;
        body.pointer("/grant/code")
            .and_then(serde_json::Value::as_str)
            .map(ToString::to_string)
            .context("missing grant code")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.server.abort();
    }
}
