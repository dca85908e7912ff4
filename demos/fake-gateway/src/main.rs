#![allow(missing_docs)]
use anyhow::{Context, Result};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tracing::{info, warn};

use fake_gateway::{RefreshRotation, RevocationReplay, ServerConfig, run};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().pretty().init();

    let AppArgs { host, port, config } = AppArgs::parse().context("parsing arguments")?;
    let addr = SocketAddr::from((host, port));
    run(addr, config).await?;

    info!("Bye!");
    Ok(())
}

#[derive(Debug)]
struct AppArgs {
    host: IpAddr,
    port: u16,
    config: ServerConfig,
}

impl AppArgs {
    fn parse() -> Result<Self> {
        let mut pargs = pico_args::Arguments::from_env();

        let host = pargs
            .opt_value_from_str(["-h", "--host"])
            .context("parsing host argument")?;

        let port = pargs
            .opt_value_from_str(["-p", "--port"])
            .context("parsing port argument")?;

        let client_id = pargs
            .opt_value_from_str::<_, String>("--client-id")
            .context("parsing client id argument")?;

        let client_secret = pargs
            .opt_value_from_str::<_, String>("--client-secret")
            .context("parsing client secret argument")?;

        let refresh_rotation = pargs
            .opt_value_from_str::<_, RefreshRotation>("--refresh-rotation")
            .context("parsing refresh rotation argument")?;

        let revocation_replay = pargs
            .opt_value_from_str::<_, RevocationReplay>("--revocation-replay")
            .context("parsing revocation replay argument")?;

        let mut config = ServerConfig::default();
        if let Some(client_id) = client_id {
            config.client_id = client_id;
        }
        if let Some(client_secret) = client_secret {
            config.client_secret = client_secret;
        }
        if let Some(refresh_rotation) = refresh_rotation {
            config.refresh_rotation = refresh_rotation;
        }
        if let Some(revocation_replay) = revocation_replay {
            config.revocation_replay = revocation_replay;
        }

        let result = Self {
            host: host.unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST)),
            port: port.unwrap_or(3000),
            config,
        };

        let remaining = pargs.finish();
        if !remaining.is_empty() {
            warn!(?remaining, "Warning: unused arguments left");
        }
        Ok(result)
    }
}
