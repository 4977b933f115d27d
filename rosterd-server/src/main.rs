//! rosterd - user roster HTTP service
//!
//! Resolves database credentials (Vault, environment, local default),
//! opens a bounded Postgres pool, and serves the health probe and users
//! endpoints.

use anyhow::{anyhow, Result};
use clap::Parser;
use rosterd_core::AppConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "rosterd",
    version,
    about = "HTTP API serving a user roster over Postgres"
)]
struct Cli {
    /// Address to bind to (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides PORT)
    #[arg(long, short = 'p')]
    port: Option<u16>,

    /// Enable debug logging (unless RUST_LOG is set)
    #[arg(long, short = 'd')]
    debug: bool,
}

fn init_tracing(debug: bool) -> Result<()> {
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(debug)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.debug)?;

    let mut config = AppConfig::from_env();
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    rosterd_server::run_server(config).await?;
    Ok(())
}
