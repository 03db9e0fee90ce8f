//! Implementation of the `user-cache serve` command.

use anyhow::Result;
use clap::Args;

use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::http;

/// Arguments for `user-cache serve`.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Interface to bind (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Keep users in memory instead of SQLite
    #[arg(long)]
    pub ephemeral: bool,
}

/// Apply command-line overrides on top of the loaded configuration.
pub fn apply_overrides(args: &ServeArgs, mut config: Config) -> Result<Config> {
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    ConfigLoader::validate(&config)?;
    Ok(config)
}

/// Run the HTTP server until ctrl-c.
pub async fn execute(args: ServeArgs, config: Config) -> Result<()> {
    let config = apply_overrides(&args, config)?;
    http::serve(&config, args.ephemeral).await
}
