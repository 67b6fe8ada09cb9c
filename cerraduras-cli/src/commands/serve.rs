//! HTTP server command
//!
//! Runs the API with all routes. Credentials are read once here and
//! passed down; handlers never look at the environment.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;

use cerraduras_server::ServerConfig;

use crate::config::database_config;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "CERRADURAS_BIND", default_value = "127.0.0.1:5000")]
    pub bind: SocketAddr,

    /// Restrict CORS to localhost origins instead of allowing any origin
    #[arg(long)]
    pub cors_localhost_only: bool,
}

/// Run the HTTP server (blocks until shutdown)
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let database = database_config()?;

    tracing::info!("Starting cerraduras API on {}", args.bind);

    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: !args.cors_localhost_only,
    };

    cerraduras_server::serve(database, config)
        .await
        .context("Server error")?;

    Ok(())
}
