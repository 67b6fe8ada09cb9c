//! cerraduras CLI - locks factory inventory API
//!
//! Entry point for the HTTP API:
//! - `serve`: run the JSON API (supplies, articles, production, reports)
//! - `check-db`: verify the configured MySQL credentials

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{debug, info};

mod commands;
mod config;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "cerraduras",
    author,
    version,
    about = "HTTP API for the locks factory: supplies, articles, production and stock reports"
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Load environment variables from this file instead of ./.env
    #[arg(long, global = true, value_name = "PATH")]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Open and close a database connection to verify credentials
    CheckDb(commands::check_db::CheckDbArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let env_file = config::load_dotenv(cli.env_file.as_deref())?;
    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug })?;

    match env_file {
        Some(path) => info!("Loaded configuration from {}", path.display()),
        None => debug!("No .env file found, using environment variables only"),
    }

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await,
        Commands::CheckDb(args) => commands::run_check_db(args).await,
    }
}
