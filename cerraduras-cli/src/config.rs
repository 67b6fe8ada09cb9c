//! Environment loading for the CLI
//!
//! Credentials come from the process environment, optionally seeded from a
//! `.env` file in the working directory (or an explicit path). Variables
//! already set in the environment win over the file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cerraduras_server::DatabaseConfig;

/// Load `.env` from `path`, or from the current directory when `None`.
///
/// Runs before tracing is initialized so `RUST_LOG` from the file applies;
/// returns the file that was loaded for the caller to log. A missing default
/// `.env` is not an error; a missing explicit file is.
pub fn load_dotenv(path: Option<&Path>) -> Result<Option<PathBuf>> {
    match path {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("Failed to load env file {}", path.display()))?;
            Ok(Some(path.to_path_buf()))
        }
        None => match dotenvy::dotenv() {
            Ok(path) => Ok(Some(path)),
            Err(e) if e.not_found() => Ok(None),
            Err(e) => Err(e).context("Failed to parse .env file"),
        },
    }
}

/// Database credentials from `DB_HOST`, `DB_USER`, `DB_PASSWORD`, `DB_NAME`.
pub fn database_config() -> Result<DatabaseConfig> {
    DatabaseConfig::from_env()
        .context("Database credentials not set. Define DB_HOST, DB_USER, DB_PASSWORD and DB_NAME (environment or .env)")
}
