//! Database connectivity check
//!
//! Opens one connection with the configured credentials, runs `SELECT 1`
//! and closes it. Exit status tells whether the database is reachable.

use anyhow::{Context, Result};
use clap::Parser;

use cerraduras_server::db::ConnectionProvider;

use crate::config::database_config;

/// Arguments for the check-db command
#[derive(Parser, Debug)]
pub struct CheckDbArgs {}

pub async fn run_check_db(_args: CheckDbArgs) -> Result<()> {
    let database = database_config()?;
    let provider = ConnectionProvider::new(&database);

    println!("Probando conexión a la base de datos {}...", provider.target());
    provider.ping().await.context(
        "¡Falló la conexión a la base de datos! Revisa tus credenciales en .env y si MySQL está corriendo.",
    )?;
    println!("Conexión exitosa a la base de datos!");
    println!("Conexión cerrada.");

    Ok(())
}
