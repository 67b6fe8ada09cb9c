//! cerraduras-server: HTTP API for the locks factory
//!
//! Exposes supplies (insumos), articles with stock, the inventory and
//! production stored procedures, and the low-stock report over JSON.
//! Each request opens its own MySQL connection.

pub mod config;
pub mod db;
pub mod http;
pub mod models;
pub mod state;

pub use config::{ConfigError, DatabaseConfig, ServerConfig};
pub use db::{DbError, InventoryStore, MySqlStore};
pub use http::{build_router, run_server, ServerError};
pub use state::AppState;

/// Start the HTTP server against MySQL with the given credentials.
pub async fn serve(database: DatabaseConfig, server: ServerConfig) -> Result<(), ServerError> {
    let store = MySqlStore::new(&database);
    tracing::info!(database = %store.provider().target(), "using per-request MySQL connections");

    run_server(AppState::new(store), server).await
}
