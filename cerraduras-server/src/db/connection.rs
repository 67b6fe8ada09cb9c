//! Connection provider
//!
//! Opens one MySQL connection per operation from the startup
//! [`DatabaseConfig`]. There is no pool: a connection lives
//! exactly as long as the operation that opened it.

use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::Connection;

use super::DbError;
use crate::config::DatabaseConfig;

/// Opens fresh connections with fixed credentials
#[derive(Clone)]
pub struct ConnectionProvider {
    options: MySqlConnectOptions,
    database: String,
}

impl ConnectionProvider {
    pub fn new(config: &DatabaseConfig) -> Self {
        Self {
            options: config.connect_options(),
            database: format!("{}@{}:{}/{}", config.user, config.host, config.port, config.name),
        }
    }

    /// Human-readable target (no password) for logs.
    pub fn target(&self) -> &str {
        &self.database
    }

    /// Open a new connection.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Connect`] if the server is unreachable or rejects
    /// the credentials. The driver error is logged here.
    pub async fn connect(&self) -> Result<MySqlConnection, DbError> {
        MySqlConnection::connect_with(&self.options)
            .await
            .map_err(|e| {
                tracing::error!(target_db = %self.database, error = %e, "failed to connect to database");
                DbError::Connect(e)
            })
    }

    /// Open a connection, run `SELECT 1`, and close it.
    pub async fn ping(&self) -> Result<(), DbError> {
        let mut conn = self.connect().await?;
        let result = sqlx::query("SELECT 1").execute(&mut conn).await;
        release(conn).await;
        result?;
        Ok(())
    }
}

/// Close a connection, logging (not propagating) close failures.
pub(crate) async fn release(conn: MySqlConnection) {
    if let Err(e) = conn.close().await {
        tracing::debug!(error = %e, "error while closing database connection");
    }
}
