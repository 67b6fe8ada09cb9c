//! Database layer - connection provider, repositories and the store seam
//!
//! # Design Principles
//!
//! - One connection per operation, opened and closed by the store
//! - Every value is a bound parameter, including partial updates
//! - Mutations run in a transaction that is either committed or rolled back
//! - Business rules stay in the stored procedures; errors they SIGNAL are
//!   reported verbatim

pub mod connection;
#[cfg(test)]
pub mod memory;
pub mod mysql;
pub mod repos;
pub mod rows;
pub mod store;

pub use connection::ConnectionProvider;
pub use mysql::MySqlStore;
pub use store::InventoryStore;

use sqlx::mysql::MySqlDatabaseError;

/// Stored procedure applying a signed delta to a supply
pub const ADJUST_INVENTORY_PROCEDURE: &str = "sp_inventario_insumos";

/// Stored procedure producing articles from supplies
pub const PRODUCE_ARTICLE_PROCEDURE: &str = "sp_produccion_articulos";

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("could not connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("stored procedure '{procedure}' failed: {message}")]
    Procedure {
        procedure: &'static str,
        message: String,
    },

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },
}

impl DbError {
    pub(crate) fn not_found(resource: &'static str, id: i64) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    /// Classify an error raised while calling a stored procedure.
    ///
    /// Server-side errors (including `SIGNAL SQLSTATE`) keep their native
    /// text as `<errno> (<sqlstate>): <message>`; transport errors stay
    /// generic.
    pub(crate) fn from_procedure(procedure: &'static str, err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let message = match db_err.try_downcast_ref::<MySqlDatabaseError>() {
                    Some(mysql) => format!(
                        "{} ({}): {}",
                        mysql.number(),
                        mysql.code().unwrap_or("HY000"),
                        mysql.message()
                    ),
                    None => db_err.message().to_owned(),
                };
                Self::Procedure { procedure, message }
            }
            other => Self::Sqlx(other),
        }
    }
}
