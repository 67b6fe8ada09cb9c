//! Repository implementations for database access
//!
//! Each repository borrows a single connection for its lifetime and
//! follows these patterns:
//! - Explicit column lists, no `SELECT *` against base tables
//! - Mutations go through [`finish`] so exactly one of commit or rollback runs
//! - Zero affected rows is reported as `DbError::NotFound`

pub mod articles;
pub mod reports;
pub mod supplies;

pub use articles::ArticleRepo;
pub use reports::ReportRepo;
pub use supplies::SupplyRepo;

use sqlx::{MySql, Transaction};

/// Commit on success, roll back on failure.
pub(crate) async fn finish<T>(
    tx: Transaction<'_, MySql>,
    result: Result<T, sqlx::Error>,
) -> Result<T, sqlx::Error> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback) = tx.rollback().await {
                tracing::warn!(error = %rollback, "rollback failed");
            }
            Err(e)
        }
    }
}
