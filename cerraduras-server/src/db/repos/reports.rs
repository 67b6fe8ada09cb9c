//! Report repository - read-only views

use sqlx::mysql::MySqlConnection;

use crate::db::rows::row_to_json;
use crate::db::DbError;
use crate::models::ReportRow;

/// Report repository
pub struct ReportRepo<'c> {
    conn: &'c mut MySqlConnection,
}

impl<'c> ReportRepo<'c> {
    pub fn new(conn: &'c mut MySqlConnection) -> Self {
        Self { conn }
    }

    /// Every row of `v_insumos_bajo_stock`, columns as the view defines them.
    pub async fn low_stock_supplies(&mut self) -> Result<Vec<ReportRow>, DbError> {
        let rows = sqlx::query("SELECT * FROM v_insumos_bajo_stock")
            .fetch_all(&mut *self.conn)
            .await?;

        let report = rows
            .iter()
            .map(row_to_json)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(report)
    }
}
