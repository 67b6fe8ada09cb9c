//! Supply repository
//!
//! CRUD over `insumos` plus the inventory-adjustment procedure:
//! - update: statement built from [`SupplyUpdate`], values always bound,
//!   unchanged rows excluded
//! - adjust: CALL, commit, then re-read the quantity

use sqlx::mysql::MySqlConnection;
use sqlx::query_builder::Separated;
use sqlx::{Connection, MySql, QueryBuilder};

use super::finish;
use crate::db::{DbError, ADJUST_INVENTORY_PROCEDURE};
use crate::models::{InventoryAdjustment, NewSupply, Supply, SupplyField, SupplyUpdate};

const RESOURCE: &str = "insumo";

/// Build `UPDATE insumos SET ... WHERE idInsumo = ? AND NOT (...)` for the
/// fields present in `update`. Returns `None` when there is nothing to set.
///
/// The connection reports matched rows, not changed rows, so the statement
/// only matches a row whose supplied columns differ from the new values.
pub fn update_statement(id: i64, update: &SupplyUpdate) -> Option<QueryBuilder<'static, MySql>> {
    let fields = update.fields();
    if fields.is_empty() {
        return None;
    }

    let mut qb = QueryBuilder::new("UPDATE insumos SET ");
    {
        let mut set = qb.separated(", ");
        for &field in &fields {
            set.push(field.column()).push_unseparated(" = ");
            bind_field(&mut set, field, update);
        }
    }
    qb.push(" WHERE idInsumo = ").push_bind(id);
    qb.push(" AND NOT (");
    {
        let mut unchanged = qb.separated(" AND ");
        for &field in &fields {
            unchanged.push(field.column()).push_unseparated(" <=> ");
            bind_field(&mut unchanged, field, update);
        }
    }
    qb.push(")");
    Some(qb)
}

fn bind_field<'qb, 'args: 'qb>(
    builder: &mut Separated<'qb, 'args, MySql, &'static str>,
    field: SupplyField,
    update: &SupplyUpdate,
) {
    match field {
        SupplyField::Name => {
            builder.push_bind_unseparated(update.new_name().unwrap_or_default().to_owned());
        }
        SupplyField::Quantity => {
            builder.push_bind_unseparated(update.new_quantity().unwrap_or_default());
        }
    }
}

/// Supply repository
pub struct SupplyRepo<'c> {
    conn: &'c mut MySqlConnection,
}

impl<'c> SupplyRepo<'c> {
    pub fn new(conn: &'c mut MySqlConnection) -> Self {
        Self { conn }
    }

    /// All supplies ordered by id.
    pub async fn list(&mut self) -> Result<Vec<Supply>, DbError> {
        let supplies = sqlx::query_as::<_, Supply>(
            "SELECT idInsumo, nombreInsumo, cantidadInsumo FROM insumos ORDER BY idInsumo",
        )
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(supplies)
    }

    pub async fn get(&mut self, id: i64) -> Result<Supply, DbError> {
        sqlx::query_as::<_, Supply>(
            "SELECT idInsumo, nombreInsumo, cantidadInsumo FROM insumos WHERE idInsumo = ?",
        )
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await?
        .ok_or_else(|| DbError::not_found(RESOURCE, id))
    }

    /// Insert a supply and return its generated id.
    pub async fn create(&mut self, supply: &NewSupply) -> Result<i64, DbError> {
        let mut tx = self.conn.begin().await?;
        let result = sqlx::query("INSERT INTO insumos (nombreInsumo, cantidadInsumo) VALUES (?, ?)")
            .bind(&supply.name)
            .bind(supply.quantity)
            .execute(&mut *tx)
            .await;
        let done = finish(tx, result).await?;

        Ok(done.last_insert_id() as i64)
    }

    /// Apply a partial update. Zero affected rows means the id is unknown
    /// or every supplied value equals the stored one; both are not found.
    pub async fn update(&mut self, id: i64, update: &SupplyUpdate) -> Result<(), DbError> {
        let Some(mut statement) = update_statement(id, update) else {
            return Ok(());
        };

        let mut tx = self.conn.begin().await?;
        let result = statement.build().execute(&mut *tx).await;
        let done = finish(tx, result).await?;

        if done.rows_affected() == 0 {
            return Err(DbError::not_found(RESOURCE, id));
        }
        Ok(())
    }

    pub async fn delete(&mut self, id: i64) -> Result<(), DbError> {
        let mut tx = self.conn.begin().await?;
        let result = sqlx::query("DELETE FROM insumos WHERE idInsumo = ?")
            .bind(id)
            .execute(&mut *tx)
            .await;
        let done = finish(tx, result).await?;

        if done.rows_affected() == 0 {
            return Err(DbError::not_found(RESOURCE, id));
        }
        Ok(())
    }

    /// Run the adjustment procedure and return the resulting quantity.
    pub async fn adjust(&mut self, adjustment: InventoryAdjustment) -> Result<i64, DbError> {
        let mut tx = self.conn.begin().await?;
        let result = sqlx::query("CALL sp_inventario_insumos(?, ?)")
            .bind(adjustment.supply_id)
            .bind(adjustment.delta)
            .execute(&mut *tx)
            .await;
        finish(tx, result)
            .await
            .map_err(|e| DbError::from_procedure(ADJUST_INVENTORY_PROCEDURE, e))?;

        let quantity: Option<i64> =
            sqlx::query_scalar("SELECT cantidadInsumo FROM insumos WHERE idInsumo = ?")
                .bind(adjustment.supply_id)
                .fetch_optional(&mut *self.conn)
                .await?;

        quantity.ok_or_else(|| DbError::not_found(RESOURCE, adjustment.supply_id))
    }
}
