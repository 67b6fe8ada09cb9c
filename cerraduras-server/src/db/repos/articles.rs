//! Article repository
//!
//! Articles are only read joined with their stock; production goes
//! through the stored procedure, which also consumes supplies.

use sqlx::mysql::MySqlConnection;
use sqlx::Connection;

use super::finish;
use crate::db::{DbError, PRODUCE_ARTICLE_PROCEDURE};
use crate::models::{ArticleStock, ProductionOrder};

/// Article repository
pub struct ArticleRepo<'c> {
    conn: &'c mut MySqlConnection,
}

impl<'c> ArticleRepo<'c> {
    pub fn new(conn: &'c mut MySqlConnection) -> Self {
        Self { conn }
    }

    /// Articles with available stock.
    ///
    /// Inner join: an article without a `stock_articulos` row is omitted.
    pub async fn list_with_stock(&mut self) -> Result<Vec<ArticleStock>, DbError> {
        let articles = sqlx::query_as::<_, ArticleStock>(
            r#"
            SELECT a.idArticulo, a.nombreArticulo, a.tipoArticulo, sa.cantidadDisponible
            FROM articulos a
            JOIN stock_articulos sa ON a.idArticulo = sa.idArticulo
            ORDER BY a.idArticulo
            "#,
        )
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(articles)
    }

    /// Run the production procedure, then read back the article's stock.
    ///
    /// A missing stock row after a successful call is `Ok(None)`.
    pub async fn produce(&mut self, order: ProductionOrder) -> Result<Option<i64>, DbError> {
        let mut tx = self.conn.begin().await?;
        let result = sqlx::query("CALL sp_produccion_articulos(?, ?)")
            .bind(order.article_id)
            .bind(order.quantity)
            .execute(&mut *tx)
            .await;
        finish(tx, result)
            .await
            .map_err(|e| DbError::from_procedure(PRODUCE_ARTICLE_PROCEDURE, e))?;

        let stock: Option<i64> =
            sqlx::query_scalar("SELECT cantidadDisponible FROM stock_articulos WHERE idArticulo = ?")
                .bind(order.article_id)
                .fetch_optional(&mut *self.conn)
                .await?;

        Ok(stock)
    }
}
