//! The inventory store seam
//!
//! Route handlers only see [`InventoryStore`]. The production
//! implementation is [`MySqlStore`](super::MySqlStore); tests use an
//! in-memory store.

use async_trait::async_trait;

use super::DbError;
use crate::models::{
    ArticleStock, InventoryAdjustment, NewSupply, ProductionOrder, ReportRow, Supply,
    SupplyUpdate,
};

/// Every database operation the API performs
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Check that the database accepts connections.
    async fn ping(&self) -> Result<(), DbError>;

    async fn list_supplies(&self) -> Result<Vec<Supply>, DbError>;

    async fn get_supply(&self, id: i64) -> Result<Supply, DbError>;

    /// Returns the generated id.
    async fn create_supply(&self, supply: NewSupply) -> Result<i64, DbError>;

    /// `NotFound` when no row was affected.
    async fn update_supply(&self, id: i64, update: SupplyUpdate) -> Result<(), DbError>;

    async fn delete_supply(&self, id: i64) -> Result<(), DbError>;

    /// Returns the supply's quantity after the adjustment procedure.
    async fn adjust_inventory(&self, adjustment: InventoryAdjustment) -> Result<i64, DbError>;

    async fn list_articles(&self) -> Result<Vec<ArticleStock>, DbError>;

    /// Returns the article's stock after production, if it has a stock row.
    async fn produce_article(&self, order: ProductionOrder) -> Result<Option<i64>, DbError>;

    async fn low_stock_supplies(&self) -> Result<Vec<ReportRow>, DbError>;
}
