//! MySQL-backed [`InventoryStore`]
//!
//! Every method opens its own connection, hands it to a repository, and
//! closes it before returning, whatever the outcome.

use async_trait::async_trait;

use super::connection::{release, ConnectionProvider};
use super::repos::{ArticleRepo, ReportRepo, SupplyRepo};
use super::{DbError, InventoryStore};
use crate::config::DatabaseConfig;
use crate::models::{
    ArticleStock, InventoryAdjustment, NewSupply, ProductionOrder, ReportRow, Supply,
    SupplyUpdate,
};

/// Store that talks to MySQL through a [`ConnectionProvider`]
#[derive(Clone)]
pub struct MySqlStore {
    provider: ConnectionProvider,
}

impl MySqlStore {
    pub fn new(config: &DatabaseConfig) -> Self {
        Self {
            provider: ConnectionProvider::new(config),
        }
    }

    pub fn provider(&self) -> &ConnectionProvider {
        &self.provider
    }
}

#[async_trait]
impl InventoryStore for MySqlStore {
    async fn ping(&self) -> Result<(), DbError> {
        self.provider.ping().await
    }

    async fn list_supplies(&self) -> Result<Vec<Supply>, DbError> {
        let mut conn = self.provider.connect().await?;
        let result = SupplyRepo::new(&mut conn).list().await;
        release(conn).await;
        result
    }

    async fn get_supply(&self, id: i64) -> Result<Supply, DbError> {
        let mut conn = self.provider.connect().await?;
        let result = SupplyRepo::new(&mut conn).get(id).await;
        release(conn).await;
        result
    }

    async fn create_supply(&self, supply: NewSupply) -> Result<i64, DbError> {
        let mut conn = self.provider.connect().await?;
        let result = SupplyRepo::new(&mut conn).create(&supply).await;
        release(conn).await;
        if let Ok(id) = &result {
            tracing::debug!(id, name = %supply.name, "supply created");
        }
        result
    }

    async fn update_supply(&self, id: i64, update: SupplyUpdate) -> Result<(), DbError> {
        let mut conn = self.provider.connect().await?;
        let result = SupplyRepo::new(&mut conn).update(id, &update).await;
        release(conn).await;
        result
    }

    async fn delete_supply(&self, id: i64) -> Result<(), DbError> {
        let mut conn = self.provider.connect().await?;
        let result = SupplyRepo::new(&mut conn).delete(id).await;
        release(conn).await;
        result
    }

    async fn adjust_inventory(&self, adjustment: InventoryAdjustment) -> Result<i64, DbError> {
        let mut conn = self.provider.connect().await?;
        let result = SupplyRepo::new(&mut conn).adjust(adjustment).await;
        release(conn).await;
        result
    }

    async fn list_articles(&self) -> Result<Vec<ArticleStock>, DbError> {
        let mut conn = self.provider.connect().await?;
        let result = ArticleRepo::new(&mut conn).list_with_stock().await;
        release(conn).await;
        result
    }

    async fn produce_article(&self, order: ProductionOrder) -> Result<Option<i64>, DbError> {
        let mut conn = self.provider.connect().await?;
        let result = ArticleRepo::new(&mut conn).produce(order).await;
        release(conn).await;
        result
    }

    async fn low_stock_supplies(&self) -> Result<Vec<ReportRow>, DbError> {
        let mut conn = self.provider.connect().await?;
        let result = ReportRepo::new(&mut conn).low_stock_supplies().await;
        release(conn).await;
        result
    }
}
