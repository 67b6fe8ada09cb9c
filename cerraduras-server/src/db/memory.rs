//! In-memory [`InventoryStore`] for router tests
//!
//! Mirrors the observable behaviour of the MySQL schema: generated ids,
//! unknown or unchanged rows as not found, and the two procedures rejecting
//! changes that would leave a quantity negative.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{DbError, InventoryStore, ADJUST_INVENTORY_PROCEDURE, PRODUCE_ARTICLE_PROCEDURE};
use crate::models::{
    ArticleStock, InventoryAdjustment, NewSupply, ProductionOrder, ReportRow, Supply,
    SupplyUpdate,
};

#[derive(Debug, Clone)]
struct Article {
    name: String,
    kind: String,
    /// Supplies consumed per produced unit
    recipe: Vec<(i64, i64)>,
}

#[derive(Default)]
struct State {
    supplies: BTreeMap<i64, Supply>,
    articles: BTreeMap<i64, Article>,
    stock: BTreeMap<i64, i64>,
    next_supply_id: i64,
    calls: usize,
}

/// Test store; `offline()` simulates an unreachable database.
pub struct MemoryStore {
    state: Mutex<State>,
    offline: bool,
    low_stock_threshold: i64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                next_supply_id: 1,
                ..State::default()
            }),
            offline: false,
            low_stock_threshold: 10,
        }
    }

    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::new()
        }
    }

    pub fn with_supply(self, name: &str, quantity: i64) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let id = state.next_supply_id;
            state.next_supply_id += 1;
            state.supplies.insert(
                id,
                Supply {
                    id_insumo: id,
                    nombre_insumo: name.to_owned(),
                    cantidad_insumo: quantity,
                },
            );
        }
        self
    }

    /// Register an article. `stock: None` leaves it without a stock row.
    pub fn with_article(
        self,
        id: i64,
        name: &str,
        kind: &str,
        stock: Option<i64>,
        recipe: &[(i64, i64)],
    ) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.articles.insert(
                id,
                Article {
                    name: name.to_owned(),
                    kind: kind.to_owned(),
                    recipe: recipe.to_vec(),
                },
            );
            if let Some(stock) = stock {
                state.stock.insert(id, stock);
            }
        }
        self
    }

    /// Number of operations that reached the "database".
    pub fn calls(&self) -> usize {
        self.state.lock().unwrap().calls
    }

    pub fn supply_quantity(&self, id: i64) -> Option<i64> {
        self.state
            .lock()
            .unwrap()
            .supplies
            .get(&id)
            .map(|s| s.cantidad_insumo)
    }

    fn open(&self) -> Result<std::sync::MutexGuard<'_, State>, DbError> {
        if self.offline {
            return Err(DbError::Connect(sqlx::Error::PoolTimedOut));
        }
        let mut state = self.state.lock().unwrap();
        state.calls += 1;
        Ok(state)
    }
}

fn signal(procedure: &'static str, message: &str) -> DbError {
    DbError::Procedure {
        procedure,
        message: format!("1644 (45000): {}", message),
    }
}

#[async_trait]
impl InventoryStore for MemoryStore {
    async fn ping(&self) -> Result<(), DbError> {
        self.open().map(|_| ())
    }

    async fn list_supplies(&self) -> Result<Vec<Supply>, DbError> {
        Ok(self.open()?.supplies.values().cloned().collect())
    }

    async fn get_supply(&self, id: i64) -> Result<Supply, DbError> {
        self.open()?
            .supplies
            .get(&id)
            .cloned()
            .ok_or_else(|| DbError::not_found("insumo", id))
    }

    async fn create_supply(&self, supply: NewSupply) -> Result<i64, DbError> {
        let mut state = self.open()?;
        let id = state.next_supply_id;
        state.next_supply_id += 1;
        state.supplies.insert(
            id,
            Supply {
                id_insumo: id,
                nombre_insumo: supply.name,
                cantidad_insumo: supply.quantity,
            },
        );
        Ok(id)
    }

    async fn update_supply(&self, id: i64, update: SupplyUpdate) -> Result<(), DbError> {
        let mut state = self.open()?;
        let supply = state
            .supplies
            .get_mut(&id)
            .ok_or_else(|| DbError::not_found("insumo", id))?;
        if !update.apply_to(supply) {
            return Err(DbError::not_found("insumo", id));
        }
        Ok(())
    }

    async fn delete_supply(&self, id: i64) -> Result<(), DbError> {
        self.open()?
            .supplies
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DbError::not_found("insumo", id))
    }

    async fn adjust_inventory(&self, adjustment: InventoryAdjustment) -> Result<i64, DbError> {
        let mut state = self.open()?;
        let supply = state
            .supplies
            .get_mut(&adjustment.supply_id)
            .ok_or_else(|| DbError::not_found("insumo", adjustment.supply_id))?;

        let next = supply.cantidad_insumo + adjustment.delta;
        if next < 0 {
            return Err(signal(ADJUST_INVENTORY_PROCEDURE, "Stock insuficiente"));
        }
        supply.cantidad_insumo = next;
        Ok(next)
    }

    async fn list_articles(&self) -> Result<Vec<ArticleStock>, DbError> {
        let state = self.open()?;
        Ok(state
            .articles
            .iter()
            .filter_map(|(id, article)| {
                state.stock.get(id).map(|stock| ArticleStock {
                    id_articulo: *id,
                    nombre_articulo: article.name.clone(),
                    tipo_articulo: article.kind.clone(),
                    cantidad_disponible: *stock,
                })
            })
            .collect())
    }

    async fn produce_article(&self, order: ProductionOrder) -> Result<Option<i64>, DbError> {
        let mut state = self.open()?;
        let article = state
            .articles
            .get(&order.article_id)
            .cloned()
            .ok_or_else(|| signal(PRODUCE_ARTICLE_PROCEDURE, "El artículo no existe"))?;

        // all-or-nothing, like the procedure's transaction
        for (supply_id, per_unit) in &article.recipe {
            let available = state
                .supplies
                .get(supply_id)
                .map(|s| s.cantidad_insumo)
                .unwrap_or(0);
            if available < per_unit * order.quantity {
                return Err(signal(
                    PRODUCE_ARTICLE_PROCEDURE,
                    "Insumos insuficientes para la producción",
                ));
            }
        }
        for (supply_id, per_unit) in &article.recipe {
            if let Some(supply) = state.supplies.get_mut(supply_id) {
                supply.cantidad_insumo -= per_unit * order.quantity;
            }
        }

        Ok(state.stock.get_mut(&order.article_id).map(|stock| {
            *stock += order.quantity;
            *stock
        }))
    }

    async fn low_stock_supplies(&self) -> Result<Vec<ReportRow>, DbError> {
        let state = self.open()?;
        Ok(state
            .supplies
            .values()
            .filter(|s| s.cantidad_insumo < self.low_stock_threshold)
            .map(|s| match serde_json::to_value(s) {
                Ok(serde_json::Value::Object(row)) => row,
                _ => ReportRow::new(),
            })
            .collect())
    }
}
