//! Application state shared across handlers

use std::sync::Arc;

use crate::db::InventoryStore;

/// Shared application state
///
/// Holds no connection: the store opens one per operation.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn InventoryStore>,
}

impl AppState {
    pub fn new<S>(store: S) -> Self
    where
        S: InventoryStore + 'static,
    {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn from_shared(store: Arc<dyn InventoryStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn InventoryStore {
        self.store.as_ref()
    }
}
