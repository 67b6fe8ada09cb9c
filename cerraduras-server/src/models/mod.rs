//! Domain models with validation at construction
//!
//! Request bodies are deserialized loosely and validated before any
//! database work. Invalid input returns ValidationError, not panic.

pub mod article;
pub mod supply;
pub mod validation;

pub use article::{ArticleStock, ProductionOrder, ProductionRequest};
pub use supply::{
    CreateSupplyRequest, InventoryAdjustment, InventoryAdjustmentRequest, NewSupply, Supply,
    SupplyField, SupplyUpdate, UpdateSupplyRequest,
};
pub use validation::ValidationError;

/// One row of a database view, keyed by column name
pub type ReportRow = serde_json::Map<String, serde_json::Value>;
