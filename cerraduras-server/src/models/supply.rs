//! Supplies (insumos): rows, request payloads and the update builder

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::validation::{non_empty_string, optional_integer};
use super::ValidationError;

/// Supply row from `insumos`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
pub struct Supply {
    pub id_insumo: i64,
    pub nombre_insumo: String,
    pub cantidad_insumo: i64,
}

/// Validated payload for a new supply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSupply {
    pub name: String,
    pub quantity: i64,
}

/// Columns of `insumos` a client may change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupplyField {
    Name,
    Quantity,
}

impl SupplyField {
    /// Column name in `insumos`.
    pub fn column(self) -> &'static str {
        match self {
            Self::Name => "nombreInsumo",
            Self::Quantity => "cantidadInsumo",
        }
    }
}

/// Partial update of a supply.
///
/// Only fields that were set end up in the statement, always in
/// declaration order of [`SupplyField`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupplyUpdate {
    name: Option<String>,
    quantity: Option<i64>,
}

impl SupplyUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn new_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn new_quantity(&self) -> Option<i64> {
        self.quantity
    }

    /// Fields this update touches.
    pub fn fields(&self) -> Vec<SupplyField> {
        let mut fields = Vec::with_capacity(2);
        if self.name.is_some() {
            fields.push(SupplyField::Name);
        }
        if self.quantity.is_some() {
            fields.push(SupplyField::Quantity);
        }
        fields
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.quantity.is_none()
    }

    /// Apply the update to an in-memory row. Returns whether any value changed.
    pub fn apply_to(&self, supply: &mut Supply) -> bool {
        let mut changed = false;
        if let Some(name) = &self.name {
            changed |= supply.nombre_insumo != *name;
            supply.nombre_insumo = name.clone();
        }
        if let Some(quantity) = self.quantity {
            changed |= supply.cantidad_insumo != quantity;
            supply.cantidad_insumo = quantity;
        }
        changed
    }
}

/// POST /api/insumos body
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSupplyRequest {
    #[serde(default)]
    pub nombre_insumo: Option<Value>,
    #[serde(default)]
    pub cantidad_insumo: Option<Value>,
}

impl CreateSupplyRequest {
    /// Name must be a non-empty string and quantity must be present (zero is fine).
    pub fn validate(&self) -> Result<NewSupply, ValidationError> {
        let name = non_empty_string(self.nombre_insumo.as_ref());
        let quantity = optional_integer("cantidadInsumo", self.cantidad_insumo.as_ref())?;

        match (name, quantity) {
            (Some(name), Some(quantity)) => Ok(NewSupply { name, quantity }),
            _ => Err(ValidationError::SupplyFieldsRequired),
        }
    }
}

/// PUT /api/insumos/{id} body
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSupplyRequest {
    #[serde(default)]
    pub nombre_insumo: Option<Value>,
    #[serde(default)]
    pub cantidad_insumo: Option<Value>,
}

impl UpdateSupplyRequest {
    /// An empty name is ignored, a null quantity is ignored; something must remain.
    pub fn validate(&self) -> Result<SupplyUpdate, ValidationError> {
        let mut update = SupplyUpdate::new();

        if let Some(name) = non_empty_string(self.nombre_insumo.as_ref()) {
            update = update.name(name);
        }
        if let Some(quantity) = optional_integer("cantidadInsumo", self.cantidad_insumo.as_ref())? {
            update = update.quantity(quantity);
        }

        if update.is_empty() {
            return Err(ValidationError::NothingToUpdate);
        }
        Ok(update)
    }
}

/// Validated inventory adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InventoryAdjustment {
    pub supply_id: i64,
    /// Signed change: positive adds stock, negative removes it
    pub delta: i64,
}

/// POST /api/insumos/inventario body
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryAdjustmentRequest {
    #[serde(default)]
    pub id_insumo: Option<Value>,
    #[serde(default)]
    pub cantidad_cambiar: Option<Value>,
}

impl InventoryAdjustmentRequest {
    pub fn validate(&self) -> Result<InventoryAdjustment, ValidationError> {
        let supply_id = optional_integer("idInsumo", self.id_insumo.as_ref())?;
        let delta = optional_integer("cantidadCambiar", self.cantidad_cambiar.as_ref())?;

        match (supply_id, delta) {
            (Some(supply_id), Some(delta)) => Ok(InventoryAdjustment { supply_id, delta }),
            _ => Err(ValidationError::Required {
                fields: &["idInsumo", "cantidadCambiar"],
            }),
        }
    }
}
