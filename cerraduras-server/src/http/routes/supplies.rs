//! Supply endpoints - CRUD and inventory adjustment

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use super::MessageResponse;
use crate::http::error::{ApiError, DbResultExt, Operation};
use crate::http::extractors::{IdPath, JsonBody};
use crate::models::{
    CreateSupplyRequest, InventoryAdjustmentRequest, Supply, UpdateSupplyRequest,
};
use crate::state::AppState;

/// Created supply response
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub message: &'static str,
    pub id: i64,
}

/// Inventory adjustment response
#[derive(Debug, Serialize)]
pub struct InventoryResponse {
    pub message: &'static str,
    pub nueva_cantidad: i64,
}

/// GET /api/insumos - list all supplies
async fn list_supplies(State(state): State<AppState>) -> Result<Json<Vec<Supply>>, ApiError> {
    let supplies = state
        .store()
        .list_supplies()
        .await
        .during(Operation::ListSupplies)?;
    Ok(Json(supplies))
}

/// GET /api/insumos/{id} - get a single supply
async fn get_supply(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Json<Supply>, ApiError> {
    let supply = state
        .store()
        .get_supply(id)
        .await
        .during(Operation::GetSupply)?;
    Ok(Json(supply))
}

/// POST /api/insumos - create a supply
async fn create_supply(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateSupplyRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let supply = req.validate()?;
    let id = state
        .store()
        .create_supply(supply)
        .await
        .during(Operation::CreateSupply)?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Insumo añadido exitosamente",
            id,
        }),
    ))
}

/// PUT /api/insumos/{id} - update name and/or quantity
async fn update_supply(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    JsonBody(req): JsonBody<UpdateSupplyRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let update = req.validate()?;
    tracing::debug!(id, fields = ?update.fields(), "updating supply");

    state
        .store()
        .update_supply(id, update)
        .await
        .during(Operation::UpdateSupply)?;
    Ok(Json(MessageResponse::new("Insumo actualizado exitosamente")))
}

/// DELETE /api/insumos/{id} - delete a supply
async fn delete_supply(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .store()
        .delete_supply(id)
        .await
        .during(Operation::DeleteSupply)?;
    Ok(Json(MessageResponse::new("Insumo eliminado exitosamente")))
}

/// POST /api/insumos/inventario - apply a signed delta via stored procedure
async fn adjust_inventory(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<InventoryAdjustmentRequest>,
) -> Result<Json<InventoryResponse>, ApiError> {
    let adjustment = req.validate()?;
    let quantity = state
        .store()
        .adjust_inventory(adjustment)
        .await
        .during(Operation::AdjustInventory)?;

    tracing::info!(
        supply_id = adjustment.supply_id,
        delta = adjustment.delta,
        quantity,
        "inventory adjusted"
    );
    Ok(Json(InventoryResponse {
        message: "Inventario de insumo actualizado",
        nueva_cantidad: quantity,
    }))
}

/// Supply routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/insumos", get(list_supplies).post(create_supply))
        .route("/api/insumos/inventario", post(adjust_inventory))
        .route(
            "/api/insumos/{id}",
            get(get_supply).put(update_supply).delete(delete_supply),
        )
}
