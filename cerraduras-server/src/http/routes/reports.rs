//! Report endpoints - read-only views

use axum::{extract::State, routing::get, Json, Router};

use crate::http::error::{ApiError, DbResultExt, Operation};
use crate::models::ReportRow;
use crate::state::AppState;

/// GET /api/reportes/insumos_bajo_stock
async fn low_stock_supplies(
    State(state): State<AppState>,
) -> Result<Json<Vec<ReportRow>>, ApiError> {
    let rows = state
        .store()
        .low_stock_supplies()
        .await
        .during(Operation::LowStockReport)?;
    Ok(Json(rows))
}

/// Report routes
pub fn router() -> Router<AppState> {
    Router::new().route("/api/reportes/insumos_bajo_stock", get(low_stock_supplies))
}
