//! Article endpoints - stock listing and production

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::http::error::{ApiError, DbResultExt, Operation};
use crate::http::extractors::JsonBody;
use crate::models::{ArticleStock, ProductionRequest};
use crate::state::AppState;

/// Production response
#[derive(Debug, Serialize)]
pub struct ProductionResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nuevo_stock_articulo: Option<i64>,
}

/// GET /api/articulos - articles with available stock
async fn list_articles(
    State(state): State<AppState>,
) -> Result<Json<Vec<ArticleStock>>, ApiError> {
    let articles = state
        .store()
        .list_articles()
        .await
        .during(Operation::ListArticles)?;
    Ok(Json(articles))
}

/// POST /api/articulos/producir - run the production procedure
///
/// Quantity is validated before the store is touched.
async fn produce_article(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ProductionRequest>,
) -> Result<Json<ProductionResponse>, ApiError> {
    let order = req.validate()?;
    let stock = state
        .store()
        .produce_article(order)
        .await
        .during(Operation::ProduceArticle)?;

    tracing::info!(
        article_id = order.article_id,
        quantity = order.quantity,
        stock = ?stock,
        "production completed"
    );
    Ok(Json(ProductionResponse {
        message: order.confirmation(),
        nuevo_stock_articulo: stock,
    }))
}

/// Article routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/articulos", get(list_articles))
        .route("/api/articulos/producir", post(produce_article))
}
