//! Axum server setup
//!
//! Server skeleton with:
//! - Permissive CORS by default (the frontend is served from another origin)
//! - Tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use axum::http::HeaderValue;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::routes;
use crate::config::ServerConfig;
use crate::state::AppState;

/// Build the application router with all routes.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let cors = if config.cors_permissive {
        CorsLayer::permissive()
    } else {
        // Localhost only
        CorsLayer::new()
            .allow_origin([
                HeaderValue::from_static("http://localhost:5000"),
                HeaderValue::from_static("http://127.0.0.1:5000"),
                HeaderValue::from_static("http://localhost:5500"),
                HeaderValue::from_static("http://127.0.0.1:5500"),
            ])
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .merge(routes::home::router())
        .merge(routes::health::router())
        .merge(routes::supplies::router())
        .merge(routes::articles::router())
        .merge(routes::reports::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the HTTP server until a shutdown signal arrives.
///
/// # Example
///
/// ```ignore
/// let store = MySqlStore::new(&DatabaseConfig::from_env()?);
/// run_server(AppState::new(store), ServerConfig::default()).await?;
/// ```
pub async fn run_server(state: AppState, config: ServerConfig) -> Result<(), ServerError> {
    if config.cors_permissive {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
    }
    let app = build_router(state, &config);

    // Bind listener
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on http://{}", config.bind_addr);

    // Run with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;
    use crate::http::routes::home::BANNER;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(store: Arc<MemoryStore>) -> Router {
        build_router(AppState::from_shared(store), &ServerConfig::default())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn send_json(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn delete(uri: &str) -> Request<Body> {
        Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_home_banner() {
        let response = app(Arc::new(MemoryStore::new()))
            .oneshot(get("/"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(std::str::from_utf8(&bytes).unwrap(), BANNER);
    }

    #[tokio::test]
    async fn test_supply_scenario() {
        let app = app(Arc::new(MemoryStore::new()));

        // Create
        let response = app
            .clone()
            .oneshot(send_json(
                "POST",
                "/api/insumos",
                json!({"nombreInsumo": "Tornillo", "cantidadInsumo": 100}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["message"], "Insumo añadido exitosamente");
        let id = body["id"].as_i64().unwrap();

        // Read back
        let response = app
            .clone()
            .oneshot(get(&format!("/api/insumos/{}", id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["nombreInsumo"], "Tornillo");
        assert_eq!(body["cantidadInsumo"], 100);

        // Adjust by -20
        let response = app
            .clone()
            .oneshot(send_json(
                "POST",
                "/api/insumos/inventario",
                json!({"idInsumo": id, "cantidadCambiar": -20}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["nueva_cantidad"], 80);

        // Delete
        let response = app
            .clone()
            .oneshot(delete(&format!("/api/insumos/{}", id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Gone
        let response = app
            .clone()
            .oneshot(get(&format!("/api/insumos/{}", id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["message"], "Insumo no encontrado");
    }

    #[tokio::test]
    async fn test_list_supplies_empty_is_ok() {
        let response = app(Arc::new(MemoryStore::new()))
            .oneshot(get("/api/insumos"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!([]));
    }

    #[tokio::test]
    async fn test_create_requires_fields() {
        let store = Arc::new(MemoryStore::new());
        let app = app(store.clone());

        for body in [
            json!({"cantidadInsumo": 5}),
            json!({"nombreInsumo": "", "cantidadInsumo": 5}),
            json!({"nombreInsumo": "Llave"}),
        ] {
            let response = app
                .clone()
                .oneshot(send_json("POST", "/api/insumos", body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(
                json_body(response).await["error"],
                "Nombre y cantidad del insumo son requeridos"
            );
        }
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_create_with_zero_quantity() {
        let response = app(Arc::new(MemoryStore::new()))
            .oneshot(send_json(
                "POST",
                "/api/insumos",
                json!({"nombreInsumo": "Pasador", "cantidadInsumo": 0}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_update_quantity_keeps_name() {
        let store = Arc::new(MemoryStore::new().with_supply("Tornillo", 100));
        let app = app(store.clone());

        let response = app
            .clone()
            .oneshot(send_json("PUT", "/api/insumos/1", json!({"cantidadInsumo": 0})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await["message"],
            "Insumo actualizado exitosamente"
        );

        let body = json_body(app.clone().oneshot(get("/api/insumos/1")).await.unwrap()).await;
        assert_eq!(body["nombreInsumo"], "Tornillo");
        assert_eq!(body["cantidadInsumo"], 0);
    }

    #[tokio::test]
    async fn test_update_name_keeps_quantity() {
        let app = app(Arc::new(MemoryStore::new().with_supply("Tornillo", 100)));

        let response = app
            .clone()
            .oneshot(send_json("PUT", "/api/insumos/1", json!({"nombreInsumo": "Perno"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(app.clone().oneshot(get("/api/insumos/1")).await.unwrap()).await;
        assert_eq!(body["nombreInsumo"], "Perno");
        assert_eq!(body["cantidadInsumo"], 100);
    }

    #[tokio::test]
    async fn test_update_without_fields_is_400() {
        let store = Arc::new(MemoryStore::new().with_supply("Tornillo", 100));
        let response = app(store.clone())
            .oneshot(send_json("PUT", "/api/insumos/1", json!({})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_update_with_current_values_is_404() {
        let store = Arc::new(MemoryStore::new().with_supply("Tornillo", 100));
        let response = app(store.clone())
            .oneshot(send_json(
                "PUT",
                "/api/insumos/1",
                json!({"nombreInsumo": "Tornillo", "cantidadInsumo": 100}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            json_body(response).await["message"],
            "Insumo no encontrado o sin cambios"
        );
        assert_eq!(store.supply_quantity(1), Some(100));
    }

    #[tokio::test]
    async fn test_update_unknown_is_404() {
        let response = app(Arc::new(MemoryStore::new()))
            .oneshot(send_json("PUT", "/api/insumos/99", json!({"cantidadInsumo": 3})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            json_body(response).await["message"],
            "Insumo no encontrado o sin cambios"
        );
    }

    #[tokio::test]
    async fn test_delete_unknown_is_404() {
        let response = app(Arc::new(MemoryStore::new()))
            .oneshot(delete("/api/insumos/12345"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_400() {
        let response = app(Arc::new(MemoryStore::new()))
            .oneshot(get("/api/insumos/abc"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_json_is_400() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/insumos")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app(Arc::new(MemoryStore::new()))
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_adjust_requires_fields() {
        let response = app(Arc::new(MemoryStore::new().with_supply("Tornillo", 100)))
            .oneshot(send_json("POST", "/api/insumos/inventario", json!({"idInsumo": 1})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["error"],
            "idInsumo y cantidadCambiar son requeridos"
        );
    }

    #[tokio::test]
    async fn test_adjust_adds_delta() {
        let store = Arc::new(MemoryStore::new().with_supply("Resorte", 40));
        let response = app(store.clone())
            .oneshot(send_json(
                "POST",
                "/api/insumos/inventario",
                json!({"idInsumo": 1, "cantidadCambiar": 15}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["nueva_cantidad"], 55);
        assert_eq!(body["message"], "Inventario de insumo actualizado");
        assert_eq!(store.supply_quantity(1), Some(55));
    }

    #[tokio::test]
    async fn test_adjust_procedure_error_is_500_with_native_text() {
        let store = Arc::new(MemoryStore::new().with_supply("Resorte", 5));
        let response = app(store.clone())
            .oneshot(send_json(
                "POST",
                "/api/insumos/inventario",
                json!({"idInsumo": 1, "cantidadCambiar": -6}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let error = json_body(response).await["error"].as_str().unwrap().to_owned();
        assert!(error.starts_with("Error en procedimiento almacenado 'sp_inventario_insumos'"));
        assert!(error.contains("Stock insuficiente"));
        assert_eq!(store.supply_quantity(1), Some(5));
    }

    #[tokio::test]
    async fn test_adjust_unknown_supply_is_404() {
        let response = app(Arc::new(MemoryStore::new()))
            .oneshot(send_json(
                "POST",
                "/api/insumos/inventario",
                json!({"idInsumo": 77, "cantidadCambiar": 1}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_articles_inner_join() {
        let store = MemoryStore::new()
            .with_article(1, "Cerradura de pomo", "pomo", Some(12), &[])
            .with_article(2, "Candado", "candado", None, &[]);
        let response = app(Arc::new(store)).oneshot(get("/api/articulos")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!([{
                "idArticulo": 1,
                "nombreArticulo": "Cerradura de pomo",
                "tipoArticulo": "pomo",
                "cantidadDisponible": 12
            }])
        );
    }

    #[tokio::test]
    async fn test_produce_rejects_bad_quantity_before_store() {
        let store = Arc::new(MemoryStore::new().with_article(1, "Candado", "candado", Some(0), &[]));
        let app = app(store.clone());

        for qty in [json!(0), json!(-1), json!(1.5), json!("3")] {
            let response = app
                .clone()
                .oneshot(send_json(
                    "POST",
                    "/api/articulos/producir",
                    json!({"idArticulo": 1, "cantidadProducir": qty}),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(
                json_body(response).await["error"],
                "cantidadProducir debe ser un número entero positivo"
            );
        }
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_produce_consumes_supplies() {
        let store = Arc::new(
            MemoryStore::new()
                .with_supply("Tornillo", 100)
                .with_article(1, "Cerradura", "embutir", Some(3), &[(1, 4)]),
        );
        let response = app(store.clone())
            .oneshot(send_json(
                "POST",
                "/api/articulos/producir",
                json!({"idArticulo": 1, "cantidadProducir": 5}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(
            body["message"],
            "Producción de 5 unidades del artículo 1 completada."
        );
        assert_eq!(body["nuevo_stock_articulo"], 8);
        assert_eq!(store.supply_quantity(1), Some(80));
    }

    #[tokio::test]
    async fn test_produce_without_stock_row_omits_stock() {
        let store = Arc::new(MemoryStore::new().with_article(4, "Candado", "candado", None, &[]));
        let response = app(store)
            .oneshot(send_json(
                "POST",
                "/api/articulos/producir",
                json!({"idArticulo": 4, "cantidadProducir": 1}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert!(body.get("nuevo_stock_articulo").is_none());
    }

    #[tokio::test]
    async fn test_produce_insufficient_supplies_is_500() {
        let store = Arc::new(
            MemoryStore::new()
                .with_supply("Tornillo", 3)
                .with_article(1, "Cerradura", "embutir", Some(0), &[(1, 4)]),
        );
        let response = app(store.clone())
            .oneshot(send_json(
                "POST",
                "/api/articulos/producir",
                json!({"idArticulo": 1, "cantidadProducir": 1}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let error = json_body(response).await["error"].as_str().unwrap().to_owned();
        assert!(error.starts_with("Error en procedimiento almacenado de producción:"));
        assert_eq!(store.supply_quantity(1), Some(3));
    }

    #[tokio::test]
    async fn test_low_stock_report() {
        let store = MemoryStore::new()
            .with_supply("Tornillo", 100)
            .with_supply("Resorte", 2);
        let response = app(Arc::new(store))
            .oneshot(get("/api/reportes/insumos_bajo_stock"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["nombreInsumo"], "Resorte");
    }

    #[tokio::test]
    async fn test_unreachable_database_is_500() {
        let app = app(Arc::new(MemoryStore::offline()));

        for uri in ["/api/insumos", "/api/articulos", "/api/reportes/insumos_bajo_stock"] {
            let response = app.clone().oneshot(get(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(
                json_body(response).await["error"],
                "No se pudo conectar a la base de datos"
            );
        }
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let request = Request::builder()
            .uri("/api/insumos")
            .header("origin", "http://example.com")
            .body(Body::empty())
            .unwrap();
        let response = app(Arc::new(MemoryStore::new()))
            .oneshot(request)
            .await
            .unwrap();

        assert!(response
            .headers()
            .contains_key("access-control-allow-origin"));
    }
}
