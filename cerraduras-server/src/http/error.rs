//! API error types with IntoResponse
//!
//! Errors are converted to JSON responses with appropriate status codes.
//! Body shapes follow what the browser frontend reads: `{"error": ...}` for
//! 400/500 and `{"message": ...}` for 404.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::{DbError, PRODUCE_ARTICLE_PROCEDURE};
use crate::models::ValidationError;

/// Message sent when no database connection could be opened
pub const CONNECTION_FAILED: &str = "No se pudo conectar a la base de datos";

/// What a handler was doing when the store failed
///
/// Picks the generic 500 text and the 404 text for that endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListSupplies,
    GetSupply,
    CreateSupply,
    UpdateSupply,
    DeleteSupply,
    AdjustInventory,
    ListArticles,
    ProduceArticle,
    LowStockReport,
}

impl Operation {
    fn failure(self) -> &'static str {
        match self {
            Self::ListSupplies => "Error interno del servidor al obtener insumos",
            Self::GetSupply => "Error interno del servidor al obtener insumo",
            Self::CreateSupply => "Error interno del servidor al añadir insumo",
            Self::UpdateSupply => "Error interno del servidor al actualizar insumo",
            Self::DeleteSupply => "Error interno del servidor al eliminar insumo",
            Self::AdjustInventory => "Error interno del servidor al actualizar inventario",
            Self::ListArticles => "Error interno del servidor al obtener artículos",
            Self::ProduceArticle => "Error interno del servidor al producir artículo",
            Self::LowStockReport => "Error interno del servidor al obtener insumos bajo stock",
        }
    }

    fn not_found(self) -> &'static str {
        match self {
            Self::UpdateSupply => "Insumo no encontrado o sin cambios",
            Self::AdjustInventory => {
                "Insumo no encontrado después de la actualización (posiblemente ID incorrecto)"
            }
            Self::ProduceArticle | Self::ListArticles => "Artículo no encontrado",
            _ => "Insumo no encontrado",
        }
    }
}

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400)
    Validation(ValidationError),

    /// Resource not found (404)
    NotFound { message: &'static str },

    /// Database unreachable (500)
    Unavailable,

    /// Stored procedure raised an error (500, native text returned)
    Procedure {
        procedure: &'static str,
        message: String,
    },

    /// Anything else (500, logged, generic text returned)
    Internal {
        message: &'static str,
        source: String,
    },
}

impl ApiError {
    /// Map a store error for the given operation.
    pub fn from_db(operation: Operation, err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => Self::NotFound {
                message: operation.not_found(),
            },
            DbError::Connect(_) => Self::Unavailable,
            DbError::Procedure { procedure, message } => Self::Procedure { procedure, message },
            DbError::Sqlx(e) => Self::Internal {
                message: operation.failure(),
                source: e.to_string(),
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Unavailable | Self::Procedure { .. } | Self::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::Validation(e) => json!({ "error": e.to_string() }),
            Self::NotFound { message } => json!({ "message": message }),
            Self::Unavailable => json!({ "error": CONNECTION_FAILED }),
            Self::Procedure { procedure, message } => {
                tracing::warn!(procedure, %message, "stored procedure rejected request");
                json!({ "error": procedure_failure(procedure, &message) })
            }
            Self::Internal { message, source } => {
                // Log the actual error, return generic message
                tracing::error!(error = %source, "{}", message);
                json!({ "error": message })
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Client text for a stored procedure error, as the frontend displays it.
fn procedure_failure(procedure: &str, message: &str) -> String {
    if procedure == PRODUCE_ARTICLE_PROCEDURE {
        format!("Error en procedimiento almacenado de producción: {}", message)
    } else {
        format!("Error en procedimiento almacenado '{}': {}", procedure, message)
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

/// Attach the current [`Operation`] to store results.
pub trait DbResultExt<T> {
    fn during(self, operation: Operation) -> Result<T, ApiError>;
}

impl<T> DbResultExt<T> for Result<T, DbError> {
    fn during(self, operation: Operation) -> Result<T, ApiError> {
        self.map_err(|e| ApiError::from_db(operation, e))
    }
}
