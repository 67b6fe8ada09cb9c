//! Articles and production orders

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::validation::optional_integer;
use super::ValidationError;

/// Article joined with its `stock_articulos` row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
pub struct ArticleStock {
    pub id_articulo: i64,
    pub nombre_articulo: String,
    pub tipo_articulo: String,
    pub cantidad_disponible: i64,
}

/// Validated production order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductionOrder {
    pub article_id: i64,
    /// Always greater than zero
    pub quantity: i64,
}

/// POST /api/articulos/producir body
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionRequest {
    #[serde(default)]
    pub id_articulo: Option<Value>,
    #[serde(default)]
    pub cantidad_producir: Option<Value>,
}

impl ProductionRequest {
    pub fn validate(&self) -> Result<ProductionOrder, ValidationError> {
        let missing = |value: &Option<Value>| matches!(value, None | Some(Value::Null));
        if missing(&self.id_articulo) || missing(&self.cantidad_producir) {
            return Err(ValidationError::Required {
                fields: &["idArticulo", "cantidadProducir"],
            });
        }

        let quantity = match optional_integer("cantidadProducir", self.cantidad_producir.as_ref()) {
            Ok(Some(q)) if q > 0 => q,
            _ => {
                return Err(ValidationError::NotPositiveInteger {
                    field: "cantidadProducir",
                })
            }
        };

        let article_id = optional_integer("idArticulo", self.id_articulo.as_ref())?.ok_or(
            ValidationError::Required {
                fields: &["idArticulo", "cantidadProducir"],
            },
        )?;

        Ok(ProductionOrder {
            article_id,
            quantity,
        })
    }
}

impl ProductionOrder {
    /// Confirmation text returned to the client.
    pub fn confirmation(&self) -> String {
        format!(
            "Producción de {} unidades del artículo {} completada.",
            self.quantity, self.article_id
        )
    }
}
