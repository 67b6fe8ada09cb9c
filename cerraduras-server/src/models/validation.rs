//! Validation error types and JSON field helpers

use std::fmt;

use serde_json::Value;

/// Validation error for request payloads
///
/// Display strings are sent to API clients as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Supply creation without a name or a quantity
    SupplyFieldsRequired,

    /// Supply update with nothing to change
    NothingToUpdate,

    /// One or more required fields are absent
    Required { fields: &'static [&'static str] },

    /// Field is present but not an integer
    NotInteger { field: &'static str },

    /// Field must be an integer greater than zero
    NotPositiveInteger { field: &'static str },

    /// Request body could not be read as JSON
    InvalidBody { reason: String },

    /// Path segment is not a numeric id
    InvalidId { value: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SupplyFieldsRequired => {
                write!(f, "Nombre y cantidad del insumo son requeridos")
            }
            Self::NothingToUpdate => write!(f, "No se proporcionaron datos para actualizar"),
            Self::Required { fields } => match fields.split_last() {
                Some((last, [])) => write!(f, "{} es requerido", last),
                Some((last, rest)) => write!(f, "{} y {} son requeridos", rest.join(", "), last),
                None => write!(f, "faltan campos requeridos"),
            },
            Self::NotInteger { field } => write!(f, "{} debe ser un número entero", field),
            Self::NotPositiveInteger { field } => {
                write!(f, "{} debe ser un número entero positivo", field)
            }
            Self::InvalidBody { reason } => write!(f, "Cuerpo JSON inválido: {}", reason),
            Self::InvalidId { value } => write!(f, "Identificador inválido: '{}'", value),
        }
    }
}

impl std::error::Error for ValidationError {}

/// A JSON field that must be null/absent or a whole number.
///
/// Booleans, strings and floats are rejected even when they look numeric.
pub(crate) fn optional_integer(
    field: &'static str,
    value: Option<&Value>,
) -> Result<Option<i64>, ValidationError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(Some)
            .ok_or(ValidationError::NotInteger { field }),
        Some(_) => Err(ValidationError::NotInteger { field }),
    }
}

/// Non-empty string field, `None` for absent, null, empty or non-string values.
pub(crate) fn non_empty_string(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}
