//! Untyped rows to JSON
//!
//! Used for views whose column set is owned by the database. Each column is
//! decoded according to its MySQL type name; anything textual (including
//! DECIMAL, which MySQL sends as text) becomes a JSON string. TIME covers
//! the full `-838:59:59` to `838:59:59` range. Binary columns are rendered
//! lossily as UTF-8.

use serde_json::{Number, Value};
use sqlx::mysql::types::MySqlTime;
use sqlx::mysql::MySqlRow;
use sqlx::{Column, Row, TypeInfo, ValueRef};

use crate::models::ReportRow;

/// Convert one row into a JSON object keyed by column name.
pub fn row_to_json(row: &MySqlRow) -> Result<ReportRow, sqlx::Error> {
    let mut object = ReportRow::new();

    for column in row.columns() {
        let index = column.ordinal();
        let value = if row.try_get_raw(index)?.is_null() {
            Value::Null
        } else {
            decode_column(row, index, column.type_info().name())?
        };
        object.insert(column.name().to_owned(), value);
    }

    Ok(object)
}

fn decode_column(row: &MySqlRow, index: usize, type_name: &str) -> Result<Value, sqlx::Error> {
    let value = match type_name {
        "BOOLEAN" => Value::Bool(row.try_get::<bool, _>(index)?),
        name if is_integer(name) && name.ends_with("UNSIGNED") => {
            Value::from(row.try_get::<u64, _>(index)?)
        }
        name if is_integer(name) => Value::from(row.try_get::<i64, _>(index)?),
        "FLOAT" => float(row.try_get::<f32, _>(index)? as f64),
        "DOUBLE" => float(row.try_get::<f64, _>(index)?),
        "DATE" => Value::String(row.try_get::<chrono::NaiveDate, _>(index)?.to_string()),
        "DATETIME" => Value::String(
            row.try_get::<chrono::NaiveDateTime, _>(index)?
                .format("%Y-%m-%dT%H:%M:%S")
                .to_string(),
        ),
        "TIMESTAMP" => Value::String(
            row.try_get::<chrono::DateTime<chrono::Utc>, _>(index)?
                .to_rfc3339(),
        ),
        "TIME" => Value::String(row.try_get::<MySqlTime, _>(index)?.to_string()),
        "YEAR" => Value::from(row.try_get_unchecked::<u16, _>(index)?),
        _ => text(row.try_get_unchecked::<Vec<u8>, _>(index)?),
    };

    Ok(value)
}

fn is_integer(type_name: &str) -> bool {
    let base = type_name.split_whitespace().next().unwrap_or_default();
    matches!(base, "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT")
}

/// Length-encoded column bytes as a string, replacing invalid UTF-8.
fn text(bytes: Vec<u8>) -> Value {
    match String::from_utf8(bytes) {
        Ok(s) => Value::String(s),
        Err(e) => Value::String(String::from_utf8_lossy(e.as_bytes()).into_owned()),
    }
}

/// NaN and infinities have no JSON form.
fn float(value: f64) -> Value {
    Number::from_f64(value).map(Value::Number).unwrap_or(Value::Null)
}
