//! Row decoding: SQLite rows to JSON objects.
//!
//! Values decode by storage class — INTEGER to a JSON number, REAL/NUMERIC
//! to a float, TEXT to a string, BLOB to base64 — with a lenient fallback
//! chain for anything else.

use crate::error::DbResult;
use serde_json::{Map, Value};
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row, TypeInfo, ValueRef};

/// Convert one row into an ordered column → value JSON map.
pub fn row_to_json(row: &SqliteRow) -> DbResult<Map<String, Value>> {
    let mut map = Map::new();
    for (idx, column) in row.columns().iter().enumerate() {
        map.insert(column.name().to_string(), decode_column(row, idx)?);
    }
    Ok(map)
}

/// Decode one column of a row into a JSON value.
pub fn decode_column(row: &SqliteRow, idx: usize) -> DbResult<Value> {
    let raw = row.try_get_raw(idx)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let type_name = raw.type_info().name().to_ascii_uppercase();

    let value = match type_name.as_str() {
        "INTEGER" | "INT" | "INT4" | "INT8" | "BIGINT" => decode_integer(row, idx),
        "BOOLEAN" | "BOOL" => decode_boolean(row, idx),
        "REAL" | "FLOAT" | "DOUBLE" | "NUMERIC" => decode_float(row, idx),
        "TEXT" | "VARCHAR" | "DATE" | "TIME" | "DATETIME" => decode_text(row, idx),
        "BLOB" | "BINARY" | "VARBINARY" => decode_blob(row, idx),
        _ => decode_fallback(row, idx),
    };
    Ok(value)
}

fn decode_integer(row: &SqliteRow, idx: usize) -> Value {
    row.try_get::<Option<i64>, _>(idx)
        .ok()
        .flatten()
        .map(|v| Value::Number(v.into()))
        .unwrap_or(Value::Null)
}

fn decode_boolean(row: &SqliteRow, idx: usize) -> Value {
    row.try_get::<Option<bool>, _>(idx)
        .ok()
        .flatten()
        .map(Value::Bool)
        .unwrap_or(Value::Null)
}

fn decode_float(row: &SqliteRow, idx: usize) -> Value {
    match row.try_get::<Option<f64>, _>(idx) {
        Ok(Some(v)) => serde_json::Number::from_f64(v)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(v.to_string())),
        _ => Value::Null,
    }
}

fn decode_text(row: &SqliteRow, idx: usize) -> Value {
    row.try_get::<Option<String>, _>(idx)
        .ok()
        .flatten()
        .map(Value::String)
        .unwrap_or(Value::Null)
}

fn decode_blob(row: &SqliteRow, idx: usize) -> Value {
    row.try_get::<Option<Vec<u8>>, _>(idx)
        .ok()
        .flatten()
        .map(|bytes| encode_blob(&bytes))
        .unwrap_or(Value::Null)
}

/// Unknown declared types: try text first, then raw bytes.
fn decode_fallback(row: &SqliteRow, idx: usize) -> Value {
    if let Ok(Some(v)) = row.try_get::<Option<String>, _>(idx) {
        return Value::String(v);
    }
    if let Ok(Some(v)) = row.try_get::<Option<Vec<u8>>, _>(idx) {
        return encode_blob(&v);
    }
    Value::Null
}

/// BLOBs cross the JSON boundary as base64 text.
pub fn encode_blob(bytes: &[u8]) -> Value {
    use base64::{Engine as _, engine::general_purpose::STANDARD};
    Value::String(STANDARD.encode(bytes))
}
