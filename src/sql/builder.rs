//! Safe construction of parameterized SQL statements.
//!
//! Each builder validates every identifier and value it touches, then emits a
//! [`QueryPlan`] whose template contains only validated identifiers and `?`
//! placeholders. Column order in generated SQL follows the iteration order of
//! the input mapping.

use crate::error::{DbError, DbResult};
use crate::models::{ColumnType, QueryPlan, ScalarValue};
use crate::sql::readonly;
use crate::sql::validate::{validate_identifier, validate_non_negative, validate_value};
use serde_json::{Map, Value};

/// Build `CREATE TABLE <table> (<col> <TYPE>[ PRIMARY KEY], ...)`.
///
/// `primary_key`, when given, must name a column of `schema`; the constraint
/// is appended to that column definition only.
pub fn build_create_table(
    table: &str,
    schema: &Map<String, Value>,
    primary_key: Option<&str>,
) -> DbResult<QueryPlan> {
    let table = validate_identifier(table, "table")?;
    if schema.is_empty() {
        return Err(DbError::invalid_schema(
            "schema must contain at least one column",
        ));
    }
    if let Some(pk) = primary_key {
        if !schema.contains_key(pk) {
            return Err(DbError::invalid_schema(format!(
                "primary key '{pk}' is not a column in the schema"
            )));
        }
    }

    let mut columns = Vec::with_capacity(schema.len());
    for (col, declared) in schema {
        let col = validate_identifier(col, "column")?;
        let keyword = declared.as_str().ok_or_else(|| {
            DbError::invalid_schema(format!("column '{col}' declares a non-string type"))
        })?;
        let column_type = ColumnType::parse(keyword).ok_or_else(|| {
            DbError::invalid_schema(format!(
                "unsupported column type '{keyword}' for column '{col}' (expected INTEGER, TEXT, REAL, BLOB, or NUMERIC)"
            ))
        })?;

        let mut def = format!("{col} {column_type}");
        if primary_key == Some(col) {
            def.push_str(" PRIMARY KEY");
        }
        columns.push(def);
    }

    Ok(QueryPlan::new(format!(
        "CREATE TABLE {table} ({})",
        columns.join(", ")
    )))
}

/// Build `INSERT INTO <table> (<cols>) VALUES (<placeholders>)` with values
/// bound in column order.
pub fn build_insert(table: &str, data: &Map<String, Value>) -> DbResult<QueryPlan> {
    let table = validate_identifier(table, "table")?;
    if data.is_empty() {
        return Err(DbError::empty_payload("INSERT"));
    }

    let mut columns = Vec::with_capacity(data.len());
    let mut params = Vec::with_capacity(data.len());
    for (col, value) in data {
        let col = validate_identifier(col, "column")?;
        params.push(validate_value(col, value)?);
        columns.push(col);
    }
    let placeholders = vec!["?"; columns.len()].join(", ");

    Ok(QueryPlan::with_params(
        format!(
            "INSERT INTO {table} ({}) VALUES ({placeholders})",
            columns.join(", ")
        ),
        params,
    ))
}

/// Build `SELECT * FROM <table>` with optional conjunctive equality filters,
/// ORDER BY, LIMIT, and OFFSET.
///
/// `limit`/`offset` must be non-negative and are bound as placeholders, never
/// interpolated. An `offset` without a `limit` emits `LIMIT -1` (SQLite's
/// unbounded form) so the OFFSET clause stays syntactically valid.
pub fn build_select(
    table: &str,
    filters: Option<&Map<String, Value>>,
    limit: Option<i64>,
    offset: Option<i64>,
    order_by: Option<&str>,
) -> DbResult<QueryPlan> {
    let table = validate_identifier(table, "table")?;
    let mut sql = format!("SELECT * FROM {table}");
    let mut params = Vec::new();

    if let Some(filters) = filters.filter(|f| !f.is_empty()) {
        let clause = where_clause(filters, &mut params)?;
        sql.push_str(" WHERE ");
        sql.push_str(&clause);
    }

    if let Some(order_by) = order_by {
        let order_by = validate_identifier(order_by, "column")?;
        sql.push_str(" ORDER BY ");
        sql.push_str(order_by);
    }

    let limit = limit.map(|l| validate_non_negative("limit", l)).transpose()?;
    let offset = offset
        .map(|o| validate_non_negative("offset", o))
        .transpose()?;
    match (limit, offset) {
        (Some(l), Some(o)) => {
            sql.push_str(" LIMIT ? OFFSET ?");
            params.push(ScalarValue::Int(l));
            params.push(ScalarValue::Int(o));
        }
        (Some(l), None) => {
            sql.push_str(" LIMIT ?");
            params.push(ScalarValue::Int(l));
        }
        (None, Some(o)) => {
            sql.push_str(" LIMIT -1 OFFSET ?");
            params.push(ScalarValue::Int(o));
        }
        (None, None) => {}
    }

    Ok(QueryPlan::with_params(sql, params))
}

/// Build `UPDATE <table> SET ... WHERE ...`.
///
/// Refuses an empty `filters` (whole-table update) and an empty `data`
/// payload. Data placeholders precede filter placeholders.
pub fn build_update(
    table: &str,
    filters: &Map<String, Value>,
    data: &Map<String, Value>,
) -> DbResult<QueryPlan> {
    let table = validate_identifier(table, "table")?;
    if filters.is_empty() {
        return Err(DbError::unsafe_operation("UPDATE", table));
    }
    if data.is_empty() {
        return Err(DbError::empty_payload("UPDATE"));
    }

    let mut params = Vec::with_capacity(data.len() + filters.len());
    let mut assignments = Vec::with_capacity(data.len());
    for (col, value) in data {
        let col = validate_identifier(col, "column")?;
        params.push(validate_value(col, value)?);
        assignments.push(format!("{col} = ?"));
    }
    let clause = where_clause(filters, &mut params)?;

    Ok(QueryPlan::with_params(
        format!("UPDATE {table} SET {} WHERE {clause}", assignments.join(", ")),
        params,
    ))
}

/// Build `DELETE FROM <table> WHERE ...`, refusing an empty `filters`.
pub fn build_delete(table: &str, filters: &Map<String, Value>) -> DbResult<QueryPlan> {
    let table = validate_identifier(table, "table")?;
    if filters.is_empty() {
        return Err(DbError::unsafe_operation("DELETE", table));
    }

    let mut params = Vec::with_capacity(filters.len());
    let clause = where_clause(filters, &mut params)?;

    Ok(QueryPlan::with_params(
        format!("DELETE FROM {table} WHERE {clause}"),
        params,
    ))
}

/// Pass a raw statement through, enforcing the read-only guard when asked.
///
/// The statement text is never modified; params were already shaped at the
/// tool boundary.
pub fn build_raw(query: &str, params: &[ScalarValue], read_only: bool) -> DbResult<QueryPlan> {
    if read_only {
        readonly::ensure_read_only(query)?;
    }
    Ok(QueryPlan::with_params(query, params.to_vec()))
}

/// Catalog query for user table names.
pub fn build_list_tables() -> QueryPlan {
    QueryPlan::new("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
}

/// Introspection query for one table's columns.
pub fn build_describe_table(table: &str) -> DbResult<QueryPlan> {
    let table = validate_identifier(table, "table")?;
    Ok(QueryPlan::new(format!("PRAGMA table_info({table})")))
}

/// Validate filter columns and values, producing `col = ? AND ...` and
/// pushing the bound values in iteration order.
fn where_clause(filters: &Map<String, Value>, params: &mut Vec<ScalarValue>) -> DbResult<String> {
    let mut clauses = Vec::with_capacity(filters.len());
    for (col, value) in filters {
        let col = validate_identifier(col, "column")?;
        params.push(validate_value(col, value)?);
        clauses.push(format!("{col} = ?"));
    }
    Ok(clauses.join(" AND "))
}
