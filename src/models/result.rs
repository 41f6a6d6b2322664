//! Normalized executor results.

use serde_json::{Map, Value};

/// Result of a statement that does not return rows.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecuteResult {
    /// Rows changed by the statement (0 for DDL).
    pub rows_affected: u64,
    /// Rowid assigned by the most recent INSERT on the connection, when one
    /// exists. Only meaningful directly after an INSERT.
    pub last_insert_id: Option<i64>,
}

/// Result of a raw statement, which may or may not return rows.
#[derive(Debug, Clone, PartialEq)]
pub enum RawQueryResult {
    /// A row-returning statement (SELECT or a read-only pragma).
    Rows(Vec<Map<String, Value>>),
    /// A write or DDL statement.
    Write { rows_affected: u64 },
}
