//! Identifier and value validation.
//!
//! Everything here runs before any statement reaches the database and has no
//! side effects. Identifiers that pass are safe to concatenate into a
//! statement template; values are shaped into [`ScalarValue`] or rejected.

use crate::error::{DbError, DbResult};
use crate::models::ScalarValue;
use serde_json::Value;

/// Maximum accepted identifier length.
pub const MAX_IDENTIFIER_LEN: usize = 64;

/// SQL reserved words refused as table or column names, matched
/// case-insensitively.
const RESERVED_WORDS: &[&str] = &[
    "ALL",
    "ALTER",
    "AND",
    "AS",
    "ATTACH",
    "AUTOINCREMENT",
    "BEGIN",
    "BETWEEN",
    "BY",
    "CASCADE",
    "CASE",
    "CAST",
    "CHECK",
    "COLLATE",
    "COLUMN",
    "COMMIT",
    "CONSTRAINT",
    "CREATE",
    "CROSS",
    "DEFAULT",
    "DELETE",
    "DETACH",
    "DISTINCT",
    "DROP",
    "ELSE",
    "END",
    "ESCAPE",
    "EXCEPT",
    "EXISTS",
    "EXPLAIN",
    "FOREIGN",
    "FROM",
    "GLOB",
    "GROUP",
    "HAVING",
    "IN",
    "INDEX",
    "INNER",
    "INSERT",
    "INTERSECT",
    "INTO",
    "IS",
    "JOIN",
    "KEY",
    "LEFT",
    "LIKE",
    "LIMIT",
    "NOT",
    "NULL",
    "OFFSET",
    "ON",
    "OR",
    "ORDER",
    "OUTER",
    "PRAGMA",
    "PRIMARY",
    "REFERENCES",
    "REPLACE",
    "RETURNING",
    "RIGHT",
    "ROLLBACK",
    "SELECT",
    "SET",
    "TABLE",
    "THEN",
    "TRANSACTION",
    "TRIGGER",
    "UNION",
    "UNIQUE",
    "UPDATE",
    "USING",
    "VACUUM",
    "VALUES",
    "VIEW",
    "WHEN",
    "WHERE",
    "WITH",
];

/// Validate a table or column identifier, returning it unchanged.
///
/// Accepts `[A-Za-z_][A-Za-z0-9_]*` up to [`MAX_IDENTIFIER_LEN`] characters
/// and refuses SQL reserved words. `kind` names the identifier's role
/// ("table" or "column") in error messages.
pub fn validate_identifier<'a>(name: &'a str, kind: &str) -> DbResult<&'a str> {
    if name.is_empty() {
        return Err(DbError::invalid_identifier(
            name,
            format!("{kind} name must not be empty"),
        ));
    }
    if name.len() > MAX_IDENTIFIER_LEN {
        return Err(DbError::invalid_identifier(
            name,
            format!("{kind} name exceeds {MAX_IDENTIFIER_LEN} characters"),
        ));
    }

    let mut chars = name.chars();
    let first = chars.next().unwrap_or('\0');
    if !(first.is_ascii_alphabetic() || first == '_')
        || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(DbError::invalid_identifier(
            name,
            format!(
                "{kind} name must start with a letter or underscore and contain only ASCII letters, digits, and underscores"
            ),
        ));
    }

    if RESERVED_WORDS.iter().any(|w| name.eq_ignore_ascii_case(w)) {
        return Err(DbError::invalid_identifier(
            name,
            format!("{kind} name is a reserved SQL keyword"),
        ));
    }

    Ok(name)
}

/// Validate a payload value, shaping it into a [`ScalarValue`].
///
/// Accepts JSON null, booleans, numbers, and strings; rejects arrays and
/// nested objects. `name` is the column or parameter the value belongs to.
pub fn validate_value(name: &str, value: &Value) -> DbResult<ScalarValue> {
    match value {
        Value::Null => Ok(ScalarValue::Null),
        Value::Bool(b) => Ok(ScalarValue::Bool(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(ScalarValue::Int(i))
            } else if n.is_u64() {
                Err(DbError::invalid_value(
                    name,
                    "integer value exceeds the signed 64-bit range",
                ))
            } else {
                n.as_f64().map(ScalarValue::Float).ok_or_else(|| {
                    DbError::invalid_value(name, "number is not representable")
                })
            }
        }
        Value::String(s) => Ok(ScalarValue::Text(s.clone())),
        Value::Array(_) => Err(DbError::invalid_value(
            name,
            "arrays are not supported; provide a scalar value",
        )),
        Value::Object(_) => Err(DbError::invalid_value(
            name,
            "nested objects are not supported; provide a scalar value",
        )),
    }
}

/// Validate a pagination argument as a non-negative integer.
pub fn validate_non_negative(name: &str, value: i64) -> DbResult<i64> {
    if value < 0 {
        Err(DbError::invalid_value(name, "must be a non-negative integer"))
    } else {
        Ok(value)
    }
}
