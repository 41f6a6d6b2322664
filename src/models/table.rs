//! Table schema types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared column types accepted by `create_table`.
///
/// These are SQLite's storage-class keywords; anything else in a schema
/// payload is rejected before the statement is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColumnType {
    Integer,
    Text,
    Real,
    Blob,
    Numeric,
}

impl ColumnType {
    /// Parse a declared type keyword, case-insensitive.
    pub fn parse(keyword: &str) -> Option<Self> {
        match keyword.trim().to_ascii_uppercase().as_str() {
            "INTEGER" => Some(Self::Integer),
            "TEXT" => Some(Self::Text),
            "REAL" => Some(Self::Real),
            "BLOB" => Some(Self::Blob),
            "NUMERIC" => Some(Self::Numeric),
            _ => None,
        }
    }

    /// The SQL keyword emitted into CREATE TABLE statements.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Text => "TEXT",
            Self::Real => "REAL",
            Self::Blob => "BLOB",
            Self::Numeric => "NUMERIC",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_sql())
    }
}

/// One column row from table introspection (`describe_table`).
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct TableColumn {
    pub name: String,
    /// Declared type as stored in the catalog (e.g. INTEGER, TEXT)
    #[serde(rename = "type")]
    pub column_type: String,
    pub nullable: bool,
    pub is_primary_key: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(ColumnType::parse("INTEGER"), Some(ColumnType::Integer));
        assert_eq!(ColumnType::parse("integer"), Some(ColumnType::Integer));
        assert_eq!(ColumnType::parse(" Text "), Some(ColumnType::Text));
        assert_eq!(ColumnType::parse("NUMERIC"), Some(ColumnType::Numeric));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(ColumnType::parse("VARCHAR"), None);
        assert_eq!(ColumnType::parse("INTEGER PRIMARY KEY"), None);
        assert_eq!(ColumnType::parse(""), None);
    }

    #[test]
    fn test_display_matches_sql_keyword() {
        assert_eq!(ColumnType::Blob.to_string(), "BLOB");
        assert_eq!(ColumnType::Real.as_sql(), "REAL");
    }
}
