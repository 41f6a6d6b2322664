//! Error types for the SQLite MCP Server.
//!
//! This module defines all error types using `thiserror` for ergonomic error handling.
//! Validation errors are raised before any statement reaches the database; execution
//! errors are classified from the driver at the executor boundary. Each variant keeps
//! enough context for AI assistants to understand and recover from the failure.

use sqlx::error::ErrorKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Invalid identifier '{identifier}': {reason}")]
    InvalidIdentifier { identifier: String, reason: String },

    #[error("Invalid value for '{name}': {reason}")]
    InvalidValue { name: String, reason: String },

    #[error("Invalid schema: {reason}")]
    InvalidSchema { reason: String },

    #[error("Empty payload: {operation} requires at least one column")]
    EmptyPayload { operation: String },

    #[error(
        "Unsafe operation refused: {operation} on '{table}' without filters would affect every row. Provide a non-empty 'filters' object."
    )]
    UnsafeOperation { operation: String, table: String },

    #[error(
        "Write refused in read-only mode: statement begins with '{keyword}'. Set 'read_only' to false to execute write statements."
    )]
    WriteInReadOnlyMode { keyword: String },

    #[error("Table not found: {table}")]
    TableNotFound { table: String },

    #[error("Constraint violation: {detail}")]
    ConstraintViolation { detail: String },

    #[error("SQL syntax error: {detail}")]
    SyntaxError { detail: String },

    #[error("Database busy: {detail}")]
    Busy { detail: String },

    #[error("Database error: {detail}")]
    DatabaseError { detail: String },
}

impl DbError {
    /// Create an invalid identifier error.
    pub fn invalid_identifier(identifier: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            identifier: identifier.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid value error for a named column or parameter.
    pub fn invalid_value(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid schema error.
    pub fn invalid_schema(reason: impl Into<String>) -> Self {
        Self::InvalidSchema {
            reason: reason.into(),
        }
    }

    /// Create an empty payload error.
    pub fn empty_payload(operation: impl Into<String>) -> Self {
        Self::EmptyPayload {
            operation: operation.into(),
        }
    }

    /// Create an unsafe operation error (unfiltered UPDATE/DELETE).
    pub fn unsafe_operation(operation: impl Into<String>, table: impl Into<String>) -> Self {
        Self::UnsafeOperation {
            operation: operation.into(),
            table: table.into(),
        }
    }

    /// Create a read-only mode violation error.
    pub fn write_in_read_only_mode(keyword: impl Into<String>) -> Self {
        Self::WriteInReadOnlyMode {
            keyword: keyword.into(),
        }
    }

    /// Create a table not found error.
    pub fn table_not_found(table: impl Into<String>) -> Self {
        Self::TableNotFound {
            table: table.into(),
        }
    }

    /// Create a constraint violation error.
    pub fn constraint_violation(detail: impl Into<String>) -> Self {
        Self::ConstraintViolation {
            detail: detail.into(),
        }
    }

    /// Create a SQL syntax error.
    pub fn syntax_error(detail: impl Into<String>) -> Self {
        Self::SyntaxError {
            detail: detail.into(),
        }
    }

    /// Create a busy/locked error.
    pub fn busy(detail: impl Into<String>) -> Self {
        Self::Busy {
            detail: detail.into(),
        }
    }

    /// Create a catch-all database error.
    pub fn database_error(detail: impl Into<String>) -> Self {
        Self::DatabaseError {
            detail: detail.into(),
        }
    }

    /// Get the raw driver diagnostic for this error, if available.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::ConstraintViolation { detail }
            | Self::SyntaxError { detail }
            | Self::Busy { detail }
            | Self::DatabaseError { detail } => Some(detail),
            _ => None,
        }
    }

    /// Check if this error is worth retrying with backoff.
    ///
    /// Only busy/locked conditions qualify; the executor itself never retries.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Busy { .. })
    }

    /// Check if this error was detected before any statement reached the database.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidIdentifier { .. }
                | Self::InvalidValue { .. }
                | Self::InvalidSchema { .. }
                | Self::EmptyPayload { .. }
                | Self::UnsafeOperation { .. }
                | Self::WriteInReadOnlyMode { .. }
        )
    }
}

/// Classify a driver-level error into the domain taxonomy.
///
/// SQLite reports most failures as code 1 (SQLITE_ERROR) with a descriptive
/// message, so classification inspects the message text alongside the
/// portable constraint kind and the primary result code.
fn classify_driver_error(kind: ErrorKind, primary_code: Option<i64>, message: &str) -> DbError {
    if let Some(table) = message.strip_prefix("no such table: ") {
        return DbError::table_not_found(table.trim());
    }

    match kind {
        ErrorKind::UniqueViolation
        | ErrorKind::ForeignKeyViolation
        | ErrorKind::NotNullViolation
        | ErrorKind::CheckViolation => return DbError::constraint_violation(message),
        _ => {}
    }
    if message.contains("constraint failed") {
        return DbError::constraint_violation(message);
    }

    if message.contains("syntax error")
        || message.contains("unrecognized token")
        || message.contains("incomplete input")
    {
        return DbError::syntax_error(message);
    }

    // SQLITE_BUSY = 5, SQLITE_LOCKED = 6 (low byte of the extended code)
    if matches!(primary_code, Some(5) | Some(6))
        || message.contains("database is locked")
        || message.contains("database table is locked")
    {
        return DbError::busy(message);
    }

    DbError::database_error(message)
}

/// Convert sqlx errors to DbError.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let kind = db_err.kind();
                let primary_code = db_err
                    .code()
                    .and_then(|c| c.parse::<i64>().ok())
                    .map(|c| c & 0xff);
                classify_driver_error(kind, primary_code, db_err.message())
            }
            sqlx::Error::PoolTimedOut => {
                DbError::busy("timed out waiting for a connection from the pool")
            }
            sqlx::Error::PoolClosed => DbError::database_error("connection pool is closed"),
            sqlx::Error::Io(io_err) => DbError::database_error(format!("I/O error: {io_err}")),
            sqlx::Error::ColumnDecode { index, source } => {
                DbError::database_error(format!("failed to decode column {index}: {source}"))
            }
            sqlx::Error::Decode(source) => {
                DbError::database_error(format!("decode error: {source}"))
            }
            sqlx::Error::WorkerCrashed => DbError::database_error("database worker crashed"),
            other => DbError::database_error(other.to_string()),
        }
    }
}

/// Result type alias for database operations.
pub type DbResult<T> = Result<T, DbError>;

/// Build diagnostic data as JSON value.
fn detail_data(detail: Option<&str>) -> Option<serde_json::Value> {
    detail.map(|d| serde_json::json!({ "detail": d }))
}

/// Convert DbError to MCP ErrorData for semantic error categorization.
/// Validation failures map to invalid_params, a missing table to
/// resource_not_found, and execution failures to internal_error with the
/// raw driver diagnostic preserved in the `data` object.
impl From<DbError> for rmcp::ErrorData {
    fn from(err: DbError) -> Self {
        match &err {
            DbError::InvalidIdentifier { .. }
            | DbError::InvalidValue { .. }
            | DbError::InvalidSchema { .. }
            | DbError::EmptyPayload { .. }
            | DbError::UnsafeOperation { .. }
            | DbError::WriteInReadOnlyMode { .. } => {
                rmcp::ErrorData::invalid_params(err.to_string(), None)
            }

            DbError::TableNotFound { .. } => rmcp::ErrorData::resource_not_found(
                err.to_string(),
                Some(serde_json::json!({
                    "suggestion": "Use list_tables to discover available tables"
                })),
            ),

            DbError::ConstraintViolation { .. }
            | DbError::SyntaxError { .. }
            | DbError::Busy { .. }
            | DbError::DatabaseError { .. } => {
                rmcp::ErrorData::internal_error(err.to_string(), detail_data(err.detail()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DbError::invalid_identifier("drop", "reserved SQL keyword");
        assert!(err.to_string().contains("Invalid identifier"));
        assert!(err.to_string().contains("drop"));
    }

    #[test]
    fn test_error_detail() {
        let err = DbError::constraint_violation("UNIQUE constraint failed: users.id");
        assert_eq!(err.detail(), Some("UNIQUE constraint failed: users.id"));
        assert_eq!(DbError::empty_payload("INSERT").detail(), None);
    }

    #[test]
    fn test_error_retryable() {
        assert!(DbError::busy("database is locked").is_retryable());
        assert!(!DbError::syntax_error("near \"FRM\"").is_retryable());
        assert!(!DbError::table_not_found("users").is_retryable());
    }

    #[test]
    fn test_validation_errors_flagged() {
        assert!(DbError::invalid_identifier("1col", "must start with a letter").is_validation());
        assert!(DbError::unsafe_operation("DELETE", "users").is_validation());
        assert!(!DbError::database_error("disk full").is_validation());
    }

    // Driver classification

    #[test]
    fn test_classify_missing_table() {
        let err = classify_driver_error(ErrorKind::Other, Some(1), "no such table: users");
        assert!(matches!(err, DbError::TableNotFound { table } if table == "users"));
    }

    #[test]
    fn test_classify_unique_violation() {
        let err = classify_driver_error(
            ErrorKind::UniqueViolation,
            Some(19),
            "UNIQUE constraint failed: users.id",
        );
        assert!(matches!(err, DbError::ConstraintViolation { .. }));
    }

    #[test]
    fn test_classify_constraint_by_message() {
        let err = classify_driver_error(
            ErrorKind::Other,
            Some(19),
            "NOT NULL constraint failed: users.name",
        );
        assert!(matches!(err, DbError::ConstraintViolation { .. }));
    }

    #[test]
    fn test_classify_syntax_error() {
        let err = classify_driver_error(ErrorKind::Other, Some(1), "near \"FRM\": syntax error");
        assert!(matches!(err, DbError::SyntaxError { .. }));
    }

    #[test]
    fn test_classify_busy_by_code() {
        let err = classify_driver_error(ErrorKind::Other, Some(5), "database is locked");
        assert!(matches!(err, DbError::Busy { .. }));
        // extended busy codes collapse to the primary code's low byte
        let err = classify_driver_error(ErrorKind::Other, Some(517 & 0xff), "database is locked");
        assert!(matches!(err, DbError::Busy { .. }));
    }

    #[test]
    fn test_classify_fallback() {
        let err = classify_driver_error(ErrorKind::Other, Some(1), "no such column: nope");
        assert!(matches!(err, DbError::DatabaseError { .. }));
    }

    // Tests for From<DbError> for rmcp::ErrorData

    #[test]
    fn test_validation_errors_map_to_invalid_params() {
        for err in [
            DbError::invalid_identifier("x;y", "contains disallowed characters"),
            DbError::invalid_value("age", "nested objects are not supported"),
            DbError::invalid_schema("schema must contain at least one column"),
            DbError::empty_payload("INSERT"),
            DbError::unsafe_operation("UPDATE", "users"),
            DbError::write_in_read_only_mode("DROP"),
        ] {
            let mcp_err: rmcp::ErrorData = err.into();
            // invalid_params uses -32602
            assert_eq!(mcp_err.code.0, -32602);
        }
    }

    #[test]
    fn test_table_not_found_maps_to_resource_not_found() {
        let err = DbError::table_not_found("missing");
        let mcp_err: rmcp::ErrorData = err.into();
        // resource_not_found uses -32002 in rmcp
        assert_eq!(mcp_err.code.0, -32002);
    }

    #[test]
    fn test_execution_errors_map_to_internal_error() {
        for err in [
            DbError::constraint_violation("UNIQUE constraint failed: t.id"),
            DbError::syntax_error("near \"FRM\": syntax error"),
            DbError::busy("database is locked"),
            DbError::database_error("disk I/O error"),
        ] {
            let mcp_err: rmcp::ErrorData = err.into();
            // internal_error uses -32603
            assert_eq!(mcp_err.code.0, -32603);
        }
    }

    #[test]
    fn test_execution_error_preserves_detail_in_data() {
        let err = DbError::constraint_violation("UNIQUE constraint failed: users.id");
        let mcp_err: rmcp::ErrorData = err.into();
        assert!(mcp_err.data.is_some());
        let data = mcp_err.data.unwrap();
        assert_eq!(data["detail"], "UNIQUE constraint failed: users.id");
    }
}
