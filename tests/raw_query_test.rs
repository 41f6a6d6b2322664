//! Integration tests for the raw-query escape hatch.
//!
//! Tests verify that:
//! - read_only=true refuses writes and PRAGMA assignments before execution
//! - read_only=false lets the same statements through
//! - The guard sees through leading whitespace and SQL comments
//! - Positional parameters bind in order
//! - Malformed statements surface as syntax errors

use serde_json::json;
use sqlite_mcp_server::config::Config;
use sqlite_mcp_server::db::{QueryExecutor, create_pool};
use sqlite_mcp_server::error::DbError;
use sqlite_mcp_server::models::ScalarValue;
use sqlite_mcp_server::tools::raw::{ExecuteRawQueryInput, RawQueryOutput, RawToolHandler};
use std::sync::Arc;
use tempfile::TempDir;

async fn setup_handler() -> (TempDir, RawToolHandler) {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        database: dir.path().join("test.db").to_str().unwrap().to_string(),
        ..Config::default_config()
    };
    let pool = create_pool(&config).await.unwrap();
    let handler = RawToolHandler::new(Arc::new(QueryExecutor::new(pool)));
    (dir, handler)
}

fn raw(query: &str, params: Vec<ScalarValue>, read_only: bool) -> ExecuteRawQueryInput {
    ExecuteRawQueryInput {
        query: query.to_string(),
        params,
        read_only,
    }
}

async fn create_table(handler: &RawToolHandler) {
    handler
        .execute_raw_query(raw(
            "CREATE TABLE items (id INTEGER PRIMARY KEY, name TEXT)",
            vec![],
            false,
        ))
        .await
        .unwrap();
}

// =============================================================================
// Read-only guard
// =============================================================================

#[tokio::test]
async fn test_read_only_refuses_drop() {
    let (_dir, handler) = setup_handler().await;
    create_table(&handler).await;

    let err = handler
        .execute_raw_query(raw("DROP TABLE items", vec![], true))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::WriteInReadOnlyMode { ref keyword } if keyword == "DROP"));
}

#[tokio::test]
async fn test_read_only_off_allows_drop() {
    let (_dir, handler) = setup_handler().await;
    create_table(&handler).await;

    let result = handler
        .execute_raw_query(raw("DROP TABLE items", vec![], false))
        .await
        .unwrap();
    assert!(matches!(result, RawQueryOutput::Write { .. }));
}

#[tokio::test]
async fn test_guard_sees_through_comments() {
    let (_dir, handler) = setup_handler().await;
    create_table(&handler).await;

    let err = handler
        .execute_raw_query(raw(
            "/* cleanup */ -- really\n  DELETE FROM items",
            vec![],
            true,
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::WriteInReadOnlyMode { ref keyword } if keyword == "DELETE"));
}

#[tokio::test]
async fn test_read_only_allows_table_info_pragma() {
    let (_dir, handler) = setup_handler().await;
    create_table(&handler).await;

    let result = handler
        .execute_raw_query(raw("PRAGMA table_info(items)", vec![], true))
        .await
        .unwrap();
    match result {
        RawQueryOutput::Rows { rows, count } => {
            assert_eq!(count, 2);
            assert_eq!(rows[0]["name"], json!("id"));
        }
        RawQueryOutput::Write { .. } => panic!("pragma should return rows"),
    }
}

#[tokio::test]
async fn test_read_only_refuses_pragma_assignment() {
    let (_dir, handler) = setup_handler().await;

    let err = handler
        .execute_raw_query(raw("PRAGMA journal_mode = WAL", vec![], true))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::WriteInReadOnlyMode { .. }));
}

#[tokio::test]
async fn test_comment_only_statement_is_syntax_error() {
    let (_dir, handler) = setup_handler().await;

    for query in ["", "   ", "-- nothing here", "/* still nothing */"] {
        let err = handler
            .execute_raw_query(raw(query, vec![], true))
            .await
            .unwrap_err();
        assert!(
            matches!(err, DbError::SyntaxError { .. }),
            "expected syntax error for {query:?}"
        );
    }
}

// =============================================================================
// Execution paths
// =============================================================================

#[tokio::test]
async fn test_select_with_positional_params() {
    let (_dir, handler) = setup_handler().await;
    create_table(&handler).await;

    handler
        .execute_raw_query(raw(
            "INSERT INTO items (id, name) VALUES (?, ?), (?, ?)",
            vec![
                ScalarValue::Int(1),
                ScalarValue::Text("bolt".to_string()),
                ScalarValue::Int(2),
                ScalarValue::Text("nut".to_string()),
            ],
            false,
        ))
        .await
        .unwrap();

    let result = handler
        .execute_raw_query(raw(
            "SELECT name FROM items WHERE id = ?",
            vec![ScalarValue::Int(2)],
            true,
        ))
        .await
        .unwrap();
    match result {
        RawQueryOutput::Rows { rows, count } => {
            assert_eq!(count, 1);
            assert_eq!(rows[0]["name"], json!("nut"));
        }
        RawQueryOutput::Write { .. } => panic!("select should return rows"),
    }
}

#[tokio::test]
async fn test_write_reports_affected_rows() {
    let (_dir, handler) = setup_handler().await;
    create_table(&handler).await;

    handler
        .execute_raw_query(raw(
            "INSERT INTO items (id, name) VALUES (1, 'a'), (2, 'b'), (3, 'c')",
            vec![],
            false,
        ))
        .await
        .unwrap();

    let result = handler
        .execute_raw_query(raw("UPDATE items SET name = 'x'", vec![], false))
        .await
        .unwrap();
    assert!(matches!(result, RawQueryOutput::Write { affected: 3 }));
}

#[tokio::test]
async fn test_blob_columns_encode_as_base64() {
    let (_dir, handler) = setup_handler().await;

    handler
        .execute_raw_query(raw("CREATE TABLE bin (data BLOB)", vec![], false))
        .await
        .unwrap();
    handler
        .execute_raw_query(raw("INSERT INTO bin (data) VALUES (X'0102')", vec![], false))
        .await
        .unwrap();

    let result = handler
        .execute_raw_query(raw("SELECT data FROM bin", vec![], true))
        .await
        .unwrap();
    match result {
        RawQueryOutput::Rows { rows, .. } => {
            assert_eq!(rows[0]["data"], json!("AQI="));
        }
        RawQueryOutput::Write { .. } => panic!("select should return rows"),
    }
}

#[tokio::test]
async fn test_malformed_statement_is_syntax_error() {
    let (_dir, handler) = setup_handler().await;

    let err = handler
        .execute_raw_query(raw("SELEC 1", vec![], false))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::SyntaxError { .. }));
}

#[tokio::test]
async fn test_values_statement_returns_rows() {
    let (_dir, handler) = setup_handler().await;

    // VALUES is row-returning but not SELECT, so the guard must be off
    let result = handler
        .execute_raw_query(raw("VALUES (1, 'one')", vec![], false))
        .await
        .unwrap();
    assert!(matches!(result, RawQueryOutput::Rows { count: 1, .. }));
}
