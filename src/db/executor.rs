//! Query execution engine.
//!
//! The executor owns the connection pool and is the only component that
//! acquires handles from it. Each call runs exactly one statement; pool
//! checkout is scoped inside sqlx, so a failing statement never leaks a
//! handle. Driver errors are classified into the domain taxonomy at this
//! boundary and never retried here.

use crate::db::rows::row_to_json;
use crate::error::{DbError, DbResult};
use crate::models::{ExecuteResult, QueryPlan, RawQueryResult, ScalarValue, TableColumn};
use crate::sql;
use serde_json::{Map, Value};
use sqlx::sqlite::SqliteArguments;
use sqlx::{Row, SqlitePool};
use tracing::debug;

/// Executes built statements against the one SQLite database.
pub struct QueryExecutor {
    pool: SqlitePool,
}

impl QueryExecutor {
    /// Create an executor owning the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// The underlying pool, exposed for startup diagnostics.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run a statement that returns no rows (DDL, INSERT, UPDATE, DELETE).
    pub async fn execute(&self, plan: &QueryPlan) -> DbResult<ExecuteResult> {
        debug!(sql = %plan.sql, params = plan.params.len(), "Executing statement");

        let mut query = sqlx::query(&plan.sql);
        for param in &plan.params {
            query = bind_scalar(query, param);
        }
        let result = query.execute(&self.pool).await?;

        let rowid = result.last_insert_rowid();
        Ok(ExecuteResult {
            rows_affected: result.rows_affected(),
            last_insert_id: (rowid != 0).then_some(rowid),
        })
    }

    /// Run a row-returning statement and decode every row.
    pub async fn fetch_rows(&self, plan: &QueryPlan) -> DbResult<Vec<Map<String, Value>>> {
        debug!(sql = %plan.sql, params = plan.params.len(), "Fetching rows");

        let mut query = sqlx::query(&plan.sql);
        for param in &plan.params {
            query = bind_scalar(query, param);
        }
        let rows = query.fetch_all(&self.pool).await?;

        rows.iter().map(row_to_json).collect()
    }

    /// Run a raw statement, choosing the fetch or execute path by its
    /// leading keyword.
    pub async fn execute_raw(&self, plan: &QueryPlan) -> DbResult<RawQueryResult> {
        if sql::returns_rows(&plan.sql) {
            let rows = self.fetch_rows(plan).await?;
            Ok(RawQueryResult::Rows(rows))
        } else {
            let result = self.execute(plan).await?;
            Ok(RawQueryResult::Write {
                rows_affected: result.rows_affected,
            })
        }
    }

    /// List user table names from the catalog.
    pub async fn list_tables(&self) -> DbResult<Vec<String>> {
        let plan = sql::build_list_tables();
        let tables = sqlx::query_scalar::<_, String>(&plan.sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(tables)
    }

    /// Describe one table's columns via `PRAGMA table_info`.
    ///
    /// The pragma returns no rows for a missing table, which surfaces as
    /// [`DbError::TableNotFound`].
    pub async fn describe_table(&self, table: &str) -> DbResult<Vec<TableColumn>> {
        let plan = sql::build_describe_table(table)?;
        let rows = sqlx::query(&plan.sql).fetch_all(&self.pool).await?;
        if rows.is_empty() {
            return Err(DbError::table_not_found(table));
        }

        let mut columns = Vec::with_capacity(rows.len());
        for row in &rows {
            columns.push(TableColumn {
                name: row.try_get::<String, _>("name")?,
                column_type: row.try_get::<String, _>("type")?,
                nullable: row.try_get::<i64, _>("notnull")? == 0,
                is_primary_key: row.try_get::<i64, _>("pk")? > 0,
            });
        }
        Ok(columns)
    }
}

fn bind_scalar<'q>(
    query: sqlx::query::Query<'q, sqlx::Sqlite, SqliteArguments<'q>>,
    param: &'q ScalarValue,
) -> sqlx::query::Query<'q, sqlx::Sqlite, SqliteArguments<'q>> {
    match param {
        ScalarValue::Null => query.bind(None::<String>),
        ScalarValue::Bool(v) => query.bind(*v),
        ScalarValue::Int(v) => query.bind(*v),
        ScalarValue::Float(v) => query.bind(*v),
        ScalarValue::Text(v) => query.bind(v.as_str()),
    }
}
