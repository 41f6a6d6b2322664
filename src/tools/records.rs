//! Record-level CRUD tools.
//!
//! This module implements the `insert_record`, `query_records`,
//! `update_record`, and `delete_record` MCP tools.

use crate::db::QueryExecutor;
use crate::error::DbResult;
use crate::sql;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::info;

/// Input for the insert_record tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct InsertRecordInput {
    /// Name of the target table
    pub table_name: String,
    /// Mapping of column name to value for the new row
    pub data: Map<String, Value>,
}

/// Input for the query_records tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct QueryRecordsInput {
    /// Name of the table to query
    pub table_name: String,
    /// Equality filters combined with AND. Omit to return all rows.
    #[serde(default)]
    pub filters: Option<Map<String, Value>>,
    /// Maximum number of rows to return. Must be non-negative.
    #[serde(default)]
    pub limit: Option<i64>,
    /// Number of rows to skip. Must be non-negative.
    #[serde(default)]
    pub offset: Option<i64>,
    /// Column to sort by, ascending
    #[serde(default)]
    pub order_by: Option<String>,
}

/// Input for the update_record tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateRecordInput {
    /// Name of the target table
    pub table_name: String,
    /// Equality filters selecting the rows to update. Must not be empty.
    pub filters: Map<String, Value>,
    /// Mapping of column name to replacement value
    pub data: Map<String, Value>,
}

/// Input for the delete_record tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteRecordInput {
    /// Name of the target table
    pub table_name: String,
    /// Equality filters selecting the rows to delete. Must not be empty.
    pub filters: Map<String, Value>,
}

/// Output from the mutating tools (create_table, insert_record,
/// update_record, delete_record).
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct MutationOutput {
    /// Number of rows affected by the statement
    pub affected: u64,
    /// Rowid of the inserted row. Present for insert_record only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_id: Option<i64>,
}

/// Output from the query_records tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct QueryRecordsOutput {
    /// Matching rows as column-to-value objects
    pub rows: Vec<Map<String, Value>>,
    /// Number of rows returned
    pub count: usize,
}

pub struct RecordToolHandler {
    executor: Arc<QueryExecutor>,
}

impl RecordToolHandler {
    pub fn new(executor: Arc<QueryExecutor>) -> Self {
        Self { executor }
    }

    pub async fn insert_record(&self, input: InsertRecordInput) -> DbResult<MutationOutput> {
        let plan = sql::build_insert(&input.table_name, &input.data)?;
        let result = self.executor.execute(&plan).await?;

        info!(
            table = %input.table_name,
            affected = result.rows_affected,
            last_id = result.last_insert_id,
            "Inserted record"
        );

        Ok(MutationOutput {
            affected: result.rows_affected,
            last_id: result.last_insert_id,
        })
    }

    pub async fn query_records(&self, input: QueryRecordsInput) -> DbResult<QueryRecordsOutput> {
        let plan = sql::build_select(
            &input.table_name,
            input.filters.as_ref(),
            input.limit,
            input.offset,
            input.order_by.as_deref(),
        )?;
        let rows = self.executor.fetch_rows(&plan).await?;
        let count = rows.len();

        info!(table = %input.table_name, rows = count, "Queried records");

        Ok(QueryRecordsOutput { rows, count })
    }

    pub async fn update_record(&self, input: UpdateRecordInput) -> DbResult<MutationOutput> {
        let plan = sql::build_update(&input.table_name, &input.filters, &input.data)?;
        let result = self.executor.execute(&plan).await?;

        info!(
            table = %input.table_name,
            affected = result.rows_affected,
            "Updated records"
        );

        Ok(MutationOutput {
            affected: result.rows_affected,
            last_id: None,
        })
    }

    pub async fn delete_record(&self, input: DeleteRecordInput) -> DbResult<MutationOutput> {
        let plan = sql::build_delete(&input.table_name, &input.filters)?;
        let result = self.executor.execute(&plan).await?;

        info!(
            table = %input.table_name,
            affected = result.rows_affected,
            "Deleted records"
        );

        Ok(MutationOutput {
            affected: result.rows_affected,
            last_id: None,
        })
    }
}
