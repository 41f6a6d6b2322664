//! Table lifecycle and introspection tools.
//!
//! This module implements the `create_table`, `list_tables`, and
//! `describe_table` MCP tools.

use crate::db::QueryExecutor;
use crate::error::DbResult;
use crate::models::TableColumn;
use crate::sql;
use crate::tools::records::MutationOutput;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::info;

/// Input for the create_table tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateTableInput {
    /// Name of the table to create
    pub table_name: String,
    /// Mapping of column name to declared type. Supported types: INTEGER, TEXT, REAL, BLOB, NUMERIC.
    pub schema: Map<String, Value>,
    /// Column to declare as PRIMARY KEY. Must be one of the schema's columns.
    #[serde(default)]
    pub primary_key: Option<String>,
}

/// Input for the describe_table tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DescribeTableInput {
    /// Name of the table to describe
    pub table_name: String,
}

/// Output from the list_tables tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ListTablesOutput {
    /// Names of user tables, sorted alphabetically
    pub tables: Vec<String>,
    /// Number of tables returned
    pub count: usize,
}

/// Output from the describe_table tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct DescribeTableOutput {
    /// Name of the described table
    pub table_name: String,
    /// Column definitions in declaration order
    pub columns: Vec<TableColumn>,
}

pub struct TableToolHandler {
    executor: Arc<QueryExecutor>,
}

impl TableToolHandler {
    pub fn new(executor: Arc<QueryExecutor>) -> Self {
        Self { executor }
    }

    pub async fn create_table(&self, input: CreateTableInput) -> DbResult<MutationOutput> {
        let plan = sql::build_create_table(
            &input.table_name,
            &input.schema,
            input.primary_key.as_deref(),
        )?;
        let result = self.executor.execute(&plan).await?;

        info!(
            table = %input.table_name,
            columns = input.schema.len(),
            "Created table"
        );

        Ok(MutationOutput {
            affected: result.rows_affected,
            last_id: None,
        })
    }

    pub async fn list_tables(&self) -> DbResult<ListTablesOutput> {
        let tables = self.executor.list_tables().await?;
        let count = tables.len();

        info!(count = count, "Listed tables");

        Ok(ListTablesOutput { tables, count })
    }

    pub async fn describe_table(&self, input: DescribeTableInput) -> DbResult<DescribeTableOutput> {
        let columns = self.executor.describe_table(&input.table_name).await?;

        info!(
            table = %input.table_name,
            columns = columns.len(),
            "Table schema read"
        );

        Ok(DescribeTableOutput {
            table_name: input.table_name,
            columns,
        })
    }
}
