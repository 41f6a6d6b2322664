//! The MCP-facing service.
//!
//! `SqliteService` registers every tool through rmcp's router macros and
//! maps handler errors onto JSON-RPC error codes on the way out.

use crate::db::QueryExecutor;
use crate::tools::raw::{ExecuteRawQueryInput, RawQueryOutput, RawToolHandler};
use crate::tools::records::{
    DeleteRecordInput, InsertRecordInput, MutationOutput, QueryRecordsInput, QueryRecordsOutput,
    RecordToolHandler, UpdateRecordInput,
};
use crate::tools::tables::{
    CreateTableInput, DescribeTableInput, DescribeTableOutput, ListTablesOutput, TableToolHandler,
};
use rmcp::Json;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct SqliteService {
    /// Shared executor owning the database pool
    executor: Arc<QueryExecutor>,
    /// Dispatch table generated by the `tool_router` macro
    tool_router: ToolRouter<Self>,
}

impl SqliteService {
    /// Create a new SqliteService over the given executor.
    pub fn new(executor: Arc<QueryExecutor>) -> Self {
        Self {
            executor,
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router]
impl SqliteService {
    #[tool(
        description = "Create a new table.\nTakes a mapping of column names to SQLite types (INTEGER, TEXT, REAL, BLOB, NUMERIC) and an optional primary_key column."
    )]
    async fn create_table(
        &self,
        Parameters(input): Parameters<CreateTableInput>,
    ) -> Result<Json<MutationOutput>, McpError> {
        let handler = TableToolHandler::new(self.executor.clone());
        handler.create_table(input).await.map(Json).map_err(Into::into)
    }

    #[tool(
        description = "Insert a row into a table.\nTakes a mapping of column names to values. Returns the affected count and the new row's last_id."
    )]
    async fn insert_record(
        &self,
        Parameters(input): Parameters<InsertRecordInput>,
    ) -> Result<Json<MutationOutput>, McpError> {
        let handler = RecordToolHandler::new(self.executor.clone());
        handler.insert_record(input).await.map(Json).map_err(Into::into)
    }

    #[tool(
        description = "Query rows from a table.\nOptional equality filters (ANDed), limit, offset, and order_by column.\nOmit filters to return all rows."
    )]
    async fn query_records(
        &self,
        Parameters(input): Parameters<QueryRecordsInput>,
    ) -> Result<Json<QueryRecordsOutput>, McpError> {
        let handler = RecordToolHandler::new(self.executor.clone());
        handler.query_records(input).await.map(Json).map_err(Into::into)
    }

    #[tool(
        description = "Update rows in a table.\nRequires non-empty equality filters selecting the rows; whole-table updates are refused."
    )]
    async fn update_record(
        &self,
        Parameters(input): Parameters<UpdateRecordInput>,
    ) -> Result<Json<MutationOutput>, McpError> {
        let handler = RecordToolHandler::new(self.executor.clone());
        handler.update_record(input).await.map(Json).map_err(Into::into)
    }

    #[tool(
        description = "Delete rows from a table.\nRequires non-empty equality filters selecting the rows; whole-table deletes are refused."
    )]
    async fn delete_record(
        &self,
        Parameters(input): Parameters<DeleteRecordInput>,
    ) -> Result<Json<MutationOutput>, McpError> {
        let handler = RecordToolHandler::new(self.executor.clone());
        handler.delete_record(input).await.map(Json).map_err(Into::into)
    }

    #[tool(description = "List all user tables in the database, sorted by name.")]
    async fn list_tables(&self) -> Result<Json<ListTablesOutput>, McpError> {
        let handler = TableToolHandler::new(self.executor.clone());
        handler.list_tables().await.map(Json).map_err(Into::into)
    }

    #[tool(
        description = "Describe a table's columns.\nReturns name, declared type, nullability, and primary-key flag per column."
    )]
    async fn describe_table(
        &self,
        Parameters(input): Parameters<DescribeTableInput>,
    ) -> Result<Json<DescribeTableOutput>, McpError> {
        let handler = TableToolHandler::new(self.executor.clone());
        handler.describe_table(input).await.map(Json).map_err(Into::into)
    }

    #[tool(
        description = "Run a raw SQL statement with optional positional parameters (`?` placeholders).\nread_only is true by default and refuses anything other than SELECT or a read-only PRAGMA; set it to false for writes and DDL."
    )]
    async fn execute_raw_query(
        &self,
        Parameters(input): Parameters<ExecuteRawQueryInput>,
    ) -> Result<Json<RawQueryOutput>, McpError> {
        let handler = RawToolHandler::new(self.executor.clone());
        handler
            .execute_raw_query(input)
            .await
            .map(Json)
            .map_err(Into::into)
    }
}

#[tool_handler]
impl ServerHandler for SqliteService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "sqlite-mcp-server".to_owned(),
                title: Some("SQLite MCP Server".to_owned()),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "SQLite database tools for creating tables and reading/writing rows.\n\
                \n\
                ## Tools\n\
                - `create_table`: create a table from a column-to-type mapping\n\
                - `insert_record`: insert one row\n\
                - `query_records`: select rows with equality filters, limit/offset, order_by\n\
                - `update_record` / `delete_record`: mutate rows (non-empty filters required)\n\
                - `list_tables` / `describe_table`: inspect the schema\n\
                - `execute_raw_query`: raw SQL escape hatch, read-only unless read_only=false\n\
                \n\
                ## Conventions\n\
                - Table and column names must match [A-Za-z_][A-Za-z0-9_]* and not be SQL keywords\n\
                - Values are scalars (string, number, boolean, null); nested objects are rejected\n\
                - Filters are equality-only and combined with AND\n\
                \n\
                ## Safety\n\
                `update_record` and `delete_record` refuse empty filters to prevent accidental\n\
                whole-table mutation. Use `execute_raw_query` with read_only=false for such\n\
                statements when they are intentional."
                    .to_string(),
            ),
        }
    }
}
