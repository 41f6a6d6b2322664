//! Raw SQL escape hatch.
//!
//! This module implements the `execute_raw_query` MCP tool. Statements run
//! verbatim with positional parameters; the read-only guard is enforced here
//! unless the caller opts out.

use crate::db::QueryExecutor;
use crate::error::DbResult;
use crate::models::{RawQueryResult, ScalarValue};
use crate::sql;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::info;

/// Input for the execute_raw_query tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ExecuteRawQueryInput {
    /// SQL statement to run, with `?` placeholders for parameters
    pub query: String,
    /// Positional parameter values, in placeholder order
    #[serde(default)]
    pub params: Vec<ScalarValue>,
    /// Refuse anything other than SELECT or a read-only PRAGMA. Default: true
    #[serde(default = "default_true")]
    pub read_only: bool,
}

fn default_true() -> bool {
    true
}

/// Output from the execute_raw_query tool: rows for statements that produce
/// them, otherwise the affected-row count.
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(untagged)]
// Both variants serialize as objects; rmcp requires the root schema to say so
// explicitly, and schemars leaves untagged enums as a bare `anyOf`.
#[schemars(extend("type" = "object"))]
pub enum RawQueryOutput {
    Rows {
        /// Result rows as column-to-value objects
        rows: Vec<Map<String, Value>>,
        /// Number of rows returned
        count: usize,
    },
    Write {
        /// Number of rows affected by the statement
        affected: u64,
    },
}

pub struct RawToolHandler {
    executor: Arc<QueryExecutor>,
}

impl RawToolHandler {
    pub fn new(executor: Arc<QueryExecutor>) -> Self {
        Self { executor }
    }

    pub async fn execute_raw_query(&self, input: ExecuteRawQueryInput) -> DbResult<RawQueryOutput> {
        let plan = sql::build_raw(&input.query, &input.params, input.read_only)?;

        match self.executor.execute_raw(&plan).await? {
            RawQueryResult::Rows(rows) => {
                let count = rows.len();
                info!(rows = count, read_only = input.read_only, "Raw query executed");
                Ok(RawQueryOutput::Rows { rows, count })
            }
            RawQueryResult::Write { rows_affected } => {
                info!(
                    affected = rows_affected,
                    read_only = input.read_only,
                    "Raw statement executed"
                );
                Ok(RawQueryOutput::Write {
                    affected: rows_affected,
                })
            }
        }
    }
}
