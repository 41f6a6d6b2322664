//! Tool handlers.
//!
//! Each submodule owns a group of tools over the shared executor:
//! - `tables`: create_table, list_tables, describe_table
//! - `records`: insert_record, query_records, update_record, delete_record
//! - `raw`: execute_raw_query

pub mod raw;
pub mod records;
pub mod tables;

pub use raw::{ExecuteRawQueryInput, RawQueryOutput, RawToolHandler};
pub use records::{
    DeleteRecordInput, InsertRecordInput, MutationOutput, QueryRecordsInput, QueryRecordsOutput,
    RecordToolHandler, UpdateRecordInput,
};
pub use tables::{
    CreateTableInput, DescribeTableInput, DescribeTableOutput, ListTablesOutput, TableToolHandler,
};
