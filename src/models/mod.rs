//! Shared data types: scalar values, query plans, table metadata, and
//! execution results.

pub mod plan;
pub mod result;
pub mod table;
pub mod value;

pub use plan::QueryPlan;
pub use result::{ExecuteResult, RawQueryResult};
pub use table::{ColumnType, TableColumn};
pub use value::ScalarValue;
