//! Database access layer.
//!
//! Pool construction, statement execution, and row decoding. Everything
//! that touches sqlx directly lives under this module.

pub mod executor;
pub mod pool;
pub mod rows;

pub use executor::QueryExecutor;
pub use pool::{create_pool, sqlite_version};
pub use rows::row_to_json;
