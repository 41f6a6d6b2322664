//! SQLite MCP server.
//!
//! Exposes one SQLite database to MCP clients as a set of CRUD tools,
//! served over stdio or streamable HTTP.

pub mod config;
pub mod db;
pub mod error;
pub mod mcp;
pub mod models;
pub mod sql;
pub mod tools;
pub mod transport;

pub use config::Config;
pub use error::{DbError, DbResult};
pub use mcp::SqliteService;
