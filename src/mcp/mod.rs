//! rmcp service wiring.
//!
//! Binds the tool handlers to the MCP wire protocol: tool registration,
//! schema generation, and error mapping all live here.

pub mod service;

pub use service::SqliteService;
