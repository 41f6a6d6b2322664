//! Safe SQL layer.
//!
//! This module owns everything between untrusted tool arguments and the
//! database driver:
//! - `validate`: identifier and scalar value validation
//! - `builder`: parameterized statement construction
//! - `readonly`: the best-effort read-only guard for raw statements

pub mod builder;
pub mod readonly;
pub mod validate;

pub use builder::{
    build_create_table, build_delete, build_describe_table, build_insert, build_list_tables,
    build_raw, build_select, build_update,
};
pub use readonly::{ensure_read_only, leading_keyword, returns_rows};
pub use validate::{
    MAX_IDENTIFIER_LEN, validate_identifier, validate_non_negative, validate_value,
};
