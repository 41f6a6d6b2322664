//! Scalar values crossing the tool boundary.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A scalar value used for filters, record payloads, and bound parameters.
///
/// Deserializes untagged, so plain JSON scalars map directly: `null`, `true`,
/// `42`, `3.14`, `"text"`. Arrays and nested objects never become a
/// `ScalarValue`; they are rejected at validation time before any SQL is
/// built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ScalarValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl ScalarValue {
    /// Human-readable kind name, used in validation error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
        }
    }
}

impl From<ScalarValue> for serde_json::Value {
    fn from(value: ScalarValue) -> Self {
        match value {
            ScalarValue::Null => serde_json::Value::Null,
            ScalarValue::Bool(b) => serde_json::Value::Bool(b),
            ScalarValue::Int(i) => serde_json::Value::from(i),
            ScalarValue::Float(f) => serde_json::Value::from(f),
            ScalarValue::Text(s) => serde_json::Value::String(s),
        }
    }
}
