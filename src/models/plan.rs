//! Built statement representation.

use crate::models::ScalarValue;

/// A parameterized SQL statement template plus its ordered bound values.
///
/// Templates use positional `?` placeholders; the number of placeholders
/// always equals `params.len()`. Only identifiers that passed validation are
/// ever concatenated into the template — user-supplied values travel
/// exclusively through `params`.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    pub sql: String,
    pub params: Vec<ScalarValue>,
}

impl QueryPlan {
    /// Create a plan with no bound values.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Create a plan with bound values.
    pub fn with_params(sql: impl Into<String>, params: Vec<ScalarValue>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// Count positional placeholders in the template.
    ///
    /// Builder-generated templates never contain `?` inside literals, so a
    /// byte scan is exact for them.
    pub fn placeholder_count(&self) -> usize {
        self.sql.bytes().filter(|&b| b == b'?').count()
    }
}
