use serde::{Deserialize, Serialize};

/// One flattened result row: column name to value.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Result of a parameterized query.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryPage {
    pub rows: Vec<Row>,
    /// Rows matching the filter, ignoring pagination.
    pub total: u64,
    /// Requested select/search names that are not schema fields, as
    /// `table.field`. Non-empty means the request was narrowed before running.
    #[serde(default)]
    pub ignored_fields: Vec<String>,
}
