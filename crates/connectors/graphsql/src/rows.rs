//! The rows handed back to callers.

use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use query_engine_execution::query::QueryResult;

/// The result of a statement: column names in select-list order and one row per leaf
/// combination of the response.
#[derive(Debug, Clone, PartialEq)]
pub struct RowSet {
    pub columns: Vec<String>,
    pub rows: Vec<FlatRow>,
    /// Rows were dropped to stay within the configured row bound.
    pub truncated: bool,
}

impl RowSet {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl From<QueryResult> for RowSet {
    fn from(result: QueryResult) -> RowSet {
        let names: Arc<[String]> = Arc::from(result.columns.clone());
        RowSet {
            columns: result.columns,
            rows: result
                .rows
                .into_iter()
                .map(|values| FlatRow {
                    columns: names.clone(),
                    values,
                })
                .collect(),
            truncated: result.truncated,
        }
    }
}

/// One row: a value, or null, for every column, in column order.
///
/// Serializes as a JSON object keyed by column name.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatRow {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl FlatRow {
    /// The value of the first column called `column`.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|name| name == column)
            .map(|index| &self.values[index])
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }
}

impl Serialize for FlatRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}
