//! The output of translation: everything needed to execute a statement and turn the
//! response into rows.

use std::collections::BTreeMap;

use query_engine_sql::sql::ast::OrderDirection;

use super::ast::Document;
use super::path::ResolvedPath;
use super::shape::SelectionShape;

/// One output column: its name and the path its values are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputColumn {
    pub name: String,
    pub path: ResolvedPath,
}

/// Sort the flattened rows by the column at `column`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderingKey {
    pub column: usize,
    pub direction: OrderDirection,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    /// The root field of the query type the statement's table maps to.
    pub root_field: String,
    pub document: Document,
    /// `document` as text, ready to send.
    pub query: String,
    pub variables: BTreeMap<String, serde_json::Value>,
    pub shape: SelectionShape,
    /// Output columns in select-list order.
    pub columns: Vec<OutputColumn>,
    /// The statement's LIMIT, always enforced on the flattened rows.
    pub row_limit: Option<u64>,
    /// The LIMIT was also passed to the root field as an argument.
    pub limit_pushed_down: bool,
    pub order_by: Vec<OrderingKey>,
}

impl CompiledQuery {
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|column| column.name.clone()).collect()
    }

    /// The variables as the JSON object sent next to the document.
    pub fn variables_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.variables
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
        )
    }
}
