//! Handle ORDER BY translation.
//!
//! GraphQL has no generic ordering, so ORDER BY is applied to the flattened rows and
//! may only name columns that are selected.

use query_engine_graphql::graphql::query::{OrderingKey, OutputColumn};
use query_engine_sql::sql::ast::OrderByElement;

use crate::translation::error::Error;

/// Point every ORDER BY element at a selected column, by output name first (which
/// covers aliases) and by path second.
pub(crate) fn translate_order_by(
    order_by: &[OrderByElement],
    columns: &[OutputColumn],
) -> Result<Vec<OrderingKey>, Error> {
    order_by
        .iter()
        .map(|element| {
            let name = element.column.to_string();
            columns
                .iter()
                .position(|column| column.name == name)
                .or_else(|| {
                    columns
                        .iter()
                        .position(|column| *column.path.path() == element.column)
                })
                .map(|column| OrderingKey {
                    column,
                    direction: element.direction,
                })
                .ok_or_else(|| {
                    Error::UnsupportedFeature(format!("ORDER BY on an unselected column '{name}'"))
                })
        })
        .collect()
}
