//! Client-side ORDER BY and LIMIT over flattened rows.

use std::cmp::Ordering;

use query_engine_graphql::graphql::query::OrderingKey;
use query_engine_sql::sql::ast::OrderDirection;
use serde_json::Value;

use crate::flatten::Row;

/// Stable sort by `keys`, in order of precedence. Nulls sort first ascending and
/// last descending.
pub fn sort_rows(rows: &mut [Row], keys: &[OrderingKey]) {
    if keys.is_empty() {
        return;
    }
    rows.sort_by(|a, b| {
        keys.iter()
            .map(|key| {
                let ordering = compare_values(&a[key.column], &b[key.column]);
                match key.direction {
                    OrderDirection::Asc => ordering,
                    OrderDirection::Desc => ordering.reverse(),
                }
            })
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });
}

/// Keep the first `limit` rows.
pub fn limit_rows(rows: &mut Vec<Row>, limit: Option<u64>) {
    if let Some(limit) = limit {
        rows.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
    }
}

/// A total order over JSON values: null, booleans, numbers, strings, then lists and
/// objects by their serialized text.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => a
                .as_f64()
                .unwrap_or(f64::NAN)
                .total_cmp(&b.as_f64().unwrap_or(f64::NAN)),
        },
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Array(_) | Value::Object(_), Value::Array(_) | Value::Object(_))
            if rank(a) == rank(b) =>
        {
            a.to_string().cmp(&b.to_string())
        }
        _ => rank(a).cmp(&rank(b)),
    }
}

fn rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}
