//! Execute a compiled query and produce its rows.

use query_engine_graphql::graphql::query::CompiledQuery;
use query_engine_metadata::metadata::introspection::graphql_error_messages;
use serde_json::Value;
use tracing::{info_span, Instrument};

use crate::error::Error;
use crate::flatten::{flatten, Row};
use crate::ordering::{limit_rows, sort_rows};
use crate::transport::Transport;

/// The rows of an executed query, with their column names.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
    /// The flattener hit its row bound, so rows may be missing.
    pub truncated: bool,
}

/// Send `compiled` to `endpoint`, flatten the response, then apply ORDER BY and LIMIT.
pub async fn execute(
    transport: &dyn Transport,
    endpoint: &str,
    compiled: &CompiledQuery,
    max_rows: usize,
) -> Result<QueryResult, Error> {
    let response = transport
        .execute(endpoint, &compiled.query, &compiled.variables_json())
        .instrument(info_span!("Execute GraphQL query", root_field = %compiled.root_field))
        .await?;

    let data = response_data(&response)?;

    let flattened = info_span!("Flatten response")
        .in_scope(|| flatten(data, &compiled.shape, &compiled.columns, max_rows))?;

    let mut rows = flattened.rows;
    sort_rows(&mut rows, &compiled.order_by);
    limit_rows(&mut rows, compiled.row_limit);

    Ok(QueryResult {
        columns: compiled.column_names(),
        rows,
        truncated: flattened.truncated,
    })
}

/// The `data` object of a response. Errors next to data are logged and otherwise
/// ignored; errors without data fail the query.
fn response_data(response: &Value) -> Result<&Value, Error> {
    let messages = graphql_error_messages(response);
    match response.get("data") {
        Some(data) if !data.is_null() => {
            if !messages.is_empty() {
                tracing::warn!(errors = ?messages, "partial GraphQL response");
            }
            Ok(data)
        }
        _ if messages.is_empty() => Err(Error::MissingData),
        _ => Err(Error::GraphQLErrors(messages)),
    }
}
