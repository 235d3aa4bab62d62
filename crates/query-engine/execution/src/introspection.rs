//! Fetch the schema model of an endpoint.

use query_engine_metadata::metadata::{IntrospectionError, SchemaModel, INTROSPECTION_QUERY};
use tracing::{info_span, Instrument};

use crate::metrics::Metrics;
use crate::transport::Transport;

/// Send the introspection query to `endpoint` and build a schema model from the answer.
pub async fn introspect(
    transport: &dyn Transport,
    endpoint: &str,
    metrics: &Metrics,
) -> Result<SchemaModel, IntrospectionError> {
    let response = transport
        .execute(endpoint, INTROSPECTION_QUERY, &serde_json::json!({}))
        .instrument(info_span!("Introspect schema", endpoint))
        .await
        .map_err(|err| IntrospectionError::Transport(err.into_inner()))?;

    let schema = SchemaModel::from_introspection_response(&response)?;
    metrics.introspection_total.inc();
    tracing::info!(
        query_type = schema.query_type_name(),
        types = schema.types().count(),
        "introspected schema"
    );
    Ok(schema)
}
