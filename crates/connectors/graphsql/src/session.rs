//! A session against one GraphQL endpoint.
//!
//! The schema is introspected on first use and cached for the life of the session;
//! only [`Session::refresh_schema`] fetches it again.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info_span, Instrument};

use graphsql_configuration::values::FlatteningSettings;
use graphsql_configuration::Configuration;
use query_engine_execution::introspection::introspect;
use query_engine_execution::metrics::Metrics;
use query_engine_execution::query::execute;
use query_engine_execution::transport::Transport;
use query_engine_metadata::metadata::SchemaModel;
use query_engine_sql::sql::ast::SqlStatement;
use query_engine_sql::sql::parse;
use query_engine_translation::translation;

use crate::error::Error;
use crate::rows::RowSet;
use crate::transport::HttpTransport;

/// A parsed statement, ready to run any number of times.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedStatement {
    sql: String,
    statement: SqlStatement,
}

impl PreparedStatement {
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn statement(&self) -> &SqlStatement {
        &self.statement
    }
}

pub struct Session {
    endpoint: String,
    transport: Arc<dyn Transport>,
    settings: FlatteningSettings,
    metrics: Metrics,
    schema: RwLock<Option<Arc<SchemaModel>>>,
}

impl Session {
    pub fn new(
        endpoint: impl Into<String>,
        transport: Arc<dyn Transport>,
        settings: FlatteningSettings,
        metrics: Metrics,
    ) -> Session {
        Session {
            endpoint: endpoint.into(),
            transport,
            settings,
            metrics,
            schema: RwLock::new(None),
        }
    }

    /// Set up metrics and an HTTP transport for a runtime configuration.
    pub fn from_configuration(
        configuration: &Configuration,
        metrics_registry: &mut prometheus::Registry,
    ) -> Result<Session, Error> {
        let metrics = info_span!("Setup metrics").in_scope(|| Metrics::initialize(metrics_registry))?;
        let transport = HttpTransport::new(&configuration.headers)?;
        Ok(Session::new(
            configuration.endpoint.as_str(),
            Arc::new(transport),
            FlatteningSettings {
                max_rows: configuration.max_rows,
            },
            metrics,
        ))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Parse `sql`. Nothing is sent to the endpoint.
    pub fn prepare(&self, sql: &str) -> Result<PreparedStatement, Error> {
        let statement = parse(sql).map_err(|err| {
            self.metrics.record_failed_query();
            err
        })?;
        Ok(PreparedStatement {
            sql: sql.to_string(),
            statement,
        })
    }

    /// Translate and execute a prepared statement.
    pub async fn run(&self, prepared: &PreparedStatement) -> Result<RowSet, Error> {
        let result = async {
            let schema = self.schema().await?;
            let compiled = translation::query::translate(&schema, prepared.statement())?;
            let result = execute(
                self.transport.as_ref(),
                &self.endpoint,
                &compiled,
                self.settings.max_rows,
            )
            .await?;
            Ok::<_, Error>(RowSet::from(result))
        }
        .instrument(info_span!("Run statement", sql = prepared.sql()))
        .await;

        match &result {
            Ok(rows) => self.metrics.record_successful_query(rows.len(), rows.truncated),
            Err(err) => {
                self.metrics.record_failed_query();
                tracing::error!(error = %err, sql = prepared.sql(), "statement failed");
            }
        }
        result
    }

    /// Prepare and run `sql`.
    pub async fn execute(&self, sql: &str) -> Result<RowSet, Error> {
        let prepared = self.prepare(sql)?;
        self.run(&prepared).await
    }

    /// The endpoint's schema, introspected on first call.
    pub async fn schema(&self) -> Result<Arc<SchemaModel>, Error> {
        if let Some(schema) = self.schema.read().await.as_ref() {
            return Ok(schema.clone());
        }

        let mut cached = self.schema.write().await;
        // another task may have introspected while we waited for the lock
        if let Some(schema) = cached.as_ref() {
            return Ok(schema.clone());
        }
        let schema = Arc::new(introspect(self.transport.as_ref(), &self.endpoint, &self.metrics).await?);
        *cached = Some(schema.clone());
        Ok(schema)
    }

    /// Introspect again and replace the cached schema. On failure the previous schema
    /// stays in place.
    pub async fn refresh_schema(&self) -> Result<Arc<SchemaModel>, Error> {
        let mut cached = self.schema.write().await;
        let schema = Arc::new(introspect(self.transport.as_ref(), &self.endpoint, &self.metrics).await?);
        *cached = Some(schema.clone());
        Ok(schema)
    }
}
