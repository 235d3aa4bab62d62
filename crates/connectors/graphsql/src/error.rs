//! Everything that can go wrong while running a statement.

use thiserror::Error;

use graphsql_configuration::error::MakeRuntimeConfigurationError;
use query_engine_metadata::metadata::IntrospectionError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Sql(#[from] query_engine_sql::sql::error::Error),
    #[error(transparent)]
    Translation(#[from] query_engine_translation::translation::error::Error),
    #[error(transparent)]
    Execution(#[from] query_engine_execution::error::Error),
    #[error(transparent)]
    Introspection(#[from] IntrospectionError),
    #[error(transparent)]
    Configuration(#[from] MakeRuntimeConfigurationError),
    #[error("invalid header '{name}': {message}")]
    InvalidHeader { name: String, message: String },
    #[error("unable to create the HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    #[error("error initializing metrics: {0}")]
    Metrics(#[from] prometheus::Error),
}
