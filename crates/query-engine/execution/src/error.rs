//! Errors for query execution.

use query_engine_metadata::metadata::IntrospectionError;
use thiserror::Error;

use crate::transport::TransportError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Introspection(#[from] IntrospectionError),
    #[error("the endpoint returned errors: {}", .0.join("; "))]
    GraphQLErrors(Vec<String>),
    #[error("the response carries neither 'data' nor 'errors'")]
    MissingData,
    #[error(
        "cannot pair the list '{field}' ({right} elements) with its sibling lists ({left} elements) under '{path}'"
    )]
    ShapeMismatch {
        path: String,
        field: String,
        left: usize,
        right: usize,
    },
    #[error("column '{0}' does not lead to a leaf of the selection shape")]
    ColumnNotInShape(String),
    #[error("expected an object at '{path}', found {found}")]
    UnexpectedValue { path: String, found: String },
}
