//! Errors for query translation.

use thiserror::Error;

/// A type for translation errors.
///
/// Translation is all-or-nothing: any of these means no query is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("unknown table '{0}': the query type has no such field")]
    UnknownTable(String),
    #[error("unknown field '{segment}' in column '{path}'")]
    UnknownField { path: String, segment: String },
    #[error("column '{path}' is of object type '{type_name}'; select one of its fields instead")]
    NotLeaf { path: String, type_name: String },
    #[error("unsupported predicate on '{column}' at position {position}: {reason}")]
    UnsupportedPredicate {
        column: String,
        position: usize,
        reason: String,
    },
    #[error("field '{segment}' in column '{path}' is a list of lists, which cannot be flattened")]
    NestedListsNotSupported { path: String, segment: String },
    #[error("column '{start}...' descends through {depth} fields; at most {limit} are supported")]
    PathTooDeep {
        start: String,
        depth: usize,
        limit: usize,
    },
    #[error("table '{table}' has no scalar fields to select with *")]
    EmptySelection { table: String },
    #[error("field '{field}' requires the argument '{argument}', which the statement does not supply")]
    MissingArgument { field: String, argument: String },
    #[error("unsupported SQL feature: {0}")]
    UnsupportedFeature(String),
    #[error("the schema refers to the unknown type '{0}'")]
    TypeNotFound(String),
}
