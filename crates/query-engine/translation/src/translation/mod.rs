//! Translate a parsed SQL statement into a GraphQL query against the introspected schema.

pub mod error;
pub mod helpers;
pub mod query;
