//! Running a compiled query against a GraphQL endpoint and turning the response into rows.

pub mod error;
pub mod flatten;
pub mod introspection;
pub mod metrics;
pub mod ordering;
pub mod query;
pub mod transport;
