//! Metadata information regarding the GraphQL schema we translate against.

pub mod introspection;
pub mod schema;

// re-export without modules
pub use introspection::{IntrospectionError, INTROSPECTION_QUERY};
pub use schema::*;
