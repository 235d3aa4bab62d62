//! Run SQL SELECT statements against a GraphQL endpoint.
//!
//! A [`session::Session`] parses a statement, resolves it against the endpoint's
//! introspected schema, sends one GraphQL query and flattens the response into rows.

pub mod error;
pub mod rows;
pub mod session;
pub mod transport;

pub use error::Error;
pub use rows::{FlatRow, RowSet};
pub use session::{PreparedStatement, Session};
