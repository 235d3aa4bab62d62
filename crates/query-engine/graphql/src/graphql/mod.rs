//! The GraphQL side of a translation: the query document, the selection shape used to
//! flatten the response, and the resolved column paths tying the two together.

pub mod ast;
pub mod convert;
pub mod path;
pub mod query;
pub mod shape;
pub mod string;
