//! Parsing of the SQL dialect accepted by the engine.
//!
//! Only single-table `SELECT` statements are understood. Constructs outside that
//! subset are reported as [`error::Error::UnsupportedFeature`] rather than as syntax
//! errors, naming the construct.

pub mod ast;
pub mod error;
pub mod helpers;
pub mod lexer;
pub mod parser;

pub use parser::parse;
