//! Type definitions of the GraphQL query document AST.
//!
//! Only the subset needed to express a translated SELECT is modelled: a single named
//! query operation with variable definitions, and fields with arguments.

use query_engine_metadata::metadata::TypeRef;

/// A query document holding one operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub operation: Operation,
}

/// A `query` operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub name: String,
    pub variable_definitions: Vec<VariableDefinition>,
    pub selection_set: SelectionSet,
}

/// `$name: Type`
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDefinition {
    pub name: String,
    pub r#type: TypeRef,
}

/// The fields selected on an object, in output order. Empty for a leaf field.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectionSet(pub Vec<Field>);

impl SelectionSet {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub arguments: Vec<Argument>,
    pub selection_set: SelectionSet,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub name: String,
    pub value: Value,
}

/// An argument value. Predicate values always travel as variables; only the row limit
/// is written inline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Variable(String),
    Int(u64),
}
