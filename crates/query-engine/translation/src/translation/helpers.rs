//! Helpers for looking things up in the schema while translating.

use query_engine_metadata::metadata::{SchemaField, SchemaModel, SchemaType, TypeRef};

use super::error::Error;

/// Static information from the schema, shared by every step of a translation.
#[derive(Debug, Clone, Copy)]
pub struct Env<'a> {
    schema: &'a SchemaModel,
}

impl<'a> Env<'a> {
    pub fn new(schema: &'a SchemaModel) -> Env<'a> {
        Env { schema }
    }

    pub fn schema(&self) -> &'a SchemaModel {
        self.schema
    }

    /// The root field a SQL table name maps to. Names are matched case-sensitively.
    pub fn lookup_root_field(&self, table: &str) -> Result<&'a SchemaField, Error> {
        self.schema
            .root_field(table)
            .ok_or_else(|| Error::UnknownTable(table.to_string()))
    }

    pub fn lookup_type(&self, name: &str) -> Result<&'a SchemaType, Error> {
        self.schema
            .get_type(name)
            .ok_or_else(|| Error::TypeNotFound(name.to_string()))
    }

    /// The named type behind a possibly wrapped type reference.
    pub fn lookup_named_type(&self, type_ref: &TypeRef) -> Result<&'a SchemaType, Error> {
        self.lookup_type(type_ref.named_type())
    }
}

/// Arguments of `field` which must be given a value: non-null and without a default.
pub fn required_arguments(field: &SchemaField) -> impl Iterator<Item = &str> {
    field
        .arguments()
        .values()
        .filter(|argument| !argument.r#type().is_nullable() && argument.default_value().is_none())
        .map(|argument| argument.name())
}
