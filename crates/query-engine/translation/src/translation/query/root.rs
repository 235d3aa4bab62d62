//! Handle the root field a statement's table maps to, and its arguments.

use query_engine_graphql::graphql::ast::Argument;
use query_engine_metadata::metadata::{InputValue, SchemaField, SchemaType};

use super::filtering::ArgumentBinding;
use crate::translation::error::Error;
use crate::translation::helpers::{required_arguments, Env};

/// Argument names a LIMIT may be passed through, in order of preference.
const LIMIT_ARGUMENTS: [&str; 3] = ["first", "limit", "perPage"];

/// The root field of the query type named by the statement's table.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Root<'a> {
    pub field: &'a SchemaField,
    /// The unwrapped return type of `field`.
    pub return_type: &'a SchemaType,
}

pub(crate) fn lookup_root<'a>(env: Env<'a>, table: &str) -> Result<Root<'a>, Error> {
    let field = env.lookup_root_field(table)?;
    if field.r#type().list_depth() > 1 {
        return Err(Error::NestedListsNotSupported {
            path: table.to_string(),
            segment: table.to_string(),
        });
    }
    let return_type = env.lookup_named_type(field.r#type())?;
    Ok(Root { field, return_type })
}

/// The argument to pass a LIMIT through: the first of [`LIMIT_ARGUMENTS`] the root
/// field declares with type `Int` which no predicate is bound to already.
pub(crate) fn limit_argument<'a>(
    root_field: &'a SchemaField,
    bindings: &[ArgumentBinding],
) -> Option<&'a str> {
    LIMIT_ARGUMENTS
        .iter()
        .filter_map(|name| root_field.argument(name))
        .find(|argument| {
            !argument.r#type().is_list()
                && argument.r#type().named_type() == "Int"
                && !bindings
                    .iter()
                    .any(|binding| binding.argument == argument.name())
        })
        .map(InputValue::name)
}

/// Fail unless every required argument of the root field is supplied.
pub(crate) fn check_required_arguments(
    root_field: &SchemaField,
    arguments: &[Argument],
) -> Result<(), Error> {
    for required in required_arguments(root_field) {
        if !arguments.iter().any(|argument| argument.name == required) {
            return Err(Error::MissingArgument {
                field: root_field.name().to_string(),
                argument: required.to_string(),
            });
        }
    }
    Ok(())
}
