//! Check SQL literals against GraphQL argument types and convert them to variable values.
//!
//! Failures are returned as a reason, which the caller attaches to the predicate.

use query_engine_metadata::metadata::{TypeKind, TypeRef};
use query_engine_sql::sql::ast::{Literal, PredicateValue};
use serde_json::Value;

use crate::translation::helpers::Env;

/// The variable value for a predicate's right-hand side.
pub(crate) fn translate_value(
    env: Env<'_>,
    argument_type: &TypeRef,
    value: &PredicateValue,
) -> Result<Value, String> {
    match value {
        PredicateValue::Single(literal) => match argument_type.list_item() {
            // GraphQL coerces a single input value to a list of one
            Some(item) if *literal != Literal::Null => literal_value(env, item, literal),
            _ => literal_value(env, argument_type, literal),
        },
        PredicateValue::List(literals) => {
            let item = argument_type
                .list_item()
                .ok_or_else(|| format!("an argument of type {argument_type} does not take a list"))?;
            literals
                .iter()
                .map(|literal| literal_value(env, item, literal))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
    }
}

fn literal_value(env: Env<'_>, type_ref: &TypeRef, literal: &Literal) -> Result<Value, String> {
    if *literal == Literal::Null {
        return if type_ref.is_nullable() {
            Ok(Value::Null)
        } else {
            Err(format!("NULL is not accepted by the non-null type {type_ref}"))
        };
    }
    if type_ref.is_list() {
        return Err(format!("{literal} cannot be used as a value of type {type_ref}"));
    }

    let schema_type = env
        .lookup_named_type(type_ref)
        .map_err(|err| err.to_string())?;
    let mismatch = || format!("{literal} is not a valid {}", schema_type.name());

    match schema_type.kind() {
        TypeKind::Scalar => scalar_value(schema_type.name(), literal).ok_or_else(mismatch),
        TypeKind::Enum => match literal {
            Literal::String(value) if schema_type.enum_values().contains(value) => {
                Ok(Value::String(value.clone()))
            }
            Literal::String(value) => Err(format!(
                "'{value}' is not a value of the enum {}",
                schema_type.name()
            )),
            _ => Err(mismatch()),
        },
        kind => Err(format!(
            "arguments of {kind} type {} cannot be compared with a literal",
            schema_type.name()
        )),
    }
}

/// Built-in scalars accept only their own literals; custom scalars accept any.
fn scalar_value(scalar: &str, literal: &Literal) -> Option<Value> {
    match (scalar, literal) {
        ("Int", Literal::Integer(integer)) => i32::try_from(*integer).ok().map(Value::from),
        ("Float" | "ID", Literal::Integer(integer)) => Some(Value::from(*integer)),
        ("Float", Literal::Float(float)) => float_value(*float),
        ("String" | "ID", Literal::String(string)) => Some(Value::String(string.clone())),
        ("Boolean", Literal::Boolean(boolean)) => Some(Value::Bool(*boolean)),
        ("Int" | "Float" | "String" | "ID" | "Boolean", _) => None,
        (_, Literal::Integer(integer)) => Some(Value::from(*integer)),
        (_, Literal::Float(float)) => float_value(*float),
        (_, Literal::String(string)) => Some(Value::String(string.clone())),
        (_, Literal::Boolean(boolean)) => Some(Value::Bool(*boolean)),
        (_, Literal::Null) => Some(Value::Null),
    }
}

fn float_value(float: f64) -> Option<Value> {
    serde_json::Number::from_f64(float).map(Value::Number)
}
