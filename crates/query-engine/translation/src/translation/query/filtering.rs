//! Handle WHERE clause translation: every predicate becomes an argument of the root field.
//!
//! A predicate on column `c` maps onto an argument named after `c` and the operator:
//!
//! | operator   | arguments tried                   |
//! |------------|-----------------------------------|
//! | `=`        | `c`                               |
//! | `<>`       | `c_not`, `c_ne`, `c_neq`          |
//! | `<`        | `c_lt`, `c_lesser`                |
//! | `<=`       | `c_lte`                           |
//! | `>`        | `c_gt`, `c_greater`               |
//! | `>=`       | `c_gte`                           |
//! | `IN (...)` | `c_in`, then `c`; both list-typed |
//!
//! There is no client-side filtering: a predicate without a matching argument fails.

use query_engine_metadata::metadata::{InputValue, SchemaField, TypeRef};
use query_engine_sql::sql::ast::{ComparisonOperator, Predicate};

use super::fields::resolve_path;
use super::values::translate_value;
use crate::translation::error::Error;
use crate::translation::helpers::Env;

/// A predicate bound to a root field argument, passed as the variable of the same name.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ArgumentBinding {
    pub argument: String,
    pub r#type: TypeRef,
    pub value: serde_json::Value,
}

pub(crate) fn translate_predicates(
    env: Env<'_>,
    root_field: &SchemaField,
    predicates: &[Predicate],
) -> Result<Vec<ArgumentBinding>, Error> {
    let mut bindings: Vec<ArgumentBinding> = Vec::with_capacity(predicates.len());
    for predicate in predicates {
        let binding = translate_predicate(env, root_field, predicate)?;
        if bindings
            .iter()
            .any(|bound| bound.argument == binding.argument)
        {
            return Err(unsupported(
                predicate,
                format!(
                    "argument '{}' is already set by another predicate",
                    binding.argument
                ),
            ));
        }
        bindings.push(binding);
    }
    Ok(bindings)
}

fn translate_predicate(
    env: Env<'_>,
    root_field: &SchemaField,
    predicate: &Predicate,
) -> Result<ArgumentBinding, Error> {
    if predicate.column.is_nested() {
        // a misspelt path is reported as such before the predicate itself is refused
        resolve_path(env, root_field, &predicate.column)?;
        return Err(unsupported(
            predicate,
            "nested columns cannot be mapped to arguments of the root field".to_string(),
        ));
    }

    let column = predicate.column.first();
    let argument = find_argument(root_field, column, predicate.operator).ok_or_else(|| {
        unsupported(
            predicate,
            format!(
                "'{}' has no argument for {column} {}",
                root_field.name(),
                predicate.operator
            ),
        )
    })?;

    let value = translate_value(env, argument.r#type(), &predicate.value)
        .map_err(|reason| unsupported(predicate, reason))?;

    Ok(ArgumentBinding {
        argument: argument.name().to_string(),
        r#type: argument.r#type().clone(),
        value,
    })
}

fn find_argument<'a>(
    root_field: &'a SchemaField,
    column: &str,
    operator: ComparisonOperator,
) -> Option<&'a InputValue> {
    let suffixes: &[&str] = match operator {
        ComparisonOperator::Equals => &[""],
        ComparisonOperator::NotEquals => &["_not", "_ne", "_neq"],
        ComparisonOperator::LessThan => &["_lt", "_lesser"],
        ComparisonOperator::LessThanOrEqualTo => &["_lte"],
        ComparisonOperator::GreaterThan => &["_gt", "_greater"],
        ComparisonOperator::GreaterThanOrEqualTo => &["_gte"],
        ComparisonOperator::In => &["_in", ""],
    };
    suffixes
        .iter()
        .filter_map(|suffix| root_field.argument(&format!("{column}{suffix}")))
        .find(|argument| operator != ComparisonOperator::In || argument.r#type().is_list())
}

fn unsupported(predicate: &Predicate, reason: String) -> Error {
    Error::UnsupportedPredicate {
        column: predicate.column.to_string(),
        position: predicate.position,
        reason,
    }
}
