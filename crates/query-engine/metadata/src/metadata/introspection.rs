//! Build a [`SchemaModel`] out of the response to the standard introspection query.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;

use super::schema::{InputValue, SchemaField, SchemaModel, SchemaType, TypeKind, TypeRef};

/// The introspection query sent to the endpoint.
pub const INTROSPECTION_QUERY: &str = include_str!("introspection_query.graphql");

/// Failure to obtain a usable schema from an endpoint.
#[derive(Debug, Error)]
pub enum IntrospectionError {
    #[error("transport error during introspection: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("the endpoint rejected the introspection query: {}", .0.join("; "))]
    GraphQLErrors(Vec<String>),
    #[error("introspection response does not contain '__schema'")]
    MissingSchema,
    #[error("malformed introspection data: {0}")]
    Malformed(String),
    #[error("the schema does not declare a root query type")]
    MissingQueryType,
    #[error("root query type '{0}' is not an object type of the schema")]
    QueryTypeNotFound(String),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum RawKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    List,
    NonNull,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSchema {
    query_type: Option<RawNamedRef>,
    #[serde(default)]
    types: Vec<RawFullType>,
}

#[derive(Debug, Deserialize)]
struct RawNamedRef {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFullType {
    kind: RawKind,
    name: Option<String>,
    fields: Option<Vec<RawField>>,
    enum_values: Option<Vec<RawEnumValue>>,
    possible_types: Option<Vec<RawNamedRef>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawField {
    name: String,
    args: Option<Vec<RawInputValue>>,
    #[serde(rename = "type")]
    type_ref: RawTypeRef,
    is_deprecated: Option<bool>,
    deprecation_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawInputValue {
    name: String,
    #[serde(rename = "type")]
    type_ref: RawTypeRef,
    default_value: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTypeRef {
    kind: RawKind,
    name: Option<String>,
    of_type: Option<Box<RawTypeRef>>,
}

#[derive(Debug, Deserialize)]
struct RawEnumValue {
    name: String,
}

impl SchemaModel {
    /// Build the model from a complete introspection response, i.e. the JSON object
    /// holding `data.__schema` (a bare `{"__schema": ...}` object is accepted too).
    ///
    /// Optional metadata such as deprecation flags, argument lists or enum values may
    /// be absent.
    pub fn from_introspection_response(
        response: &serde_json::Value,
    ) -> Result<SchemaModel, IntrospectionError> {
        let schema_value = response
            .get("data")
            .and_then(|data| data.get("__schema"))
            .or_else(|| response.get("__schema"))
            .filter(|schema| !schema.is_null());

        let Some(schema_value) = schema_value else {
            let messages = graphql_error_messages(response);
            return Err(if messages.is_empty() {
                IntrospectionError::MissingSchema
            } else {
                IntrospectionError::GraphQLErrors(messages)
            });
        };

        let raw: RawSchema = serde_json::from_value(schema_value.clone())
            .map_err(|err| IntrospectionError::Malformed(err.to_string()))?;

        build_schema(raw)
    }
}

/// Collect the `message` of every entry of a GraphQL `errors` array.
pub fn graphql_error_messages(response: &serde_json::Value) -> Vec<String> {
    response
        .get("errors")
        .and_then(serde_json::Value::as_array)
        .map(|errors| {
            errors
                .iter()
                .map(|error| match error.get("message") {
                    Some(serde_json::Value::String(message)) => message.clone(),
                    _ => error.to_string(),
                })
                .collect()
        })
        .unwrap_or_default()
}

fn build_schema(raw: RawSchema) -> Result<SchemaModel, IntrospectionError> {
    let query_type = raw
        .query_type
        .and_then(|query_type| query_type.name)
        .ok_or(IntrospectionError::MissingQueryType)?;

    let mut types = BTreeMap::new();
    for raw_type in raw.types {
        let Some(name) = raw_type.name else {
            return Err(IntrospectionError::Malformed(
                "a type in '__schema.types' has no name".to_string(),
            ));
        };
        let schema_type = build_type(
            name.clone(),
            raw_type.kind,
            raw_type.fields,
            raw_type.enum_values,
            raw_type.possible_types,
        )?;
        if types.insert(name.clone(), schema_type).is_some() {
            return Err(IntrospectionError::Malformed(format!(
                "type '{name}' is declared more than once"
            )));
        }
    }

    match types.get(&query_type) {
        Some(schema_type) if schema_type.kind == TypeKind::Object => {}
        _ => return Err(IntrospectionError::QueryTypeNotFound(query_type)),
    }

    // every field and argument must point at a type we know about.
    for schema_type in types.values() {
        for field in schema_type.fields.values() {
            let target = field.r#type.named_type();
            if !types.contains_key(target) {
                return Err(IntrospectionError::Malformed(format!(
                    "field '{}.{}' refers to unknown type '{target}'",
                    schema_type.name, field.name
                )));
            }
            for argument in field.arguments.values() {
                let target = argument.r#type.named_type();
                if !types.contains_key(target) {
                    return Err(IntrospectionError::Malformed(format!(
                        "argument '{}' of '{}.{}' refers to unknown type '{target}'",
                        argument.name, schema_type.name, field.name
                    )));
                }
            }
        }
    }

    Ok(SchemaModel { query_type, types })
}

fn build_type(
    name: String,
    kind: RawKind,
    fields: Option<Vec<RawField>>,
    enum_values: Option<Vec<RawEnumValue>>,
    possible_types: Option<Vec<RawNamedRef>>,
) -> Result<SchemaType, IntrospectionError> {
    let kind = match kind {
        RawKind::Scalar => TypeKind::Scalar,
        RawKind::Object => TypeKind::Object,
        RawKind::Interface => TypeKind::Interface,
        RawKind::Union => TypeKind::Union,
        RawKind::Enum => TypeKind::Enum,
        RawKind::InputObject => TypeKind::InputObject,
        RawKind::List | RawKind::NonNull => {
            return Err(IntrospectionError::Malformed(format!(
                "named type '{name}' has a wrapper kind"
            )))
        }
    };

    let mut built_fields = IndexMap::new();
    for field in fields.unwrap_or_default() {
        let mut arguments = IndexMap::new();
        for argument in field.args.unwrap_or_default() {
            let input_value = InputValue {
                name: argument.name.clone(),
                r#type: build_type_ref(argument.type_ref)?,
                default_value: argument.default_value,
            };
            arguments.insert(argument.name, input_value);
        }
        let schema_field = SchemaField {
            name: field.name.clone(),
            r#type: build_type_ref(field.type_ref)?,
            arguments,
            is_deprecated: field.is_deprecated.unwrap_or(false),
            deprecation_reason: field.deprecation_reason,
        };
        built_fields.insert(field.name, schema_field);
    }

    Ok(SchemaType {
        name,
        kind,
        fields: built_fields,
        enum_values: enum_values
            .unwrap_or_default()
            .into_iter()
            .map(|value| value.name)
            .collect(),
        possible_types: possible_types
            .unwrap_or_default()
            .into_iter()
            .filter_map(|possible| possible.name)
            .collect(),
    })
}

fn build_type_ref(raw: RawTypeRef) -> Result<TypeRef, IntrospectionError> {
    match raw.kind {
        RawKind::List => {
            let inner = raw.of_type.ok_or_else(|| {
                IntrospectionError::Malformed("LIST type reference without 'ofType'".to_string())
            })?;
            Ok(TypeRef::List(Box::new(build_type_ref(*inner)?)))
        }
        RawKind::NonNull => {
            let inner = raw.of_type.ok_or_else(|| {
                IntrospectionError::Malformed(
                    "NON_NULL type reference without 'ofType'".to_string(),
                )
            })?;
            Ok(TypeRef::NonNull(Box::new(build_type_ref(*inner)?)))
        }
        _ => raw.name.map(TypeRef::Named).ok_or_else(|| {
            IntrospectionError::Malformed("named type reference without a name".to_string())
        }),
    }
}
