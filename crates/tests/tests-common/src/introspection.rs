//! Builders for introspection payloads, shaped like the response to the standard
//! introspection query.

use serde_json::{json, Value};

/// A reference to a named type of the given kind.
pub fn named(kind: &str, name: &str) -> Value {
    json!({ "kind": kind, "name": name, "ofType": null })
}

pub fn scalar_ref(name: &str) -> Value {
    named("SCALAR", name)
}

pub fn object_ref(name: &str) -> Value {
    named("OBJECT", name)
}

pub fn enum_ref(name: &str) -> Value {
    named("ENUM", name)
}

pub fn non_null(inner: Value) -> Value {
    json!({ "kind": "NON_NULL", "name": null, "ofType": inner })
}

pub fn list(inner: Value) -> Value {
    json!({ "kind": "LIST", "name": null, "ofType": inner })
}

pub fn argument(name: &str, type_ref: Value) -> Value {
    json!({ "name": name, "type": type_ref, "defaultValue": null })
}

pub fn field(name: &str, type_ref: Value) -> Value {
    field_with_arguments(name, type_ref, vec![])
}

pub fn field_with_arguments(name: &str, type_ref: Value, arguments: Vec<Value>) -> Value {
    json!({
        "name": name,
        "args": arguments,
        "type": type_ref,
        "isDeprecated": false,
        "deprecationReason": null
    })
}

pub fn object(name: &str, fields: Vec<Value>) -> Value {
    json!({ "kind": "OBJECT", "name": name, "fields": fields })
}

pub fn interface(name: &str, fields: Vec<Value>, possible_types: &[&str]) -> Value {
    let possible_types: Vec<Value> = possible_types
        .iter()
        .map(|possible| object_ref(possible))
        .collect();
    json!({
        "kind": "INTERFACE",
        "name": name,
        "fields": fields,
        "possibleTypes": possible_types
    })
}

pub fn scalar(name: &str) -> Value {
    json!({ "kind": "SCALAR", "name": name, "fields": null })
}

pub fn enumeration(name: &str, values: &[&str]) -> Value {
    let values: Vec<Value> = values
        .iter()
        .map(|value| json!({ "name": value, "isDeprecated": false, "deprecationReason": null }))
        .collect();
    json!({ "kind": "ENUM", "name": name, "fields": null, "enumValues": values })
}

pub fn input_object(name: &str) -> Value {
    json!({ "kind": "INPUT_OBJECT", "name": name, "fields": null })
}

/// The five scalars every schema declares.
pub fn builtin_scalars() -> Vec<Value> {
    ["Boolean", "Float", "ID", "Int", "String"]
        .into_iter()
        .map(scalar)
        .collect()
}

/// A full `{"data": {"__schema": ...}}` response.
pub fn response(query_type: &str, types: Vec<Value>) -> Value {
    json!({
        "data": {
            "__schema": {
                "queryType": { "name": query_type },
                "mutationType": null,
                "subscriptionType": null,
                "types": types,
                "directives": []
            }
        }
    })
}
