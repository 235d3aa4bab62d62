//! The in-memory GraphQL schema model.
//!
//! A `SchemaModel` is only ever built from an introspection payload (see
//! [`super::introspection`]) and exposes read accessors only, so a single instance
//! can be shared between concurrent queries behind an `Arc`.

use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

/// The kind of a named type.
///
/// The `LIST` and `NON_NULL` kinds of the introspection system are wrappers and live
/// in [`TypeRef`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
}

impl TypeKind {
    /// Scalars and enums terminate a selection.
    pub fn is_leaf(self) -> bool {
        matches!(self, TypeKind::Scalar | TypeKind::Enum)
    }

    /// Objects and interfaces declare fields which can be selected.
    pub fn has_fields(self) -> bool {
        matches!(self, TypeKind::Object | TypeKind::Interface)
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeKind::Scalar => "SCALAR",
            TypeKind::Object => "OBJECT",
            TypeKind::Interface => "INTERFACE",
            TypeKind::Union => "UNION",
            TypeKind::Enum => "ENUM",
            TypeKind::InputObject => "INPUT_OBJECT",
        };
        write!(f, "{name}")
    }
}

/// A reference to a named type, possibly wrapped in `LIST` and `NON_NULL` modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    /// The name of the innermost named type, with every wrapper removed.
    pub fn named_type(&self) -> &str {
        let mut current = self;
        loop {
            match current {
                TypeRef::Named(name) => return name,
                TypeRef::List(inner) | TypeRef::NonNull(inner) => current = inner,
            }
        }
    }

    /// Whether a value of this type may be null at this level.
    pub fn is_nullable(&self) -> bool {
        !matches!(self, TypeRef::NonNull(_))
    }

    /// How many `LIST` wrappers surround the named type.
    pub fn list_depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self;
        loop {
            match current {
                TypeRef::Named(_) => return depth,
                TypeRef::List(inner) => {
                    depth += 1;
                    current = inner;
                }
                TypeRef::NonNull(inner) => current = inner,
            }
        }
    }

    pub fn is_list(&self) -> bool {
        self.list_depth() > 0
    }

    /// The element type when this is a (possibly non-null) list.
    pub fn list_item(&self) -> Option<&TypeRef> {
        match self {
            TypeRef::List(inner) => Some(inner),
            TypeRef::NonNull(inner) => inner.list_item(),
            TypeRef::Named(_) => None,
        }
    }
}

/// Renders the type the way it is written in GraphQL documents, e.g. `[Int!]!`.
impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => write!(f, "{name}"),
            TypeRef::List(inner) => write!(f, "[{inner}]"),
            TypeRef::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

/// An argument of a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputValue {
    pub(crate) name: String,
    pub(crate) r#type: TypeRef,
    pub(crate) default_value: Option<String>,
}

impl InputValue {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn r#type(&self) -> &TypeRef {
        &self.r#type
    }

    /// The default value as GraphQL source text, if the schema declares one.
    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }
}

/// A field of an object or interface type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaField {
    pub(crate) name: String,
    pub(crate) r#type: TypeRef,
    pub(crate) arguments: IndexMap<String, InputValue>,
    pub(crate) is_deprecated: bool,
    pub(crate) deprecation_reason: Option<String>,
}

impl SchemaField {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared return type, wrappers included.
    pub fn r#type(&self) -> &TypeRef {
        &self.r#type
    }

    pub fn arguments(&self) -> &IndexMap<String, InputValue> {
        &self.arguments
    }

    pub fn argument(&self, name: &str) -> Option<&InputValue> {
        self.arguments.get(name)
    }

    pub fn is_deprecated(&self) -> bool {
        self.is_deprecated
    }

    pub fn deprecation_reason(&self) -> Option<&str> {
        self.deprecation_reason.as_deref()
    }
}

/// A named type of the schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaType {
    pub(crate) name: String,
    pub(crate) kind: TypeKind,
    pub(crate) fields: IndexMap<String, SchemaField>,
    pub(crate) enum_values: Vec<String>,
    pub(crate) possible_types: Vec<String>,
}

impl SchemaType {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Fields in schema declaration order.
    pub fn fields(&self) -> &IndexMap<String, SchemaField> {
        &self.fields
    }

    /// Look a field up by its exact (case-sensitive) name.
    pub fn field(&self, name: &str) -> Option<&SchemaField> {
        self.fields.get(name)
    }

    pub fn enum_values(&self) -> &[String] {
        &self.enum_values
    }

    pub fn possible_types(&self) -> &[String] {
        &self.possible_types
    }
}

/// The complete schema: the query root type plus every named type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaModel {
    pub(crate) query_type: String,
    pub(crate) types: BTreeMap<String, SchemaType>,
}

impl SchemaModel {
    pub fn query_type_name(&self) -> &str {
        &self.query_type
    }

    /// The root query type. Its presence is checked when the model is built.
    pub fn query_type(&self) -> &SchemaType {
        &self.types[&self.query_type]
    }

    pub fn get_type(&self, name: &str) -> Option<&SchemaType> {
        self.types.get(name)
    }

    /// A field declared directly on the query root type.
    pub fn root_field(&self, name: &str) -> Option<&SchemaField> {
        self.query_type().field(name)
    }

    pub fn types(&self) -> impl Iterator<Item = &SchemaType> {
        self.types.values()
    }
}
