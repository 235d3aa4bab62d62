//! Column paths resolved against the schema.

use query_engine_metadata::metadata::{SchemaField, TypeKind};
use query_engine_sql::sql::ast::ColumnPath;

/// One segment of a resolved path: the field it names and how the field's value is
/// wrapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSegment {
    pub field: SchemaField,
    /// The field returns a list; each element becomes its own row.
    pub is_list: bool,
    pub is_nullable: bool,
}

impl ResolvedSegment {
    pub fn name(&self) -> &str {
        self.field.name()
    }

    pub fn named_type(&self) -> &str {
        self.field.r#type().named_type()
    }
}

/// A column path whose every segment was found in the schema and whose final segment
/// is a scalar or enum.
///
/// The compiler builds the selection shape from these and the flattener walks the
/// response with the very same values, so the two cannot disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    path: ColumnPath,
    segments: Vec<ResolvedSegment>,
    leaf_kind: TypeKind,
}

impl ResolvedPath {
    /// `segments` must hold exactly one entry per segment of `path`.
    pub fn new(path: ColumnPath, segments: Vec<ResolvedSegment>, leaf_kind: TypeKind) -> Self {
        debug_assert_eq!(path.len(), segments.len());
        ResolvedPath {
            path,
            segments,
            leaf_kind,
        }
    }

    pub fn path(&self) -> &ColumnPath {
        &self.path
    }

    pub fn segments(&self) -> &[ResolvedSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The field names along the path.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(ResolvedSegment::name)
    }

    pub fn leaf(&self) -> Option<&ResolvedSegment> {
        self.segments.last()
    }

    /// Scalar or enum.
    pub fn leaf_kind(&self) -> TypeKind {
        self.leaf_kind
    }

    /// Whether any segment is list-valued, which can multiply rows.
    pub fn crosses_list(&self) -> bool {
        self.segments.iter().any(|segment| segment.is_list)
    }
}
