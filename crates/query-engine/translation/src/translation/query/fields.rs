//! Resolve dotted column paths against the schema.

use query_engine_graphql::graphql::path::{ResolvedPath, ResolvedSegment};
use query_engine_metadata::metadata::{SchemaField, SchemaModel};
use query_engine_sql::sql::ast::ColumnPath;

use crate::translation::error::Error;
use crate::translation::helpers::Env;

/// The most fields a column path may descend through.
pub const MAX_PATH_DEPTH: usize = 64;

/// Resolve `column_path` below the root field named `root_field`.
///
/// Resolution only reads the schema, so resolving the same path twice gives equal results.
pub fn resolve(
    column_path: &ColumnPath,
    root_field: &str,
    schema: &SchemaModel,
) -> Result<ResolvedPath, Error> {
    let env = Env::new(schema);
    let root = env.lookup_root_field(root_field)?;
    resolve_path(env, root, column_path)
}

/// Walk the segments one at a time, looking each up on the type the previous one
/// returned. List and non-null wrappers are looked through and only recorded.
pub(crate) fn resolve_path(
    env: Env<'_>,
    root_field: &SchemaField,
    column_path: &ColumnPath,
) -> Result<ResolvedPath, Error> {
    if column_path.len() > MAX_PATH_DEPTH {
        return Err(Error::PathTooDeep {
            start: column_path.first().to_string(),
            depth: column_path.len(),
            limit: MAX_PATH_DEPTH,
        });
    }

    let mut current_type = env.lookup_named_type(root_field.r#type())?;
    let mut segments = Vec::with_capacity(column_path.len());

    for name in column_path.segments() {
        let field = if current_type.kind().has_fields() {
            current_type.field(name)
        } else {
            None
        };
        let field = field.ok_or_else(|| Error::UnknownField {
            path: column_path.to_string(),
            segment: name.clone(),
        })?;

        let field_type = field.r#type();
        if field_type.list_depth() > 1 {
            return Err(Error::NestedListsNotSupported {
                path: column_path.to_string(),
                segment: name.clone(),
            });
        }
        segments.push(ResolvedSegment {
            field: field.clone(),
            is_list: field_type.is_list(),
            is_nullable: field_type.is_nullable(),
        });
        current_type = env.lookup_named_type(field_type)?;
    }

    if !current_type.kind().is_leaf() {
        return Err(Error::NotLeaf {
            path: column_path.to_string(),
            type_name: current_type.name().to_string(),
        });
    }
    Ok(ResolvedPath::new(
        column_path.clone(),
        segments,
        current_type.kind(),
    ))
}

#[cfg(test)]
mod tests {
    use query_engine_metadata::metadata::TypeKind;
    use query_engine_sql::sql::helpers::path;
    use similar_asserts::assert_eq;
    use tests_common::fixtures::media_schema;

    use super::*;

    #[test]
    fn resolves_nested_paths_through_lists() {
        let schema = media_schema();
        let resolved = resolve(&path("media.title.english"), "Page", &schema).unwrap();

        assert_eq!(resolved.len(), 3);
        assert_eq!(
            resolved.names().collect::<Vec<_>>(),
            vec!["media", "title", "english"]
        );
        let flags: Vec<(bool, bool)> = resolved
            .segments()
            .iter()
            .map(|segment| (segment.is_list, segment.is_nullable))
            .collect();
        assert_eq!(flags, vec![(true, true), (false, true), (false, true)]);
        assert_eq!(resolved.leaf_kind(), TypeKind::Scalar);
    }

    #[test]
    fn resolution_is_idempotent() {
        let schema = media_schema();
        let first = resolve(&path("media.characters.name.full"), "Page", &schema).unwrap();
        let second = resolve(&path("media.characters.name.full"), "Page", &schema).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn enums_are_leaves() {
        let schema = media_schema();
        let resolved = resolve(&path("type"), "Media", &schema).unwrap();
        assert_eq!(resolved.leaf_kind(), TypeKind::Enum);
        assert_eq!(resolved.leaf().map(|leaf| leaf.named_type()), Some("MediaType"));
    }

    #[test]
    fn interfaces_declare_fields() {
        let schema = media_schema();
        let resolved = resolve(&path("id"), "node", &schema).unwrap();
        assert!(!resolved.segments()[0].is_nullable);
    }

    #[test]
    fn unknown_segments_are_named() {
        let schema = media_schema();
        assert_eq!(
            resolve(&path("media.foo"), "Page", &schema),
            Err(Error::UnknownField {
                path: "media.foo".to_string(),
                segment: "foo".to_string()
            })
        );
        // names are case-sensitive
        assert_eq!(
            resolve(&path("Media.id"), "Page", &schema),
            Err(Error::UnknownField {
                path: "Media.id".to_string(),
                segment: "Media".to_string()
            })
        );
    }

    #[test]
    fn descending_below_a_scalar_is_an_unknown_field() {
        let schema = media_schema();
        assert_eq!(
            resolve(&path("id.value"), "Media", &schema),
            Err(Error::UnknownField {
                path: "id.value".to_string(),
                segment: "value".to_string()
            })
        );
    }

    #[test]
    fn objects_are_not_leaves() {
        let schema = media_schema();
        assert_eq!(
            resolve(&path("media.title"), "Page", &schema),
            Err(Error::NotLeaf {
                path: "media.title".to_string(),
                type_name: "MediaTitle".to_string()
            })
        );
    }

    #[test]
    fn nested_lists_are_rejected() {
        let schema = media_schema();
        assert_eq!(
            resolve(&path("synonymGroups"), "Media", &schema),
            Err(Error::NestedListsNotSupported {
                path: "synonymGroups".to_string(),
                segment: "synonymGroups".to_string()
            })
        );
    }

    #[test]
    fn overly_deep_paths_are_rejected() {
        let schema = media_schema();
        let segments = vec!["media".to_string(); 50_000];
        let deep = ColumnPath::new(segments).unwrap();
        assert_eq!(
            resolve(&deep, "Page", &schema),
            Err(Error::PathTooDeep {
                start: "media".to_string(),
                depth: 50_000,
                limit: MAX_PATH_DEPTH
            })
        );
    }

    #[test]
    fn unknown_tables_are_reported() {
        let schema = media_schema();
        assert_eq!(
            resolve(&path("id"), "page", &schema),
            Err(Error::UnknownTable("page".to_string()))
        );
    }
}
