//! Translate a parsed `SqlStatement` into a `CompiledQuery`.

pub mod fields;
mod filtering;
mod root;
mod selection;
mod sorting;
mod values;

use std::collections::BTreeMap;

use query_engine_graphql::graphql::ast::{
    Argument, Document, Operation, SelectionSet, Value, VariableDefinition,
};
use query_engine_graphql::graphql::query::{CompiledQuery, OutputColumn};
use query_engine_graphql::graphql::shape::SelectionShape;
use query_engine_metadata::metadata::SchemaModel;
use query_engine_sql::sql::ast::SqlStatement;

use super::error::Error;
use super::helpers::{required_arguments, Env};

pub use fields::resolve;

/// Translate a statement into a GraphQL query against `schema`.
///
/// Every selected column and predicate is resolved before anything is built, so an
/// error leaves nothing half-translated behind.
pub fn translate(schema: &SchemaModel, statement: &SqlStatement) -> Result<CompiledQuery, Error> {
    let env = Env::new(schema);
    let root = root::lookup_root(env, &statement.table)?;

    let columns = selection::select_list_columns(env, &root, &statement.table, &statement.select_list)?
        .into_iter()
        .map(|(name, path)| {
            Ok(OutputColumn {
                name,
                path: fields::resolve_path(env, root.field, &path)?,
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;

    let bindings = filtering::translate_predicates(env, root.field, &statement.predicates)?;
    let order_by = sorting::translate_order_by(&statement.order_by, &columns)?;

    let mut arguments: Vec<Argument> = bindings
        .iter()
        .map(|binding| Argument {
            name: binding.argument.clone(),
            value: Value::Variable(binding.argument.clone()),
        })
        .collect();

    // with ORDER BY the limit applies to the sorted rows, so the server must return all
    let mut limit_pushed_down = false;
    if let Some(limit) = statement.limit {
        if order_by.is_empty() {
            if let Some(name) = root::limit_argument(root.field, &bindings) {
                arguments.push(Argument {
                    name: name.to_string(),
                    value: Value::Int(limit),
                });
                limit_pushed_down = true;
            }
        }
    }

    root::check_required_arguments(root.field, &arguments)?;
    for column in &columns {
        for segment in column.path.segments() {
            if let Some(argument) = required_arguments(&segment.field).next() {
                return Err(Error::MissingArgument {
                    field: segment.name().to_string(),
                    argument: argument.to_string(),
                });
            }
        }
    }

    let (root_selection, root_shape) =
        selection::compile_selection(&root, arguments, columns.iter().map(|column| &column.path));

    let document = Document {
        operation: Operation {
            name: root.field.name().to_string(),
            variable_definitions: bindings
                .iter()
                .map(|binding| VariableDefinition {
                    name: binding.argument.clone(),
                    r#type: binding.r#type.clone(),
                })
                .collect(),
            selection_set: SelectionSet(vec![root_selection]),
        },
    };
    let query = document.print();
    let variables: BTreeMap<String, serde_json::Value> = bindings
        .into_iter()
        .map(|binding| (binding.argument, binding.value))
        .collect();

    // log and return
    tracing::info!(query = %query, variables = ?variables, "GraphQL query");

    Ok(CompiledQuery {
        root_field: root.field.name().to_string(),
        document,
        query,
        variables,
        shape: SelectionShape { root: root_shape },
        columns,
        row_limit: statement.limit,
        limit_pushed_down,
        order_by,
    })
}

#[cfg(test)]
mod tests {
    use query_engine_sql::sql::ast::{Literal, OrderDirection};
    use query_engine_sql::sql::helpers::{aliased_column, column, equals, order_by, simple_select};
    use query_engine_sql::sql::parse;
    use serde_json::json;
    use tests_common::fixtures::media_schema;

    use super::*;

    fn translate_sql(sql: &str) -> Result<CompiledQuery, Error> {
        translate(&media_schema(), &parse(sql).unwrap())
    }

    #[test]
    fn translates_the_page_example() {
        let compiled = translate_sql("SELECT media.id, media.title.english FROM Page").unwrap();
        assert_eq!(
            compiled.query,
            "query Page { Page { media { id title { english } } } }"
        );
        assert_eq!(compiled.column_names(), vec!["media.id", "media.title.english"]);
        assert_eq!(
            compiled.shape.to_string(),
            "Page { media[] { id title { english } } }"
        );
        assert!(compiled.variables.is_empty());
    }

    #[test]
    fn predicates_become_typed_variables() {
        let compiled = translate_sql("SELECT id, name FROM mission WHERE id = 'C-1'").unwrap();
        assert_eq!(
            compiled.query,
            "query mission($id: ID!) { mission(id: $id) { id name } }"
        );
        assert_eq!(compiled.variables_json(), json!({ "id": "C-1" }));
    }

    #[test]
    fn prefix_merge_yields_a_single_node() {
        let compiled =
            translate_sql("SELECT media.characters.id, media.characters.name.full FROM Page")
                .unwrap();
        assert_eq!(
            compiled.query,
            "query Page { Page { media { characters { id name { full } } } } }"
        );
    }

    #[test]
    fn limit_is_pushed_to_a_declared_argument() {
        let compiled = translate_sql("SELECT media.id FROM Page LIMIT 5").unwrap();
        assert_eq!(
            compiled.query,
            "query Page { Page(perPage: 5) { media { id } } }"
        );
        assert!(compiled.limit_pushed_down);
        assert_eq!(compiled.row_limit, Some(5));
    }

    #[test]
    fn limit_without_an_argument_stays_client_side() {
        let compiled = translate_sql("SELECT id FROM Media LIMIT 5").unwrap();
        assert_eq!(compiled.query, "query Media { Media { id } }");
        assert!(!compiled.limit_pushed_down);
        assert_eq!(compiled.row_limit, Some(5));
    }

    #[test]
    fn limit_arguments_must_be_int() {
        let compiled = translate_sql("SELECT rank FROM rankings LIMIT 5").unwrap();
        assert!(!compiled.limit_pushed_down);
    }

    #[test]
    fn limit_is_not_pushed_down_under_order_by() {
        let compiled =
            translate_sql("SELECT name FROM missions ORDER BY name DESC LIMIT 2").unwrap();
        assert_eq!(compiled.query, "query missions { missions { name } }");
        assert!(!compiled.limit_pushed_down);
        assert_eq!(compiled.order_by.len(), 1);
        assert_eq!(compiled.order_by[0].column, 0);
        assert_eq!(compiled.order_by[0].direction, OrderDirection::Desc);
    }

    #[test]
    fn order_by_finds_aliases_and_paths() {
        let mut statement = simple_select(
            "Page",
            vec![
                aliased_column("media.id", "media_id"),
                column("media.title.english"),
            ],
        );
        statement.order_by = vec![
            order_by("media.title.english", OrderDirection::Asc),
            order_by("media_id", OrderDirection::Desc),
            order_by("media.id", OrderDirection::Asc),
        ];
        let compiled = translate(&media_schema(), &statement).unwrap();
        let keys: Vec<usize> = compiled.order_by.iter().map(|key| key.column).collect();
        assert_eq!(keys, vec![1, 0, 0]);
    }

    #[test]
    fn order_by_needs_a_selected_column() {
        assert_eq!(
            translate_sql("SELECT id FROM Media ORDER BY averageScore"),
            Err(Error::UnsupportedFeature(
                "ORDER BY on an unselected column 'averageScore'".to_string()
            ))
        );
    }

    #[test]
    fn aliases_name_output_columns() {
        let compiled =
            translate_sql("SELECT m.id AS identifier, m.title.english FROM Media m").unwrap();
        assert_eq!(compiled.column_names(), vec!["identifier", "title.english"]);
        assert_eq!(
            compiled.query,
            "query Media { Media { id title { english } } }"
        );
    }

    #[test]
    fn unknown_columns_name_the_segment() {
        assert_eq!(
            translate_sql("SELECT media.foo FROM Page"),
            Err(Error::UnknownField {
                path: "media.foo".to_string(),
                segment: "foo".to_string()
            })
        );
    }

    #[test]
    fn unknown_tables_fail() {
        assert_eq!(
            translate_sql("SELECT id FROM Anime"),
            Err(Error::UnknownTable("Anime".to_string()))
        );
    }

    #[test]
    fn required_root_arguments_must_be_bound() {
        assert_eq!(
            translate_sql("SELECT id FROM mission"),
            Err(Error::MissingArgument {
                field: "mission".to_string(),
                argument: "id".to_string()
            })
        );
    }

    #[test]
    fn fields_with_required_arguments_cannot_be_selected() {
        assert_eq!(
            translate_sql("SELECT score FROM Media"),
            Err(Error::MissingArgument {
                field: "score".to_string(),
                argument: "format".to_string()
            })
        );
    }

    #[test]
    fn any_failure_aborts_translation() {
        let mut statement = simple_select("Media", vec![column("id")]);
        statement.predicates = vec![equals("id", Literal::String("one".to_string()))];
        assert!(matches!(
            translate(&media_schema(), &statement),
            Err(Error::UnsupportedPredicate { .. })
        ));
    }
}
