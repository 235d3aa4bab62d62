//! Turn a nested GraphQL response into flat rows.
//!
//! The response is walked along the selection shape. Each node yields a set of
//! partial rows covering the columns read at or below it:
//!
//! - a leaf yields one row holding its value;
//! - a list node yields one group of rows per element, and its rows are the groups
//!   concatenated, so ancestors are repeated for every descendant element;
//! - an object node pairs the elements of its list children by index. A list of one
//!   element, or a child that is not a list, is combined with every index. At each
//!   index the children's rows are multiplied out;
//! - a null or missing value yields a single row of nulls, and so does an empty
//!   nested list.
//!
//! The walk recurses once per selected field, so its depth is that of the deepest
//! column path.

use query_engine_graphql::graphql::query::OutputColumn;
use query_engine_graphql::graphql::shape::{SelectionShape, ShapeNode};
use serde_json::Value;

use crate::error::Error;

pub type Row = Vec<Value>;

#[derive(Debug, Clone, PartialEq)]
pub struct Flattened {
    /// One value per output column, in column order.
    pub rows: Vec<Row>,
    /// Rows were dropped to stay within the row bound.
    pub truncated: bool,
}

/// Flatten the `data` object of a response.
///
/// At most `max_rows` rows are produced. A null root value, or an empty root list,
/// yields no rows at all.
pub fn flatten(
    data: &Value,
    shape: &SelectionShape,
    columns: &[OutputColumn],
    max_rows: usize,
) -> Result<Flattened, Error> {
    let plan = PlanNode::build(&shape.root, columns)?;
    let mut flattener = Flattener {
        width: columns.len(),
        max_rows,
        truncated: false,
    };

    let rows = match data.get(plan.key).unwrap_or(&Value::Null) {
        Value::Null => vec![],
        Value::Array(elements) if plan.list && elements.is_empty() => vec![],
        value => flattener
            .node_rows(&plan, value, plan.key)?
            .groups
            .concat(),
    };

    if flattener.truncated {
        tracing::warn!(max_rows, "flattened rows exceed the row bound; result truncated");
    }
    tracing::debug!(rows = rows.len(), "flattened response");

    Ok(Flattened {
        rows,
        truncated: flattener.truncated,
    })
}

/// A shape node annotated with the output columns it feeds.
struct PlanNode<'a> {
    key: &'a str,
    list: bool,
    /// Columns reading this node's value. Only leaves have any.
    columns: Vec<usize>,
    /// Columns read at or below this node.
    subtree: Vec<usize>,
    children: Vec<PlanNode<'a>>,
}

impl<'a> PlanNode<'a> {
    fn build(shape: &'a ShapeNode, columns: &[OutputColumn]) -> Result<PlanNode<'a>, Error> {
        let mut root = PlanNode::skeleton(shape);
        for (index, column) in columns.iter().enumerate() {
            let mut node = &mut root;
            for name in column.path.names() {
                node.subtree.push(index);
                node = node
                    .children
                    .iter_mut()
                    .find(|child| child.key == name)
                    .ok_or_else(|| Error::ColumnNotInShape(column.name.clone()))?;
            }
            if !node.children.is_empty() {
                return Err(Error::ColumnNotInShape(column.name.clone()));
            }
            node.subtree.push(index);
            node.columns.push(index);
        }
        Ok(root)
    }

    fn skeleton(shape: &'a ShapeNode) -> PlanNode<'a> {
        PlanNode {
            key: &shape.name,
            list: shape.list,
            columns: vec![],
            subtree: vec![],
            children: shape.children.iter().map(PlanNode::skeleton).collect(),
        }
    }
}

/// The rows found under one node.
struct Expansion {
    /// One group per list element, or a single group when the node is not a list.
    groups: Vec<Vec<Row>>,
    /// Elements of this list were dropped to stay within the row bound.
    cut: bool,
}

impl Expansion {
    fn single(rows: Vec<Row>) -> Expansion {
        Expansion {
            groups: vec![rows],
            cut: false,
        }
    }

    /// The rows to combine with index `index` of the sibling lists.
    fn group(&self, index: usize) -> &[Row] {
        if self.groups.len() == 1 {
            &self.groups[0]
        } else {
            &self.groups[index]
        }
    }
}

struct Flattener {
    width: usize,
    max_rows: usize,
    truncated: bool,
}

impl Flattener {
    fn blank(&self) -> Row {
        vec![Value::Null; self.width]
    }

    /// Rows for `node`, given the value found under its key.
    fn node_rows(&mut self, node: &PlanNode, value: &Value, path: &str) -> Result<Expansion, Error> {
        match value {
            Value::Null => Ok(Expansion::single(vec![self.blank()])),
            Value::Array(elements) if node.list => {
                if elements.is_empty() {
                    return Ok(Expansion::single(vec![self.blank()]));
                }
                let mut groups = Vec::with_capacity(elements.len());
                let mut total = 0;
                let mut cut = false;
                for (position, element) in elements.iter().enumerate() {
                    let mut rows = self.element_rows(node, element, path)?;
                    total += rows.len();
                    if total > self.max_rows {
                        rows.truncate(rows.len() - (total - self.max_rows));
                        groups.push(rows);
                        cut = true;
                        break;
                    }
                    groups.push(rows);
                    // every further element adds at least one row
                    if total == self.max_rows && position + 1 < elements.len() {
                        cut = true;
                        break;
                    }
                }
                self.truncated |= cut;
                Ok(Expansion { groups, cut })
            }
            _ => Ok(Expansion::single(self.element_rows(node, value, path)?)),
        }
    }

    /// Rows for one value of `node`: the whole value, or one list element.
    fn element_rows(&mut self, node: &PlanNode, value: &Value, path: &str) -> Result<Vec<Row>, Error> {
        if node.children.is_empty() {
            let mut row = self.blank();
            for &column in &node.columns {
                row[column] = value.clone();
            }
            return Ok(vec![row]);
        }

        let object = match value {
            Value::Null => return Ok(vec![self.blank()]),
            Value::Object(object) => object,
            other => {
                return Err(Error::UnexpectedValue {
                    path: path.to_string(),
                    found: json_type_name(other).to_string(),
                })
            }
        };

        let mut expansions = Vec::with_capacity(node.children.len());
        for child in &node.children {
            let child_path = format!("{path}.{}", child.key);
            let child_value = object.get(child.key).unwrap_or(&Value::Null);
            expansions.push((child, self.node_rows(child, child_value, &child_path)?));
        }
        let length = paired_length(&expansions, path)?;
        Ok(self.combine(&expansions, length))
    }

    /// Multiply out the children's rows at each index of the sibling lists.
    fn combine(&mut self, expansions: &[(&PlanNode, Expansion)], length: usize) -> Vec<Row> {
        let mut rows = vec![];
        for index in 0..length {
            let mut partial = vec![self.blank()];
            for (child, expansion) in expansions {
                let group = expansion.group(index);
                let mut product = Vec::with_capacity(partial.len() * group.len());
                'rows: for row in &partial {
                    for other in group {
                        if product.len() == self.max_rows {
                            self.truncated = true;
                            break 'rows;
                        }
                        let mut merged = row.clone();
                        for &column in &child.subtree {
                            merged[column] = other[column].clone();
                        }
                        product.push(merged);
                    }
                }
                partial = product;
            }
            rows.extend(partial);
            if rows.len() > self.max_rows || (rows.len() == self.max_rows && index + 1 < length) {
                rows.truncate(self.max_rows);
                self.truncated = true;
                break;
            }
        }
        rows
    }
}

/// How many indexes the sibling lists under one object pair up over.
///
/// Lists of one element, and children that are not lists, go with every index. All
/// other lists must have the same length. A list cut short by the row bound only has
/// to be no longer than the others, and the pairing stops at its end.
fn paired_length(expansions: &[(&PlanNode, Expansion)], path: &str) -> Result<usize, Error> {
    let mismatch = |child: &PlanNode, left: usize, right: usize| Error::ShapeMismatch {
        path: path.to_string(),
        field: child.key.to_string(),
        left,
        right,
    };

    let mut complete: Option<usize> = None;
    for (child, expansion) in expansions {
        let length = expansion.groups.len();
        if length == 1 || expansion.cut {
            continue;
        }
        match complete {
            None => complete = Some(length),
            Some(expected) if expected != length => return Err(mismatch(*child, expected, length)),
            Some(_) => {}
        }
    }

    let mut paired = complete;
    for (child, expansion) in expansions {
        let length = expansion.groups.len();
        if length == 1 || !expansion.cut {
            continue;
        }
        if let Some(expected) = complete {
            if length > expected {
                return Err(mismatch(*child, expected, length));
            }
        }
        paired = Some(paired.map_or(length, |shortest| shortest.min(length)));
    }
    Ok(paired.unwrap_or(1))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use query_engine_graphql::graphql::query::CompiledQuery;
    use query_engine_sql::sql::parse;
    use query_engine_translation::translation::query::translate;
    use query_engine_metadata::metadata::SchemaModel;
    use query_engine_sql::sql::ast::{ColumnPath, SelectList, SelectedColumn, SqlStatement};
    use serde_json::json;
    use tests_common::fixtures::media_schema;
    use tests_common::introspection::{
        builtin_scalars, field, list, object, object_ref, response, scalar_ref,
    };

    use super::*;

    fn compile(sql: &str) -> CompiledQuery {
        translate(&media_schema(), &parse(sql).unwrap()).unwrap()
    }

    fn flatten_sql(sql: &str, data: &Value) -> Result<Flattened, Error> {
        let compiled = compile(sql);
        flatten(data, &compiled.shape, &compiled.columns, 10_000)
    }

    #[test]
    fn nested_list_repeats_its_parent() {
        let data = json!({
            "Media": {
                "id": 1,
                "characters": [{ "id": 10 }, { "id": 11 }, { "id": 12 }]
            }
        });
        let flattened = flatten_sql("SELECT id, characters.id FROM Media", &data).unwrap();
        assert_eq!(
            flattened.rows,
            vec![
                vec![json!(1), json!(10)],
                vec![json!(1), json!(11)],
                vec![json!(1), json!(12)],
            ]
        );
        assert!(!flattened.truncated);
    }

    #[test]
    fn root_list_and_nested_list_multiply() {
        let data = json!({
            "Page": {
                "media": [
                    { "id": 1, "characters": [{ "id": 10 }, { "id": 11 }] },
                    { "id": 2, "characters": [{ "id": 20 }] }
                ]
            }
        });
        let flattened =
            flatten_sql("SELECT media.id, media.characters.id FROM Page", &data).unwrap();
        assert_eq!(
            flattened.rows,
            vec![
                vec![json!(1), json!(10)],
                vec![json!(1), json!(11)],
                vec![json!(2), json!(20)],
            ]
        );
    }

    #[test]
    fn sibling_lists_of_equal_length_pair_up() {
        let data = json!({
            "Media": {
                "characters": [{ "id": 10 }, { "id": 11 }],
                "staff": [{ "id": 90 }, { "id": 91 }]
            }
        });
        let flattened = flatten_sql("SELECT characters.id, staff.id FROM Media", &data).unwrap();
        assert_eq!(
            flattened.rows,
            vec![vec![json!(10), json!(90)], vec![json!(11), json!(91)]]
        );
    }

    #[test]
    fn single_element_sibling_is_repeated() {
        let data = json!({
            "Media": {
                "characters": [{ "id": 10 }],
                "staff": [{ "id": 90 }, { "id": 91 }, { "id": 92 }]
            }
        });
        let flattened = flatten_sql("SELECT characters.id, staff.id FROM Media", &data).unwrap();
        assert_eq!(
            flattened.rows,
            vec![
                vec![json!(10), json!(90)],
                vec![json!(10), json!(91)],
                vec![json!(10), json!(92)],
            ]
        );
    }

    #[test]
    fn sibling_lists_of_different_lengths_fail() {
        let data = json!({
            "Media": {
                "characters": [{ "id": 10 }, { "id": 11 }],
                "staff": [{ "id": 90 }, { "id": 91 }, { "id": 92 }]
            }
        });
        assert_eq!(
            flatten_sql("SELECT characters.id, staff.id FROM Media", &data)
                .unwrap_err()
                .to_string(),
            "cannot pair the list 'staff' (3 elements) with its sibling lists (2 elements) under 'Media'"
        );
    }

    #[test]
    fn nulls_propagate_to_leaves() {
        let data = json!({
            "Page": {
                "media": [
                    { "id": 1, "title": null },
                    null,
                    { "id": 3 }
                ]
            }
        });
        let flattened = flatten_sql("SELECT media.id, media.title.english FROM Page", &data).unwrap();
        assert_eq!(
            flattened.rows,
            vec![
                vec![json!(1), Value::Null],
                vec![Value::Null, Value::Null],
                vec![json!(3), Value::Null],
            ]
        );
    }

    #[test]
    fn empty_nested_list_keeps_the_parent_row() {
        let data = json!({ "Media": { "id": 1, "characters": [] } });
        let flattened = flatten_sql("SELECT id, characters.id FROM Media", &data).unwrap();
        assert_eq!(flattened.rows, vec![vec![json!(1), Value::Null]]);
    }

    #[test]
    fn only_an_empty_or_null_root_yields_no_rows() {
        let empty = json!({ "Page": { "media": [] } });
        assert_eq!(
            flatten_sql("SELECT media.id FROM Page", &empty).unwrap().rows,
            vec![vec![Value::Null]]
        );
        let no_missions = json!({ "missions": [] });
        assert!(flatten_sql("SELECT name FROM missions", &no_missions)
            .unwrap()
            .rows
            .is_empty());
        let missing = json!({ "mission": null });
        assert!(flatten_sql("SELECT name FROM mission WHERE id = 'x'", &missing)
            .unwrap()
            .rows
            .is_empty());
    }

    #[test]
    fn list_leaves_expand() {
        let data = json!({ "Media": { "id": 1, "genres": ["Action", "Drama"] } });
        let flattened = flatten_sql("SELECT id, genres FROM Media", &data).unwrap();
        assert_eq!(
            flattened.rows,
            vec![
                vec![json!(1), json!("Action")],
                vec![json!(1), json!("Drama")],
            ]
        );
    }

    #[test]
    fn columns_follow_the_select_list_not_the_response() {
        let data = json!({ "Media": { "title": { "english": "Cowboy Bebop" }, "id": 1 } });
        let flattened = flatten_sql("SELECT title.english, id FROM Media", &data).unwrap();
        assert_eq!(flattened.rows, vec![vec![json!("Cowboy Bebop"), json!(1)]]);
    }

    #[test]
    fn rows_are_bounded() {
        let media: Vec<Value> = (0..10).map(|id| json!({ "id": id })).collect();
        let data = json!({ "Page": { "media": media } });
        let compiled = compile("SELECT media.id FROM Page");
        let flattened = flatten(&data, &compiled.shape, &compiled.columns, 4).unwrap();
        assert_eq!(flattened.rows.len(), 4);
        assert!(flattened.truncated);
        assert_eq!(flattened.rows[3], vec![json!(3)]);
    }

    #[test]
    fn exactly_max_rows_is_not_truncated() {
        let data = json!({ "Page": { "media": [{ "id": 1 }, { "id": 2 }] } });
        let compiled = compile("SELECT media.id FROM Page");
        let flattened = flatten(&data, &compiled.shape, &compiled.columns, 2).unwrap();
        assert_eq!(flattened.rows.len(), 2);
        assert!(!flattened.truncated);
    }

    #[test]
    fn scalars_where_objects_are_expected_fail() {
        let data = json!({ "Media": { "title": "Cowboy Bebop" } });
        assert!(matches!(
            flatten_sql("SELECT title.english FROM Media", &data),
            Err(Error::UnexpectedValue { path, .. }) if path == "Media.title"
        ));
    }

    /// `root { a: [A { tags: [String] }], b: [B { id: Int }] }`
    fn sibling_schema() -> SchemaModel {
        let mut types = vec![
            object("Query", vec![field("root", object_ref("Root"))]),
            object(
                "Root",
                vec![
                    field("a", list(object_ref("A"))),
                    field("b", list(object_ref("B"))),
                ],
            ),
            object("A", vec![field("tags", list(scalar_ref("String")))]),
            object("B", vec![field("id", scalar_ref("Int"))]),
        ];
        types.extend(builtin_scalars());
        SchemaModel::from_introspection_response(&response("Query", types)).unwrap()
    }

    fn flatten_siblings(data: &Value) -> Result<Flattened, Error> {
        let compiled = translate(
            &sibling_schema(),
            &parse("SELECT a.tags, b.id FROM root").unwrap(),
        )
        .unwrap();
        flatten(data, &compiled.shape, &compiled.columns, 10_000)
    }

    #[test]
    fn sibling_lists_pair_by_element_count_not_row_count() {
        let data = json!({
            "root": {
                "a": [{ "tags": ["x1", "x2"] }, { "tags": ["y1", "y2"] }],
                "b": [{ "id": 1 }, { "id": 2 }, { "id": 3 }, { "id": 4 }]
            }
        });
        match flatten_siblings(&data) {
            Err(Error::ShapeMismatch {
                path,
                field,
                left,
                right,
            }) => {
                assert_eq!(path, "root");
                assert_eq!(field, "b");
                assert_eq!((left, right), (2, 4));
            }
            other => panic!("expected a shape mismatch, got {other:?}"),
        }
    }

    #[test]
    fn paired_elements_multiply_out_their_nested_lists() {
        let data = json!({
            "root": {
                "a": [{ "tags": ["x1", "x2"] }, { "tags": ["y1"] }],
                "b": [{ "id": 1 }, { "id": 2 }]
            }
        });
        assert_eq!(
            flatten_siblings(&data).unwrap().rows,
            vec![
                vec![json!("x1"), json!(1)],
                vec![json!("x2"), json!(1)],
                vec![json!("y1"), json!(2)],
            ]
        );
    }

    #[test]
    fn single_element_list_with_a_nested_list_is_repeated() {
        let data = json!({
            "root": {
                "a": [{ "tags": ["x1", "x2", "x3"] }],
                "b": [{ "id": 1 }, { "id": 2 }]
            }
        });
        assert_eq!(
            flatten_siblings(&data).unwrap().rows,
            vec![
                vec![json!("x1"), json!(1)],
                vec![json!("x2"), json!(1)],
                vec![json!("x3"), json!(1)],
                vec![json!("x1"), json!(2)],
                vec![json!("x2"), json!(2)],
                vec![json!("x3"), json!(2)],
            ]
        );
    }

    fn media_with_lists(characters: usize, staff: usize, genres: usize) -> Value {
        let characters: Vec<Value> = (0..characters).map(|id| json!({ "id": id })).collect();
        let staff: Vec<Value> = (0..staff).map(|id| json!({ "id": 100 + id })).collect();
        let genres: Vec<Value> = (0..genres).map(|genre| json!(format!("genre {genre}"))).collect();
        json!({ "Media": { "characters": characters, "staff": staff, "genres": genres } })
    }

    #[test]
    fn a_cut_list_pairs_up_with_complete_siblings() {
        let compiled = compile("SELECT characters.id, staff.id FROM Media");
        let flattened = flatten(
            &media_with_lists(5, 3, 0),
            &compiled.shape,
            &compiled.columns,
            3,
        )
        .unwrap();
        assert!(flattened.truncated);
        assert_eq!(
            flattened.rows,
            vec![
                vec![json!(0), json!(100)],
                vec![json!(1), json!(101)],
                vec![json!(2), json!(102)],
            ]
        );
    }

    #[test]
    fn truncation_elsewhere_does_not_excuse_a_mismatch() {
        let compiled = compile("SELECT characters.id, staff.id, genres FROM Media");
        let result = flatten(
            &media_with_lists(5, 2, 3),
            &compiled.shape,
            &compiled.columns,
            3,
        );
        assert!(
            matches!(
                &result,
                Err(Error::ShapeMismatch { field, left: 2, right: 3, .. }) if field == "genres"
            ),
            "{result:?}"
        );
    }

    /// `node { next: Node, v: Int }`, which nests as deep as a path asks.
    fn recursive_schema() -> SchemaModel {
        let mut types = vec![
            object("Query", vec![field("node", object_ref("Node"))]),
            object(
                "Node",
                vec![
                    field("next", object_ref("Node")),
                    field("v", scalar_ref("Int")),
                ],
            ),
        ];
        types.extend(builtin_scalars());
        SchemaModel::from_introspection_response(&response("Query", types)).unwrap()
    }

    #[test]
    fn deep_paths_flatten() {
        let depth = query_engine_translation::translation::query::fields::MAX_PATH_DEPTH;
        let mut segments = vec!["next".to_string(); depth - 1];
        segments.push("v".to_string());
        let statement = SqlStatement {
            table: "node".to_string(),
            table_alias: None,
            select_list: SelectList::Columns(vec![SelectedColumn {
                path: ColumnPath::new(segments).unwrap(),
                alias: Some("v".to_string()),
            }]),
            predicates: vec![],
            order_by: vec![],
            limit: None,
        };
        let compiled = translate(&recursive_schema(), &statement).unwrap();

        let mut value = json!({ "v": 7 });
        for _ in 1..depth {
            value = json!({ "next": value });
        }
        let data = json!({ "node": value });

        let flattened = flatten(&data, &compiled.shape, &compiled.columns, 10).unwrap();
        assert_eq!(flattened.rows, vec![vec![json!(7)]]);
    }
}
