//! Build the selection set of the root field and the matching selection shape.

use indexmap::IndexMap;

use query_engine_graphql::graphql::ast::{Argument, Field, SelectionSet};
use query_engine_graphql::graphql::path::ResolvedPath;
use query_engine_graphql::graphql::shape::ShapeNode;
use query_engine_sql::sql::ast::{ColumnPath, SelectList};

use super::root::Root;
use crate::translation::error::Error;
use crate::translation::helpers::{required_arguments, Env};

/// The output columns a select list stands for, as (output name, path) pairs.
///
/// `*` stands for every scalar or enum field declared directly on the root field's type
/// that can be selected without arguments, in declaration order.
pub(crate) fn select_list_columns(
    env: Env<'_>,
    root: &Root<'_>,
    table: &str,
    select_list: &SelectList,
) -> Result<Vec<(String, ColumnPath)>, Error> {
    match select_list {
        SelectList::Columns(columns) => Ok(columns
            .iter()
            .map(|column| (column.output_name(), column.path.clone()))
            .collect()),
        SelectList::Star => {
            let mut columns = vec![];
            if root.return_type.kind().has_fields() {
                for field in root.return_type.fields().values() {
                    let field_type = env.lookup_named_type(field.r#type())?;
                    if field_type.kind().is_leaf()
                        && field.r#type().list_depth() <= 1
                        && required_arguments(field).next().is_none()
                    {
                        if let Some(path) = ColumnPath::new(vec![field.name().to_string()]) {
                            columns.push((field.name().to_string(), path));
                        }
                    }
                }
            }
            if columns.is_empty() {
                Err(Error::EmptySelection {
                    table: table.to_string(),
                })
            } else {
                Ok(columns)
            }
        }
    }
}

/// A node of the merged selection tree.
#[derive(Debug, Default)]
struct SelectionNode {
    list: bool,
    children: IndexMap<String, SelectionNode>,
}

/// Merge the paths into a single tree, sharing common prefixes, and emit the root
/// field together with its shape.
///
/// Each path is inserted by walking down from the root and creating missing nodes, so
/// `a.b.c` and `a.b.d` end up as one `b` node holding both `c` and `d`. Children keep
/// the order in which they were first selected.
pub(crate) fn compile_selection<'a>(
    root: &Root<'_>,
    arguments: Vec<Argument>,
    paths: impl IntoIterator<Item = &'a ResolvedPath>,
) -> (Field, ShapeNode) {
    let mut tree: IndexMap<String, SelectionNode> = IndexMap::new();
    for path in paths {
        let mut children = &mut tree;
        for segment in path.segments() {
            children = &mut children
                .entry(segment.name().to_string())
                .or_insert_with(|| SelectionNode {
                    list: segment.is_list,
                    children: IndexMap::new(),
                })
                .children;
        }
    }

    let (selection_set, shape_children) = emit(tree);
    let name = root.field.name().to_string();
    (
        Field {
            name: name.clone(),
            arguments,
            selection_set,
        },
        ShapeNode {
            name,
            list: root.field.r#type().is_list(),
            children: shape_children,
        },
    )
}

/// A node being emitted: its finished children, and the children still to visit.
struct Frame {
    name: String,
    list: bool,
    pending: indexmap::map::IntoIter<String, SelectionNode>,
    fields: Vec<Field>,
    shapes: Vec<ShapeNode>,
}

impl Frame {
    fn new(name: String, node: SelectionNode) -> Frame {
        Frame {
            name,
            list: node.list,
            pending: node.children.into_iter(),
            fields: vec![],
            shapes: vec![],
        }
    }

    fn finish_child(&mut self, child: Frame) {
        self.fields.push(Field {
            name: child.name.clone(),
            arguments: vec![],
            selection_set: SelectionSet(child.fields),
        });
        self.shapes.push(ShapeNode {
            name: child.name,
            list: child.list,
            children: child.shapes,
        });
    }
}

/// Turn merged nodes into document fields and shape nodes side by side.
///
/// Nodes are visited depth first over an explicit stack; a node is emitted once all
/// of its children are.
fn emit(nodes: IndexMap<String, SelectionNode>) -> (SelectionSet, Vec<ShapeNode>) {
    let mut root = Frame::new(
        String::new(),
        SelectionNode {
            list: false,
            children: nodes,
        },
    );
    let mut stack: Vec<Frame> = vec![];
    loop {
        let next = match stack.last_mut() {
            Some(frame) => frame.pending.next(),
            None => root.pending.next(),
        };
        if let Some((name, node)) = next {
            stack.push(Frame::new(name, node));
            continue;
        }
        match stack.pop() {
            Some(done) => stack.last_mut().unwrap_or(&mut root).finish_child(done),
            None => return (SelectionSet(root.fields), root.shapes),
        }
    }
}
