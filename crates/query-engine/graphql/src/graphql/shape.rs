//! The selection shape: a tree mirroring the selection set of the compiled document,
//! used to walk the response without looking at the document text again.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShapeNode {
    /// The response key, which is the field name since no field aliases are emitted.
    pub name: String,
    /// The value is a list whose elements are each shaped by this node.
    pub list: bool,
    /// Empty for a leaf.
    pub children: Vec<ShapeNode>,
}

impl ShapeNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn child(&self, name: &str) -> Option<&ShapeNode> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Follow `names` downwards from this node.
    pub fn find<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Option<&ShapeNode> {
        let mut node = self;
        for name in names {
            node = node.child(name)?;
        }
        Some(node)
    }
}

/// Renders as `Page { media[] { id title { english } } }`, `[]` marking list nodes.
impl fmt::Display for ShapeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if self.list {
            write!(f, "[]")?;
        }
        if !self.children.is_empty() {
            write!(f, " {{")?;
            for child in &self.children {
                write!(f, " {child}")?;
            }
            write!(f, " }}")?;
        }
        Ok(())
    }
}

/// The shape of the whole response below `data`: the root field node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionShape {
    pub root: ShapeNode,
}

impl fmt::Display for SelectionShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}
