//! Type definitions of the SQL statement AST.

use std::fmt;

use enum_iterator::Sequence;

/// A column reference, written with dots to express nested field traversal,
/// e.g. `media.title.english`.
///
/// Segments are kept exactly as written: GraphQL field names are case-sensitive.
/// A `ColumnPath` is never empty and none of its segments are empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnPath(Vec<String>);

impl ColumnPath {
    /// Build a path from its segments. Returns `None` for an empty path or an empty segment.
    pub fn new(segments: Vec<String>) -> Option<ColumnPath> {
        if segments.is_empty() || segments.iter().any(String::is_empty) {
            None
        } else {
            Some(ColumnPath(segments))
        }
    }

    /// Split a dotted string into a path.
    pub fn from_dotted(dotted: &str) -> Option<ColumnPath> {
        ColumnPath::new(dotted.split('.').map(str::to_string).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn first(&self) -> &str {
        &self.0[0]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Never true, but clippy likes `len` to come with `is_empty`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the path descends below the table's own fields.
    pub fn is_nested(&self) -> bool {
        self.0.len() > 1
    }

    /// Remove a leading segment equal to `prefix`, as long as something remains.
    pub fn strip_prefix(&self, prefix: &str) -> Option<ColumnPath> {
        match self.0.split_first() {
            Some((first, rest)) if first == prefix && !rest.is_empty() => {
                Some(ColumnPath(rest.to_vec()))
            }
            _ => None,
        }
    }
}

impl fmt::Display for ColumnPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

/// One entry of the select list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedColumn {
    pub path: ColumnPath,
    pub alias: Option<String>,
}

impl SelectedColumn {
    /// The name of the output column: the alias when given, the dotted path otherwise.
    pub fn output_name(&self) -> String {
        match &self.alias {
            Some(alias) => alias.clone(),
            None => self.path.to_string(),
        }
    }
}

/// The select list of a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectList {
    /// `SELECT *`, expanded against the schema later.
    Star,
    /// Explicit columns, in output order.
    Columns(Vec<SelectedColumn>),
}

/// The comparison operators understood in a `WHERE` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Sequence)]
pub enum ComparisonOperator {
    Equals,
    NotEquals,
    LessThan,
    LessThanOrEqualTo,
    GreaterThan,
    GreaterThanOrEqualTo,
    In,
}

impl ComparisonOperator {
    /// The operator as written in SQL.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Equals => "=",
            Self::NotEquals => "<>",
            Self::LessThan => "<",
            Self::LessThanOrEqualTo => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqualTo => ">=",
            Self::In => "IN",
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => write!(f, "NULL"),
            Literal::Boolean(true) => write!(f, "TRUE"),
            Literal::Boolean(false) => write!(f, "FALSE"),
            Literal::Integer(integer) => write!(f, "{integer}"),
            Literal::Float(float) => write!(f, "{float}"),
            Literal::String(string) => write!(f, "'{}'", string.replace('\'', "''")),
        }
    }
}

/// The right-hand side of a predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum PredicateValue {
    Single(Literal),
    /// The members of an `IN (...)` list.
    List(Vec<Literal>),
}

/// A single comparison of a `WHERE` clause conjunction.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub column: ColumnPath,
    pub operator: ComparisonOperator,
    pub value: PredicateValue,
    /// Byte offset of the predicate in the statement text.
    pub position: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    Asc,
    Desc,
}

/// An `ORDER BY` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderByElement {
    pub column: ColumnPath,
    pub direction: OrderDirection,
}

/// A parsed `SELECT` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlStatement {
    pub table: String,
    pub table_alias: Option<String>,
    pub select_list: SelectList,
    /// The conjunction of the `WHERE` clause; empty without one.
    pub predicates: Vec<Predicate>,
    pub order_by: Vec<OrderByElement>,
    pub limit: Option<u64>,
}
