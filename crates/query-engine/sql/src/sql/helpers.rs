//! Helpers for building sql::ast types in certain shapes and patterns.

use super::ast::*;

/// A dotted column path. Panics on an empty segment, so only use it with literal input.
pub fn path(dotted: &str) -> ColumnPath {
    ColumnPath::from_dotted(dotted)
        .unwrap_or_else(|| panic!("'{dotted}' is not a valid column path"))
}

/// An unaliased select list entry.
pub fn column(dotted: &str) -> SelectedColumn {
    SelectedColumn {
        path: path(dotted),
        alias: None,
    }
}

/// A select list entry renamed with `AS`.
pub fn aliased_column(dotted: &str, alias: &str) -> SelectedColumn {
    SelectedColumn {
        path: path(dotted),
        alias: Some(alias.to_string()),
    }
}

/// `SELECT <columns> FROM <table>` with no other clause.
pub fn simple_select(table: &str, columns: Vec<SelectedColumn>) -> SqlStatement {
    SqlStatement {
        table: table.to_string(),
        table_alias: None,
        select_list: SelectList::Columns(columns),
        predicates: vec![],
        order_by: vec![],
        limit: None,
    }
}

/// `SELECT * FROM <table>`.
pub fn select_star(table: &str) -> SqlStatement {
    SqlStatement {
        select_list: SelectList::Star,
        ..simple_select(table, vec![])
    }
}

/// `<column> <operator> <literal>`, positioned at the start of the statement.
pub fn compare(dotted: &str, operator: ComparisonOperator, literal: Literal) -> Predicate {
    Predicate {
        column: path(dotted),
        operator,
        value: PredicateValue::Single(literal),
        position: 0,
    }
}

/// `<column> = <literal>`.
pub fn equals(dotted: &str, literal: Literal) -> Predicate {
    compare(dotted, ComparisonOperator::Equals, literal)
}

/// `<column> IN (<literals>)`.
pub fn is_in(dotted: &str, literals: Vec<Literal>) -> Predicate {
    Predicate {
        column: path(dotted),
        operator: ComparisonOperator::In,
        value: PredicateValue::List(literals),
        position: 0,
    }
}

/// An `ORDER BY` element.
pub fn order_by(dotted: &str, direction: OrderDirection) -> OrderByElement {
    OrderByElement {
        column: path(dotted),
        direction,
    }
}
