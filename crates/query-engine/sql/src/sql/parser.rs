//! Parse SQL text into a [`SqlStatement`].
//!
//! The accepted grammar is
//!
//! ```text
//! SELECT { * | column [[AS] alias] [, ...] }
//! FROM table [[AS] alias]
//! [WHERE predicate [AND predicate ...]]
//! [ORDER BY column [ASC | DESC] [, ...]]
//! [LIMIT n] [;]
//! ```
//!
//! where a predicate is `column <op> literal` or `column IN (literal, ...)`. Anything
//! recognisably SQL but outside this grammar is reported as an unsupported feature
//! naming the construct rather than as a syntax error.

use super::ast::{
    ColumnPath, ComparisonOperator, Literal, OrderByElement, OrderDirection, Predicate,
    PredicateValue, SelectList, SelectedColumn, SqlStatement,
};
use super::error::Error;
use super::lexer::{tokenize, Symbol, Token, TokenKind};

/// Words which can never be bare identifiers or bare aliases.
const RESERVED: &[&str] = &[
    "ALL",
    "AND",
    "AS",
    "ASC",
    "BETWEEN",
    "BY",
    "CASE",
    "CROSS",
    "DESC",
    "DISTINCT",
    "ELSE",
    "END",
    "EXCEPT",
    "EXISTS",
    "FALSE",
    "FROM",
    "FULL",
    "GROUP",
    "HAVING",
    "ILIKE",
    "IN",
    "INNER",
    "INTERSECT",
    "IS",
    "JOIN",
    "LEFT",
    "LIKE",
    "LIMIT",
    "NATURAL",
    "NOT",
    "NULL",
    "NULLS",
    "OFFSET",
    "ON",
    "OR",
    "ORDER",
    "OUTER",
    "RIGHT",
    "SELECT",
    "THEN",
    "TRUE",
    "UNION",
    "USING",
    "WHEN",
    "WHERE",
    "WITH",
];

const AGGREGATES: &[&str] = &["COUNT", "SUM", "AVG", "MIN", "MAX"];

const JOINS: &[&str] = &["JOIN", "INNER", "LEFT", "RIGHT", "FULL", "CROSS", "NATURAL"];

const SET_OPERATIONS: &[&str] = &["UNION", "INTERSECT", "EXCEPT"];

const NON_QUERY_STATEMENTS: &[&str] = &[
    "INSERT", "UPDATE", "DELETE", "MERGE", "CREATE", "DROP", "ALTER", "TRUNCATE",
];

fn contains_keyword(keywords: &[&str], word: &str) -> bool {
    keywords
        .iter()
        .any(|keyword| keyword.eq_ignore_ascii_case(word))
}

/// Parse a single `SELECT` statement.
pub fn parse(sql: &str) -> Result<SqlStatement, Error> {
    let tokens = tokenize(sql)?;
    let mut parser = StatementParser {
        tokens,
        index: 0,
        end: sql.len(),
    };
    let statement = parser.statement()?;
    tracing::debug!(?statement, "parsed SQL statement");
    Ok(statement)
}

struct StatementParser {
    tokens: Vec<Token>,
    index: usize,
    /// Position reported for errors at the end of the input.
    end: usize,
}

impl StatementParser {
    fn statement(&mut self) -> Result<SqlStatement, Error> {
        self.statement_start()?;
        if self.peek_is_keyword("DISTINCT") {
            return Err(Error::unsupported(self.position(), "DISTINCT"));
        }
        self.eat_keyword("ALL");

        let select_list = self.select_list()?;
        if !self.eat_keyword("FROM") {
            return Err(self.unexpected("FROM"));
        }
        let (table, table_alias) = self.from_clause()?;

        let predicates = if self.eat_keyword("WHERE") {
            self.conjunction()?
        } else {
            vec![]
        };

        if self.peek_is_keyword("GROUP") {
            return Err(Error::unsupported(self.position(), "GROUP BY"));
        }
        if self.peek_is_keyword("HAVING") {
            return Err(Error::unsupported(self.position(), "HAVING"));
        }

        let order_by = if self.eat_keyword("ORDER") {
            self.expect_keyword("BY")?;
            self.order_by_list()?
        } else {
            vec![]
        };

        let limit = if self.eat_keyword("LIMIT") {
            Some(self.limit()?)
        } else {
            None
        };

        if self.peek_is_keyword("OFFSET") {
            return Err(Error::unsupported(self.position(), "OFFSET"));
        }
        if let Some(operation) = self.peek_keyword_in(SET_OPERATIONS) {
            return Err(Error::unsupported(self.position(), operation));
        }

        self.eat_symbol(Symbol::Semicolon);
        if let Some(token) = self.peek() {
            return Err(Error::syntax(
                token.position,
                format!("unexpected {}", token.kind),
            ));
        }

        Ok(strip_table_alias(SqlStatement {
            table,
            table_alias,
            select_list,
            predicates,
            order_by,
            limit,
        }))
    }

    fn statement_start(&mut self) -> Result<(), Error> {
        if self.eat_keyword("SELECT") {
            return Ok(());
        }
        if self.peek_is_keyword("WITH") {
            return Err(Error::unsupported(
                self.position(),
                "WITH (common table expressions)",
            ));
        }
        if let Some(statement) = self.peek_keyword_in(NON_QUERY_STATEMENTS) {
            return Err(Error::unsupported(
                self.position(),
                format!("{statement} statements"),
            ));
        }
        Err(self.unexpected("SELECT"))
    }

    fn select_list(&mut self) -> Result<SelectList, Error> {
        if self.eat_symbol(Symbol::Star) {
            if self.peek_is_symbol(Symbol::Comma) {
                return Err(Error::unsupported(
                    self.position(),
                    "mixing * with other columns",
                ));
            }
            return Ok(SelectList::Star);
        }
        let mut columns = vec![self.selected_column()?];
        while self.eat_symbol(Symbol::Comma) {
            if self.peek_is_symbol(Symbol::Star) {
                return Err(Error::unsupported(
                    self.position(),
                    "mixing * with other columns",
                ));
            }
            columns.push(self.selected_column()?);
        }
        Ok(SelectList::Columns(columns))
    }

    fn selected_column(&mut self) -> Result<SelectedColumn, Error> {
        let path = self.column_reference("literals in the select list")?;
        let alias = if self.eat_keyword("AS") {
            Some(self.identifier("an alias")?)
        } else {
            self.bare_alias()
        };
        Ok(SelectedColumn { path, alias })
    }

    fn from_clause(&mut self) -> Result<(String, Option<String>), Error> {
        self.reject_parenthesis("parenthesized FROM items")?;
        let position = self.position();
        let table = self.identifier("a table name")?;
        if table.is_empty() {
            return Err(Error::syntax(position, "empty table name"));
        }
        if self.peek_is_symbol(Symbol::Dot) {
            return Err(Error::unsupported(position, "qualified table names"));
        }
        let alias = if self.eat_keyword("AS") {
            Some(self.identifier("a table alias")?)
        } else {
            self.bare_alias()
        };
        if self.peek_is_symbol(Symbol::Comma) {
            return Err(Error::unsupported(
                self.position(),
                "multiple tables in FROM (joins)",
            ));
        }
        if self.peek_keyword_in(JOINS).is_some() {
            return Err(Error::unsupported(self.position(), "JOIN"));
        }
        Ok((table, alias))
    }

    fn conjunction(&mut self) -> Result<Vec<Predicate>, Error> {
        let mut predicates = vec![self.predicate()?];
        loop {
            if self.eat_keyword("AND") {
                predicates.push(self.predicate()?);
            } else if self.peek_is_keyword("OR") {
                return Err(Error::unsupported(self.position(), "OR"));
            } else {
                return Ok(predicates);
            }
        }
    }

    fn predicate(&mut self) -> Result<Predicate, Error> {
        let position = self.position();
        if self.peek_is_keyword("NOT") {
            return Err(Error::unsupported(position, "NOT"));
        }
        if self.peek_is_keyword("EXISTS") {
            return Err(Error::unsupported(position, "EXISTS"));
        }
        self.reject_parenthesis("parenthesized conditions")?;

        let column = self.column_path("a column")?;
        let operator = self.comparison_operator()?;
        let value = if operator == ComparisonOperator::In {
            PredicateValue::List(self.literal_list()?)
        } else {
            PredicateValue::Single(self.literal()?)
        };
        Ok(Predicate {
            column,
            operator,
            value,
            position,
        })
    }

    fn comparison_operator(&mut self) -> Result<ComparisonOperator, Error> {
        let Some(token) = self.peek() else {
            return Err(self.unexpected("a comparison operator"));
        };
        let position = token.position;
        let keyword = match &token.kind {
            TokenKind::Word(word) => Some(word.to_ascii_uppercase()),
            _ => None,
        };
        let operator = match (&token.kind, keyword.as_deref()) {
            (TokenKind::Symbol(Symbol::Equals), _) => ComparisonOperator::Equals,
            (TokenKind::Symbol(Symbol::NotEquals), _) => ComparisonOperator::NotEquals,
            (TokenKind::Symbol(Symbol::LessThan), _) => ComparisonOperator::LessThan,
            (TokenKind::Symbol(Symbol::LessThanOrEqual), _) => {
                ComparisonOperator::LessThanOrEqualTo
            }
            (TokenKind::Symbol(Symbol::GreaterThan), _) => ComparisonOperator::GreaterThan,
            (TokenKind::Symbol(Symbol::GreaterThanOrEqual), _) => {
                ComparisonOperator::GreaterThanOrEqualTo
            }
            (_, Some("IN")) => ComparisonOperator::In,
            (_, Some("NOT")) => {
                let negated = match self.peek_nth(1).map(|next| &next.kind) {
                    Some(TokenKind::Word(word)) => word.to_ascii_uppercase(),
                    _ => return Err(self.unexpected("a comparison operator")),
                };
                return Err(Error::unsupported(position, format!("NOT {negated}")));
            }
            (_, Some("LIKE" | "ILIKE")) => return Err(Error::unsupported(position, "LIKE")),
            (_, Some("IS")) => return Err(Error::unsupported(position, "IS [NOT] NULL")),
            (_, Some("BETWEEN")) => return Err(Error::unsupported(position, "BETWEEN")),
            _ => return Err(self.unexpected("a comparison operator")),
        };
        self.index += 1;
        Ok(operator)
    }

    fn literal_list(&mut self) -> Result<Vec<Literal>, Error> {
        self.expect_symbol(Symbol::LeftParen)?;
        if self.peek_is_keyword("SELECT") {
            return Err(Error::unsupported(self.position(), "subqueries"));
        }
        let mut literals = vec![self.literal()?];
        while self.eat_symbol(Symbol::Comma) {
            literals.push(self.literal()?);
        }
        self.expect_symbol(Symbol::RightParen)?;
        Ok(literals)
    }

    fn literal(&mut self) -> Result<Literal, Error> {
        let negative = self.eat_symbol(Symbol::Minus);
        let Some(token) = self.peek() else {
            return Err(self.unexpected("a literal"));
        };
        let literal = match &token.kind {
            TokenKind::Number(number) => number_literal(number, negative, token.position)?,
            _ if negative => return Err(self.unexpected("a number")),
            TokenKind::String(string) => Literal::String(string.clone()),
            TokenKind::Word(word) if word.eq_ignore_ascii_case("NULL") => Literal::Null,
            TokenKind::Word(word) if word.eq_ignore_ascii_case("TRUE") => Literal::Boolean(true),
            TokenKind::Word(word) if word.eq_ignore_ascii_case("FALSE") => {
                Literal::Boolean(false)
            }
            TokenKind::Word(word) if !contains_keyword(RESERVED, word) => {
                return Err(Error::unsupported(
                    token.position,
                    "comparisons between columns",
                ));
            }
            TokenKind::QuotedIdentifier(_) => {
                return Err(Error::unsupported(
                    token.position,
                    "comparisons between columns",
                ));
            }
            TokenKind::Symbol(Symbol::LeftParen)
                if self.peek_nth(1).is_some_and(|next| next.is_keyword("SELECT")) =>
            {
                return Err(Error::unsupported(token.position, "subqueries"));
            }
            _ => return Err(self.unexpected("a literal")),
        };
        self.index += 1;
        Ok(literal)
    }

    fn order_by_list(&mut self) -> Result<Vec<OrderByElement>, Error> {
        let mut elements = vec![];
        loop {
            let column = self.column_reference("ordering by position or expression")?;
            let direction = if self.eat_keyword("DESC") {
                OrderDirection::Desc
            } else {
                self.eat_keyword("ASC");
                OrderDirection::Asc
            };
            if self.peek_is_keyword("NULLS") {
                return Err(Error::unsupported(self.position(), "NULLS FIRST/LAST"));
            }
            elements.push(OrderByElement { column, direction });
            if !self.eat_symbol(Symbol::Comma) {
                return Ok(elements);
            }
        }
    }

    fn limit(&mut self) -> Result<u64, Error> {
        let Some(token) = self.peek() else {
            return Err(self.unexpected("a row count"));
        };
        let limit = match &token.kind {
            TokenKind::Number(number) if !number.contains('.') => number
                .parse::<u64>()
                .map_err(|_| Error::syntax(token.position, "LIMIT row count is out of range"))?,
            TokenKind::Symbol(Symbol::Minus) => {
                return Err(Error::syntax(
                    token.position,
                    "LIMIT expects a non-negative integer",
                ))
            }
            _ => return Err(self.unexpected("a row count")),
        };
        self.index += 1;
        if self.peek_is_symbol(Symbol::Comma) {
            return Err(Error::unsupported(self.position(), "OFFSET"));
        }
        Ok(limit)
    }

    /// A possibly dotted column reference in the select list or in ORDER BY.
    fn column_reference(&mut self, literal_construct: &str) -> Result<ColumnPath, Error> {
        let position = self.position();
        match self.peek().map(|token| &token.kind) {
            Some(TokenKind::Number(_) | TokenKind::String(_) | TokenKind::Symbol(Symbol::Minus)) => {
                return Err(Error::unsupported(position, literal_construct));
            }
            Some(TokenKind::Word(word)) if word.eq_ignore_ascii_case("CASE") => {
                return Err(Error::unsupported(position, "CASE expressions"));
            }
            _ => {}
        }
        self.reject_parenthesis("parenthesized expressions")?;
        self.column_path("a column")
    }

    fn column_path(&mut self, expected: &str) -> Result<ColumnPath, Error> {
        let position = self.position();
        let mut segments = vec![self.identifier(expected)?];
        while self.eat_symbol(Symbol::Dot) {
            if self.peek_is_symbol(Symbol::Star) {
                return Err(Error::unsupported(self.position(), "qualified wildcards"));
            }
            segments.push(self.field_name()?);
        }
        if self.peek_is_symbol(Symbol::LeftParen) {
            let name = segments.join(".");
            return Err(if contains_keyword(AGGREGATES, &name) {
                Error::unsupported(
                    position,
                    format!("aggregate function {}", name.to_ascii_uppercase()),
                )
            } else {
                Error::unsupported(position, format!("function call {name}"))
            });
        }
        ColumnPath::new(segments).ok_or_else(|| Error::syntax(position, "empty identifier"))
    }

    fn identifier(&mut self, expected: &str) -> Result<String, Error> {
        match self.peek().map(|token| &token.kind) {
            Some(TokenKind::Word(word)) if !contains_keyword(RESERVED, word) => {
                let word = word.clone();
                self.index += 1;
                Ok(word)
            }
            Some(TokenKind::QuotedIdentifier(identifier)) => {
                let identifier = identifier.clone();
                self.index += 1;
                Ok(identifier)
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    /// A path segment after a dot. Keywords cannot follow a dot, so any word is a field name.
    fn field_name(&mut self) -> Result<String, Error> {
        match self.peek().map(|token| &token.kind) {
            Some(TokenKind::Word(word) | TokenKind::QuotedIdentifier(word)) => {
                let word = word.clone();
                self.index += 1;
                Ok(word)
            }
            _ => Err(self.unexpected("a field name")),
        }
    }

    fn bare_alias(&mut self) -> Option<String> {
        match self.peek().map(|token| &token.kind) {
            Some(TokenKind::Word(word)) if !contains_keyword(RESERVED, word) => {
                let word = word.clone();
                self.index += 1;
                Some(word)
            }
            Some(TokenKind::QuotedIdentifier(identifier)) => {
                let identifier = identifier.clone();
                self.index += 1;
                Some(identifier)
            }
            _ => None,
        }
    }

    fn reject_parenthesis(&self, construct: &str) -> Result<(), Error> {
        if !self.peek_is_symbol(Symbol::LeftParen) {
            return Ok(());
        }
        let position = self.position();
        if self.peek_nth(1).is_some_and(|next| next.is_keyword("SELECT")) {
            Err(Error::unsupported(position, "subqueries"))
        } else {
            Err(Error::unsupported(position, construct))
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    fn peek_nth(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.index + offset)
    }

    fn position(&self) -> usize {
        self.peek().map_or(self.end, |token| token.position)
    }

    fn peek_is_keyword(&self, keyword: &str) -> bool {
        self.peek().is_some_and(|token| token.is_keyword(keyword))
    }

    fn peek_is_symbol(&self, symbol: Symbol) -> bool {
        self.peek().is_some_and(|token| token.is_symbol(symbol))
    }

    /// The upper-cased keyword under the cursor, if it is one of `keywords`.
    fn peek_keyword_in(&self, keywords: &[&str]) -> Option<String> {
        match self.peek().map(|token| &token.kind) {
            Some(TokenKind::Word(word)) if contains_keyword(keywords, word) => {
                Some(word.to_ascii_uppercase())
            }
            _ => None,
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        let found = self.peek_is_keyword(keyword);
        if found {
            self.index += 1;
        }
        found
    }

    fn eat_symbol(&mut self, symbol: Symbol) -> bool {
        let found = self.peek_is_symbol(symbol);
        if found {
            self.index += 1;
        }
        found
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<(), Error> {
        if self.eat_keyword(keyword) {
            Ok(())
        } else {
            Err(self.unexpected(keyword))
        }
    }

    fn expect_symbol(&mut self, symbol: Symbol) -> Result<(), Error> {
        if self.eat_symbol(symbol) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{}'", symbol.text())))
        }
    }

    fn unexpected(&self, expected: &str) -> Error {
        match self.peek() {
            Some(token) => Error::syntax(
                token.position,
                format!("expected {expected}, found {}", token.kind),
            ),
            None => Error::syntax(self.end, format!("expected {expected}, found end of input")),
        }
    }
}

fn number_literal(number: &str, negative: bool, position: usize) -> Result<Literal, Error> {
    let signed = if negative {
        format!("-{number}")
    } else {
        number.to_string()
    };
    if number.contains('.') {
        signed
            .parse::<f64>()
            .map(Literal::Float)
            .map_err(|_| Error::syntax(position, format!("invalid number {signed}")))
    } else {
        signed
            .parse::<i64>()
            .map(Literal::Integer)
            .map_err(|_| Error::syntax(position, format!("integer {signed} is out of range")))
    }
}

/// Drop a leading table-alias segment from every column path.
///
/// Only a declared alias is stripped: without one a field may share the table's name.
fn strip_table_alias(mut statement: SqlStatement) -> SqlStatement {
    let Some(alias) = statement.table_alias.clone() else {
        return statement;
    };
    let strip = |path: &mut ColumnPath| {
        if let Some(stripped) = path.strip_prefix(&alias) {
            *path = stripped;
        }
    };
    if let SelectList::Columns(columns) = &mut statement.select_list {
        for column in columns {
            strip(&mut column.path);
        }
    }
    for predicate in &mut statement.predicates {
        strip(&mut predicate.column);
    }
    for element in &mut statement.order_by {
        strip(&mut element.column);
    }
    statement
}
