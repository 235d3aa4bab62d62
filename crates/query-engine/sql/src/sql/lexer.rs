//! Split SQL text into tokens.
//!
//! Whitespace and comments are insignificant between tokens, so a statement spread
//! over several lines lexes exactly like its single-line equivalent.

use std::fmt;

use nom::branch::alt;
use nom::bytes::complete::{is_not, tag, take_until, take_while};
use nom::character::complete::{char, digit1, multispace1, not_line_ending, satisfy};
use nom::combinator::{map, opt, recognize, value};
use nom::multi::many0;
use nom::sequence::{delimited, pair};
use nom::{IResult, Parser};

use super::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Comma,
    Dot,
    Star,
    LeftParen,
    RightParen,
    Semicolon,
    Minus,
    Equals,
    NotEquals,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
}

impl Symbol {
    pub fn text(self) -> &'static str {
        match self {
            Symbol::Comma => ",",
            Symbol::Dot => ".",
            Symbol::Star => "*",
            Symbol::LeftParen => "(",
            Symbol::RightParen => ")",
            Symbol::Semicolon => ";",
            Symbol::Minus => "-",
            Symbol::Equals => "=",
            Symbol::NotEquals => "<>",
            Symbol::LessThan => "<",
            Symbol::LessThanOrEqual => "<=",
            Symbol::GreaterThan => ">",
            Symbol::GreaterThanOrEqual => ">=",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// A bare word: a keyword or an unquoted identifier.
    Word(String),
    /// A double-quoted identifier, unescaped.
    QuotedIdentifier(String),
    /// A single-quoted string literal, unescaped.
    String(String),
    /// An unsigned numeric literal as written.
    Number(String),
    Symbol(Symbol),
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Word(word) => write!(f, "'{word}'"),
            TokenKind::QuotedIdentifier(identifier) => write!(f, "\"{identifier}\""),
            TokenKind::String(string) => write!(f, "string '{string}'"),
            TokenKind::Number(number) => write!(f, "number {number}"),
            TokenKind::Symbol(symbol) => write!(f, "'{}'", symbol.text()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the first character of the token.
    pub position: usize,
}

impl Token {
    /// Case-insensitive keyword test.
    pub fn is_keyword(&self, keyword: &str) -> bool {
        matches!(&self.kind, TokenKind::Word(word) if word.eq_ignore_ascii_case(keyword))
    }

    pub fn is_symbol(&self, symbol: Symbol) -> bool {
        self.kind == TokenKind::Symbol(symbol)
    }
}

/// Tokenize a whole statement.
pub fn tokenize(input: &str) -> Result<Vec<Token>, Error> {
    let mut tokens = vec![];
    let mut rest = input;
    loop {
        // trivia never fails; it matches zero or more whitespace and comment runs.
        if let Ok((after_trivia, ())) = trivia(rest) {
            rest = after_trivia;
        }
        if rest.is_empty() {
            return Ok(tokens);
        }
        let position = input.len() - rest.len();
        match token(rest) {
            Ok((remaining, kind)) => {
                tokens.push(Token { kind, position });
                rest = remaining;
            }
            Err(_) => return Err(Error::syntax(position, describe_failure(rest))),
        }
    }
}

fn describe_failure(rest: &str) -> String {
    if rest.starts_with('\'') {
        "unterminated string literal".to_string()
    } else if rest.starts_with('"') {
        "unterminated quoted identifier".to_string()
    } else if rest.starts_with("/*") {
        "unterminated comment".to_string()
    } else {
        match rest.chars().next() {
            Some(character) => format!("unexpected character '{character}'"),
            None => "unexpected end of input".to_string(),
        }
    }
}

fn trivia(input: &str) -> IResult<&str, ()> {
    value(
        (),
        many0(alt((
            multispace1,
            recognize(pair(tag("--"), not_line_ending)),
            recognize(delimited(tag("/*"), take_until("*/"), tag("*/"))),
        ))),
    )
    .parse(input)
}

fn token(input: &str) -> IResult<&str, TokenKind> {
    alt((
        map(string_literal, TokenKind::String),
        map(quoted_identifier, TokenKind::QuotedIdentifier),
        map(number, |number: &str| TokenKind::Number(number.to_string())),
        map(word, |word: &str| TokenKind::Word(word.to_string())),
        map(symbol, TokenKind::Symbol),
    ))
    .parse(input)
}

/// `'...'` with `''` standing for a single quote.
fn string_literal(input: &str) -> IResult<&str, String> {
    let (rest, body) = delimited(
        char('\''),
        recognize(many0(alt((is_not("'"), tag("''"))))),
        char('\''),
    )
    .parse(input)?;
    Ok((rest, body.replace("''", "'")))
}

/// `"..."` with `""` standing for a single double quote.
fn quoted_identifier(input: &str) -> IResult<&str, String> {
    let (rest, body) = delimited(
        char('"'),
        recognize(many0(alt((is_not("\""), tag("\"\""))))),
        char('"'),
    )
    .parse(input)?;
    Ok((rest, body.replace("\"\"", "\"")))
}

fn number(input: &str) -> IResult<&str, &str> {
    recognize(pair(digit1, opt(pair(char('.'), digit1)))).parse(input)
}

fn word(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c: char| c.is_alphabetic() || c == '_'),
        take_while(|c: char| c.is_alphanumeric() || c == '_'),
    ))
    .parse(input)
}

fn symbol(input: &str) -> IResult<&str, Symbol> {
    alt((
        value(Symbol::LessThanOrEqual, tag("<=")),
        value(Symbol::GreaterThanOrEqual, tag(">=")),
        value(Symbol::NotEquals, tag("<>")),
        value(Symbol::NotEquals, tag("!=")),
        value(Symbol::Equals, tag("=")),
        value(Symbol::LessThan, tag("<")),
        value(Symbol::GreaterThan, tag(">")),
        value(Symbol::Comma, tag(",")),
        value(Symbol::Dot, tag(".")),
        value(Symbol::Star, tag("*")),
        value(Symbol::LeftParen, tag("(")),
        value(Symbol::RightParen, tag(")")),
        value(Symbol::Semicolon, tag(";")),
        value(Symbol::Minus, tag("-")),
    ))
    .parse(input)
}
