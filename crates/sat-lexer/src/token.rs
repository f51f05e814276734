//! Token types for the SAT lexer.
//!
//! Tokens are nested: blocks, objects, arrays and pipes own the
//! [`TokenStream`]s lexed inside them.

use sat_types::Location;
use std::collections::BTreeMap;
use std::fmt;

/// Symbols the parser treats as keywords rather than variable refs.
pub const KEYWORDS: &[&str] = &[
    "true",
    "false",
    "test",
    "assert",
    "get",
    "run",
    "spawn",
    "kill",
    "healthcheck",
];

// ─────────────────────────────────────────────────────────────────────
// Token
// ─────────────────────────────────────────────────────────────────────

/// A single token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub location: Location,
}

impl Token {
    pub fn new(kind: TokenKind, location: Location) -> Self {
        Self { kind, location }
    }

    /// Returns `true` if this is a Symbol naming a keyword.
    pub fn is_keyword(&self) -> bool {
        matches!(&self.kind, TokenKind::Symbol(s) if KEYWORDS.contains(&s.as_str()))
    }
}

/// Binary operators that split a statement in two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Special {
    /// `=`
    Assign,
    /// `==`
    Equality,
}

impl fmt::Display for Special {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Special::Assign => f.write_str("="),
            Special::Equality => f.write_str("=="),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Identifier or keyword: `res`, `assert`
    Symbol(String),
    /// String literal with escapes resolved
    String(String),
    /// Numeric literal text with `_` separators removed: `1000000`, `23.0`
    Number(String),
    Special(Special),
    /// `{ ... }` holding one stream per statement
    Block(Vec<TokenStream>),
    /// `{ key: value, ... }`
    Object(BTreeMap<String, TokenStream>),
    /// `[ item, ... ]`
    Array(Vec<TokenStream>),
    /// `: ...` up to the end of the statement
    Pipe(TokenStream),
    Comma,
    Dot,
    /// Line break inside a pipe, object or array
    Eol,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Symbol(s) => f.write_str(s),
            TokenKind::String(s) => write!(f, "\"{s}\""),
            TokenKind::Number(n) => f.write_str(n),
            TokenKind::Special(s) => write!(f, "{s}"),
            TokenKind::Block(_) => f.write_str("block"),
            TokenKind::Object(_) => f.write_str("object"),
            TokenKind::Array(_) => f.write_str("array"),
            TokenKind::Pipe(_) => f.write_str("pipe"),
            TokenKind::Comma => f.write_str(","),
            TokenKind::Dot => f.write_str("."),
            TokenKind::Eol => f.write_str("end of line"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────
// TokenStream
// ─────────────────────────────────────────────────────────────────────

/// An ordered run of tokens with a read cursor.
///
/// `start` is where lexing of the stream began. It locates errors on
/// streams that turned out empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenStream {
    tokens: Vec<Token>,
    cursor: usize,
    start: Location,
}

impl TokenStream {
    pub fn new(start: Location) -> Self {
        Self {
            tokens: Vec::new(),
            cursor: 0,
            start,
        }
    }

    pub fn from_tokens(tokens: Vec<Token>, start: Location) -> Self {
        Self {
            tokens,
            cursor: 0,
            start,
        }
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Returns `true` if the stream holds nothing but line breaks.
    pub fn is_blank(&self) -> bool {
        self.tokens.iter().all(|t| t.kind == TokenKind::Eol)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// The token under the cursor.
    pub fn token(&self) -> Option<&Token> {
        self.tokens.get(self.cursor)
    }

    /// The token at absolute index `i`, ignoring the cursor.
    pub fn at(&self, i: usize) -> Option<&Token> {
        self.tokens.get(i)
    }

    /// The token after the cursor.
    pub fn next(&self) -> Option<&Token> {
        self.tokens.get(self.cursor + 1)
    }

    pub fn last(&self) -> Option<&Token> {
        self.tokens.last()
    }

    /// Move the cursor forward and return the token now under it.
    pub fn advance(&mut self) -> Option<&Token> {
        if self.cursor < self.tokens.len() {
            self.cursor += 1;
        }
        self.token()
    }

    /// Clone the token under the cursor and move past it.
    pub fn bump(&mut self) -> Option<Token> {
        let token = self.token().cloned();
        self.advance();
        token
    }

    /// Move the cursor past any `Eol` tokens.
    pub fn skip_eol(&mut self) {
        while matches!(self.token(), Some(t) if t.kind == TokenKind::Eol) {
            self.cursor += 1;
        }
    }

    /// Location of the token under the cursor, falling back to the last
    /// token and then to where the stream started.
    pub fn location(&self) -> Location {
        self.token()
            .or_else(|| self.last())
            .map(|t| t.location.clone())
            .unwrap_or_else(|| self.start.clone())
    }

    /// Split around the first [`Special`] token at or after the cursor.
    ///
    /// Returns the operator plus the tokens before and after it; the
    /// operator itself is dropped. `None` if the stream has no operator.
    pub fn split_on_first_special(&self) -> Option<(Special, TokenStream, TokenStream)> {
        let rest = &self.tokens[self.cursor.min(self.tokens.len())..];
        let index = rest
            .iter()
            .position(|t| matches!(t.kind, TokenKind::Special(_)))?;
        let TokenKind::Special(special) = rest[index].kind else {
            return None;
        };
        let operator = rest[index].location.clone();
        let left = TokenStream::from_tokens(rest[..index].to_vec(), self.location());
        let right = TokenStream::from_tokens(rest[index + 1..].to_vec(), operator);
        Some((special, left, right))
    }
}

impl From<Vec<Token>> for TokenStream {
    fn from(tokens: Vec<Token>) -> Self {
        let start = tokens
            .first()
            .map(|t| t.location.clone())
            .unwrap_or_default();
        Self::from_tokens(tokens, start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(name: &str, col: u32) -> Token {
        Token::new(TokenKind::Symbol(name.into()), Location::new("f", 1, col))
    }

    fn op(special: Special, col: u32) -> Token {
        Token::new(TokenKind::Special(special), Location::new("f", 1, col))
    }

    #[test]
    fn test_cursor_navigation() {
        let mut stream = TokenStream::from(vec![sym("a", 1), sym("b", 3), sym("c", 5)]);
        assert_eq!(stream.token().unwrap().location.col, 1);
        assert_eq!(stream.next().unwrap().location.col, 3);
        stream.advance();
        assert_eq!(stream.token().unwrap().location.col, 3);
        stream.advance();
        stream.advance();
        assert!(stream.token().is_none());
        assert!(stream.advance().is_none());
        assert_eq!(stream.location().col, 5);
    }

    #[test]
    fn test_split_on_first_special() {
        let stream = TokenStream::from(vec![
            sym("a", 1),
            op(Special::Assign, 3),
            sym("b", 5),
            op(Special::Equality, 7),
            sym("c", 10),
        ]);
        let (special, left, right) = stream.split_on_first_special().unwrap();
        assert_eq!(special, Special::Assign);
        assert_eq!(left.len(), 1);
        assert_eq!(right.len(), 3);
        assert_eq!(right.at(1).unwrap().kind, TokenKind::Special(Special::Equality));
    }

    #[test]
    fn test_split_without_special() {
        let stream = TokenStream::from(vec![sym("a", 1), sym("b", 3)]);
        assert!(stream.split_on_first_special().is_none());
    }

    #[test]
    fn test_split_with_empty_side_keeps_location() {
        let stream = TokenStream::from(vec![sym("a", 1), op(Special::Assign, 3)]);
        let (_, _, right) = stream.split_on_first_special().unwrap();
        assert!(right.is_empty());
        assert_eq!(right.location().col, 3);
    }

    #[test]
    fn test_skip_eol_and_blank() {
        let eol = Token::new(TokenKind::Eol, Location::new("f", 2, 1));
        let mut stream = TokenStream::from(vec![eol.clone(), sym("a", 1)]);
        assert!(!stream.is_blank());
        stream.skip_eol();
        assert_eq!(stream.token().unwrap().kind, TokenKind::Symbol("a".into()));
        assert!(TokenStream::from(vec![eol]).is_blank());
    }

    #[test]
    fn test_is_keyword() {
        assert!(sym("healthcheck", 1).is_keyword());
        assert!(!sym("health", 1).is_keyword());
    }
}
