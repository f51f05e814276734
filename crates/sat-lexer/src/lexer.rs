//! Core SAT lexer: converts source text into nested token streams.
//!
//! The file is lexed as an implicitly closed block. Each statement becomes
//! one [`TokenStream`]; blocks, objects, arrays and pipes recurse into their
//! own streams. Unknown characters are skipped.

use std::collections::BTreeMap;

use sat_types::{Config, ErrorCode, Location, Result, SatError};

use crate::reader::Reader;
use crate::token::{Special, Token, TokenKind, TokenStream};

const BLOCK_END: &[char] = &['\n', ';', '}'];
const PIPE_END: &[char] = &['\n', ';'];
const OBJECT_END: &[char] = &['}', ','];
const ARRAY_END: &[char] = &[']', ','];

/// What the stream being lexed will be used as. A `{` that opens a value
/// is an object literal rather than a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Statement,
    Value,
}

/// The SAT lexer.
pub struct Lexer<'cfg> {
    reader: Reader,
    config: &'cfg Config,
}

impl<'cfg> Lexer<'cfg> {
    pub fn new(file: &str, contents: &str, config: &'cfg Config) -> Self {
        Self {
            reader: Reader::new(file, contents),
            config,
        }
    }

    /// Lex the whole input into one stream per top-level statement.
    pub fn lex(mut self) -> Result<Vec<TokenStream>> {
        self.config.trace("lex", self.reader.debug());
        let start = self.reader.location();
        self.lex_block(start, true)
    }

    // ─────────────────────────────────────────────────────────────
    // Statement sequences
    // ─────────────────────────────────────────────────────────────

    /// Collect statements until `}` (or end of input when `top_level`).
    /// Empty statements are dropped.
    fn lex_block(&mut self, start: Location, top_level: bool) -> Result<Vec<TokenStream>> {
        self.config.trace("lex_block", self.reader.debug());
        let mut statements = Vec::new();
        loop {
            let (stream, ending) = self.lex_until(BLOCK_END, Slot::Statement)?;
            if !stream.is_empty() {
                statements.push(stream);
            }
            match ending {
                Some('}') => {
                    self.reader.advance();
                    return Ok(statements);
                }
                Some(_) => {
                    self.reader.advance();
                }
                None if top_level => return Ok(statements),
                None => {
                    return Err(SatError::new(
                        ErrorCode::UNTERMINATED_BLOCK,
                        "unterminated block, expected '}'",
                        start,
                    ));
                }
            }
        }
    }

    /// Lex tokens until one of `until` is under the cursor. The terminator
    /// is returned but not consumed; `None` means end of input.
    fn lex_until(&mut self, until: &[char], slot: Slot) -> Result<(TokenStream, Option<char>)> {
        self.config.trace("lex_until", self.reader.debug());
        let mut stream = TokenStream::new(self.reader.location());
        while let Some(c) = self.reader.current() {
            if until.contains(&c) {
                return Ok((stream, Some(c)));
            }
            match c {
                '\n' | ';' => {
                    self.reader.advance();
                    stream.push(Token::new(TokenKind::Eol, self.reader.location()));
                }
                ':' => {
                    let token = self.lex_pipe(until)?;
                    stream.push(token);
                }
                '=' => {
                    let location = self.reader.location();
                    let special = if self.reader.advance() == Some('=') {
                        self.reader.advance();
                        Special::Equality
                    } else {
                        Special::Assign
                    };
                    stream.push(Token::new(TokenKind::Special(special), location));
                }
                '.' => {
                    stream.push(Token::new(TokenKind::Dot, self.reader.location()));
                    self.reader.advance();
                }
                ',' => {
                    stream.push(Token::new(TokenKind::Comma, self.reader.location()));
                    self.reader.advance();
                }
                '"' => {
                    let token = self.lex_string()?;
                    stream.push(token);
                }
                '{' => {
                    let location = self.reader.location();
                    self.reader.advance();
                    let token = if opens_object(&stream, slot) {
                        self.lex_object(location)?
                    } else {
                        let statements = self.lex_block(location.clone(), false)?;
                        Token::new(TokenKind::Block(statements), location)
                    };
                    stream.push(token);
                }
                '[' => {
                    let token = self.lex_array()?;
                    stream.push(token);
                }
                c if c.is_alphabetic() || c == '_' => stream.push(self.lex_symbol()),
                c if c.is_ascii_digit() => stream.push(self.lex_number()),
                _ => {
                    self.reader.advance();
                }
            }
        }
        Ok((stream, None))
    }

    // ─────────────────────────────────────────────────────────────
    // Nested forms
    // ─────────────────────────────────────────────────────────────

    /// `: ...` runs to the end of the statement. It also stops at whatever
    /// terminates the enclosing stream, so `{ assert: true }` closes.
    fn lex_pipe(&mut self, outer: &[char]) -> Result<Token> {
        self.config.trace("lex_pipe", self.reader.debug());
        let location = self.reader.location();
        self.reader.advance();
        let mut until = PIPE_END.to_vec();
        until.extend(outer.iter().filter(|c| !PIPE_END.contains(c)));
        let (stream, _) = self.lex_until(&until, Slot::Value)?;
        Ok(Token::new(TokenKind::Pipe(stream), location))
    }

    fn lex_object(&mut self, location: Location) -> Result<Token> {
        self.config.trace("lex_object", self.reader.debug());
        let mut props = BTreeMap::new();
        let mut key = String::new();
        loop {
            match self.reader.current() {
                None => {
                    return Err(SatError::new(
                        ErrorCode::UNTERMINATED_OBJECT,
                        "unterminated object, expected '}'",
                        location,
                    ));
                }
                Some('"') => {
                    let token = self.lex_string()?;
                    if let TokenKind::String(value) = token.kind {
                        key = value;
                    }
                }
                Some(c) if is_word_char(c) => {
                    key = self.read_word();
                }
                Some(':') => {
                    self.reader.advance();
                    let (value, ending) = self.lex_until(OBJECT_END, Slot::Value)?;
                    props.insert(std::mem::take(&mut key), value);
                    match ending {
                        Some('}') => {
                            self.reader.advance();
                            return Ok(Token::new(TokenKind::Object(props), location));
                        }
                        Some(_) => {
                            self.reader.advance();
                        }
                        None => {
                            return Err(SatError::new(
                                ErrorCode::UNTERMINATED_OBJECT,
                                "unterminated object, expected '}'",
                                location,
                            ));
                        }
                    }
                }
                // Empty object or trailing comma.
                Some('}') => {
                    self.reader.advance();
                    return Ok(Token::new(TokenKind::Object(props), location));
                }
                Some(_) => {
                    self.reader.advance();
                }
            }
        }
    }

    fn lex_array(&mut self) -> Result<Token> {
        self.config.trace("lex_array", self.reader.debug());
        let location = self.reader.location();
        self.reader.advance();
        let mut items = Vec::new();
        loop {
            let (item, ending) = self.lex_until(ARRAY_END, Slot::Value)?;
            match ending {
                Some(']') => {
                    self.reader.advance();
                    // `[]` and a trailing comma leave a blank last item.
                    if !item.is_blank() {
                        items.push(item);
                    }
                    return Ok(Token::new(TokenKind::Array(items), location));
                }
                Some(_) => {
                    self.reader.advance();
                    items.push(item);
                }
                None => {
                    return Err(SatError::new(
                        ErrorCode::UNTERMINATED_ARRAY,
                        "unterminated array, expected ']'",
                        location,
                    ));
                }
            }
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Literals
    // ─────────────────────────────────────────────────────────────

    /// `\x` produces a literal `x`.
    fn lex_string(&mut self) -> Result<Token> {
        self.config.trace("lex_string", self.reader.debug());
        let location = self.reader.location();
        let unterminated = |location: Location| {
            SatError::new(
                ErrorCode::UNTERMINATED_STRING,
                "unterminated string, expected '\"'",
                location,
            )
        };
        let mut value = String::new();
        self.reader.advance();
        loop {
            match self.reader.current() {
                None => return Err(unterminated(location)),
                Some('\\') => {
                    let escaped = self
                        .reader
                        .advance()
                        .ok_or_else(|| unterminated(location.clone()))?;
                    value.push(escaped);
                    self.reader.advance();
                }
                Some('"') => {
                    self.reader.advance();
                    return Ok(Token::new(TokenKind::String(value), location));
                }
                Some(c) => {
                    value.push(c);
                    self.reader.advance();
                }
            }
        }
    }

    /// Digits and `.` are kept, `_` separators are dropped.
    fn lex_number(&mut self) -> Token {
        self.config.trace("lex_number", self.reader.debug());
        let location = self.reader.location();
        let mut number = String::new();
        while let Some(c) = self.reader.current() {
            match c {
                c if c.is_ascii_digit() => number.push(c),
                // `items.0.id` keeps the dot as a path separator
                '.' if self.reader.peek().is_some_and(|c| c.is_ascii_digit()) => number.push('.'),
                '_' => {}
                _ => break,
            }
            self.reader.advance();
        }
        Token::new(TokenKind::Number(number), location)
    }

    fn lex_symbol(&mut self) -> Token {
        self.config.trace("lex_symbol", self.reader.debug());
        let location = self.reader.location();
        let symbol = self.read_word();
        Token::new(TokenKind::Symbol(symbol), location)
    }

    fn read_word(&mut self) -> String {
        let mut word = String::new();
        while let Some(c) = self.reader.current().filter(|&c| is_word_char(c)) {
            word.push(c);
            self.reader.advance();
        }
        word
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// `{` after an operator or pipe, or at the start of a value, is an object.
fn opens_object(stream: &TokenStream, slot: Slot) -> bool {
    let previous = stream
        .tokens()
        .iter()
        .rev()
        .find(|token| token.kind != TokenKind::Eol);
    match previous {
        Some(token) => matches!(token.kind, TokenKind::Special(_) | TokenKind::Pipe(_)),
        None => slot == Slot::Value,
    }
}

/// Lex `contents` with the default configuration.
pub fn lex(file: &str, contents: &str) -> Result<Vec<TokenStream>> {
    let config = Config::default();
    Lexer::new(file, contents, &config).lex()
}
