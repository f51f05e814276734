//! Keyword forms: `test "name" { ... }` and the piped commands
//! (`assert:`, `get:`, `run:`, `spawn:`, `kill:`, `healthcheck:`).

use sat_lexer::{Token, TokenKind, TokenStream};
use sat_types::ast::{ExprKind, Expression};
use sat_types::scope::ScopeId;
use sat_types::{ErrorCode, Location, Result};

use crate::parser::Parser;

impl Parser<'_> {
    /// `test "name" { ... }`. The cursor sits just past `test`.
    pub(crate) fn parse_test(
        &mut self,
        location: Location,
        tokens: &mut TokenStream,
        scope: ScopeId,
    ) -> Result<Expression> {
        self.config.trace("parse_test", &location);
        let name = match tokens.bump() {
            Some(Token {
                kind: TokenKind::String(name),
                ..
            }) => name,
            Some(token) => {
                return Err(self.error(
                    ErrorCode::EXPECTED_TEST_NAME,
                    format!("expected test name to be a string, found '{}'", token.kind),
                    token.location,
                ));
            }
            None => {
                return Err(self.error(
                    ErrorCode::EXPECTED_TEST_NAME,
                    "expected test name",
                    location,
                ));
            }
        };

        let (statements, block_location) = match tokens.bump() {
            Some(Token {
                kind: TokenKind::Block(statements),
                location,
            }) => (statements, location),
            Some(token) => {
                return Err(self.error(
                    ErrorCode::EXPECTED_BLOCK,
                    format!("expected block for test '{name}', found '{}'", token.kind),
                    token.location,
                ));
            }
            None => {
                return Err(self.error(
                    ErrorCode::EXPECTED_BLOCK,
                    format!("expected block for test '{name}'"),
                    location,
                ));
            }
        };

        let block = self.parse_block(&statements, block_location, scope)?;
        Ok(Expression::new(ExprKind::Test { name, block }, location))
    }

    /// `<keyword>: <expression>`. The cursor sits just past the keyword.
    pub(crate) fn parse_piped(
        &mut self,
        keyword: &str,
        location: Location,
        tokens: &mut TokenStream,
        scope: ScopeId,
    ) -> Result<Expression> {
        self.config.trace("parse_piped", format_args!("{keyword} at {location}"));
        let pipe = match tokens.bump() {
            Some(Token {
                kind: TokenKind::Pipe(pipe),
                ..
            }) => pipe,
            Some(token) => {
                return Err(self.error(
                    ErrorCode::EXPECTED_PIPE,
                    format!("expected ':' after '{keyword}', found '{}'", token.kind),
                    token.location,
                ));
            }
            None => {
                return Err(self.error(
                    ErrorCode::EXPECTED_PIPE,
                    format!("expected ':' after '{keyword}'"),
                    location,
                ));
            }
        };

        let operand = Box::new(self.parse_expression(pipe, scope)?);
        let kind = match keyword {
            "assert" => ExprKind::Assert(operand),
            "get" => ExprKind::Get(operand),
            "run" => ExprKind::Run(operand),
            "spawn" => ExprKind::Spawn(operand),
            "kill" => ExprKind::Kill(operand),
            "healthcheck" => ExprKind::Healthcheck(operand),
            other => {
                return Err(self.error(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!("'{other}' does not take a ':' operand"),
                    location,
                ));
            }
        };
        Ok(Expression::new(kind, location))
    }
}
