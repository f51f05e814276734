//! Core parser infrastructure: scope allocation, program assembly, errors.

use sat_lexer::TokenStream;
use sat_types::ast::{Block, Program};
use sat_types::scope::{ScopeId, Scopes};
use sat_types::{Config, ErrorCode, Location, Result, SatError};

/// The SAT parser.
///
/// Turns the lexer's statement streams into an expression tree. Every block
/// gets its own scope in the arena, linked to the scope it appears in.
/// Parsing stops at the first error.
pub struct Parser<'cfg> {
    pub(crate) scopes: Scopes,
    pub(crate) config: &'cfg Config,
}

impl<'cfg> Parser<'cfg> {
    pub fn new(config: &'cfg Config) -> Self {
        Self {
            scopes: Scopes::new(),
            config,
        }
    }

    /// Parse top-level statements into a [`Program`] rooted in a fresh scope.
    pub fn parse(mut self, statements: Vec<TokenStream>) -> Result<Program> {
        self.config
            .trace("parse", format_args!("{} statements", statements.len()));
        let root = self.scopes.push(None);
        let expressions = statements
            .into_iter()
            .map(|statement| self.parse_expression(statement, root))
            .collect::<Result<Vec<_>>>()?;
        Ok(Program {
            expressions,
            scopes: self.scopes,
            root,
        })
    }

    /// Parse block statements into a new child scope of `parent`.
    pub(crate) fn parse_block(
        &mut self,
        statements: &[TokenStream],
        location: Location,
        parent: ScopeId,
    ) -> Result<Block> {
        self.config.trace("parse_block", &location);
        let scope = self.scopes.push(Some(parent));
        let expressions = statements
            .iter()
            .map(|statement| self.parse_expression(statement.clone(), scope))
            .collect::<Result<Vec<_>>>()?;
        Ok(Block {
            expressions,
            scope,
            location,
        })
    }

    pub(crate) fn error(
        &self,
        code: ErrorCode,
        message: impl Into<String>,
        location: Location,
    ) -> SatError {
        SatError::new(code, message, location)
    }
}

/// Parse with the given configuration.
pub fn parse(statements: Vec<TokenStream>, config: &Config) -> Result<Program> {
    Parser::new(config).parse(statements)
}
