//! Expression dispatch, operators, refs and literals.

use std::collections::BTreeMap;

use sat_lexer::{Special, Token, TokenKind, TokenStream};
use sat_types::ast::{ExprKind, Expression, Primitive};
use sat_types::scope::ScopeId;
use sat_types::{ErrorCode, Location, Result};

use crate::parser::Parser;

impl Parser<'_> {
    /// Parse one statement or sub-expression.
    ///
    /// A stream containing `=` or `==` is split at the first one and both
    /// halves are parsed on their own. Otherwise the leading token decides
    /// the form. Trailing tokens other than line breaks are an error.
    pub fn parse_expression(
        &mut self,
        mut tokens: TokenStream,
        scope: ScopeId,
    ) -> Result<Expression> {
        self.config.trace("parse_expression", tokens.location());

        if let Some((special, left, right)) = tokens.split_on_first_special() {
            return self.parse_operator(special, left, right, scope);
        }

        tokens.skip_eol();
        let Some(token) = tokens.token().cloned() else {
            return Err(self.error(
                ErrorCode::EXPECTED_EXPRESSION,
                "expected expression",
                tokens.location(),
            ));
        };

        let expression = match token.kind {
            TokenKind::Symbol(_) => self.parse_symbol(&mut tokens, scope)?,
            TokenKind::Number(_) => self.parse_number(&mut tokens)?,
            TokenKind::String(value) => {
                tokens.advance();
                Expression::primitive(Primitive::String(value), token.location)
            }
            TokenKind::Object(props) => {
                tokens.advance();
                self.parse_object(props, token.location, scope)?
            }
            TokenKind::Array(items) => {
                tokens.advance();
                self.parse_array(items, token.location, scope)?
            }
            TokenKind::Block(statements) => {
                tokens.advance();
                let block = self.parse_block(&statements, token.location.clone(), scope)?;
                Expression::new(ExprKind::Block(block), token.location)
            }
            other => {
                return Err(self.error(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!("unexpected token '{other}'"),
                    token.location,
                ));
            }
        };

        self.expect_end(&mut tokens)?;
        Ok(expression)
    }

    fn parse_operator(
        &mut self,
        special: Special,
        left: TokenStream,
        right: TokenStream,
        scope: ScopeId,
    ) -> Result<Expression> {
        self.config.trace("parse_operator", special);
        let left = Box::new(self.parse_expression(left, scope)?);
        let right = Box::new(self.parse_expression(right, scope)?);
        let location = left.location.clone();
        let kind = match special {
            Special::Assign => ExprKind::Assignment { left, right },
            Special::Equality => ExprKind::Equality { left, right },
        };
        Ok(Expression::new(kind, location))
    }

    /// Error on anything but line breaks left in the stream.
    pub(crate) fn expect_end(&self, tokens: &mut TokenStream) -> Result<()> {
        tokens.skip_eol();
        match tokens.token() {
            None => Ok(()),
            Some(token) => Err(self.error(
                ErrorCode::UNEXPECTED_TOKEN,
                format!("unexpected token '{}' after expression", token.kind),
                token.location.clone(),
            )),
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Symbols
    // ─────────────────────────────────────────────────────────────

    fn parse_symbol(&mut self, tokens: &mut TokenStream, scope: ScopeId) -> Result<Expression> {
        self.config.trace("parse_symbol", tokens.location());
        match tokens.next().map(|t| &t.kind) {
            Some(TokenKind::Dot) => return self.parse_ref(tokens),
            Some(TokenKind::Comma) => return self.parse_multi_ref(tokens),
            _ => {}
        }

        let Some(token) = tokens.token().cloned() else {
            return Err(self.error(
                ErrorCode::EXPECTED_EXPRESSION,
                "expected symbol",
                tokens.location(),
            ));
        };
        if !token.is_keyword() {
            return self.parse_ref(tokens);
        }
        let Token {
            kind: TokenKind::Symbol(symbol),
            location,
        } = token
        else {
            return self.parse_ref(tokens);
        };

        tokens.advance();
        match symbol.as_str() {
            "true" | "false" => {
                let value = Primitive::Boolean(symbol == "true");
                Ok(Expression::primitive(value, location))
            }
            "test" => self.parse_test(location, tokens, scope),
            keyword => self.parse_piped(keyword, location, tokens, scope),
        }
    }

    /// `name` or a dotted path such as `res.items.0.id`.
    pub(crate) fn parse_ref(&mut self, tokens: &mut TokenStream) -> Result<Expression> {
        self.config.trace("parse_ref", tokens.location());
        let location = tokens.location();
        let path = self.parse_path(tokens)?;
        Ok(Expression::new(ExprKind::Ref(path), location))
    }

    fn parse_path(&self, tokens: &mut TokenStream) -> Result<String> {
        let mut path = self.parse_segment(tokens)?;
        while matches!(tokens.token(), Some(t) if t.kind == TokenKind::Dot) {
            tokens.advance();
            path.push('.');
            path.push_str(&self.parse_segment(tokens)?);
        }
        Ok(path)
    }

    fn parse_segment(&self, tokens: &mut TokenStream) -> Result<String> {
        match tokens.bump() {
            Some(Token {
                kind: TokenKind::Symbol(segment) | TokenKind::Number(segment),
                ..
            }) => Ok(segment),
            Some(token) => Err(self.error(
                ErrorCode::UNEXPECTED_TOKEN,
                format!("expected name in reference, found '{}'", token.kind),
                token.location,
            )),
            None => Err(self.error(
                ErrorCode::UNEXPECTED_TOKEN,
                "expected name in reference",
                tokens.location(),
            )),
        }
    }

    /// `a, b, c` as a destructuring target.
    fn parse_multi_ref(&mut self, tokens: &mut TokenStream) -> Result<Expression> {
        self.config.trace("parse_multi_ref", tokens.location());
        let location = tokens.location();
        let mut refs = Vec::new();
        loop {
            refs.push(self.parse_path(tokens)?);
            match tokens.token() {
                Some(t) if t.kind == TokenKind::Comma => {
                    tokens.advance();
                }
                _ => break,
            }
        }
        Ok(Expression::new(ExprKind::MultiRef(refs), location))
    }

    // ─────────────────────────────────────────────────────────────
    // Literals
    // ─────────────────────────────────────────────────────────────

    fn parse_number(&self, tokens: &mut TokenStream) -> Result<Expression> {
        self.config.trace("parse_number", tokens.location());
        let Some(Token {
            kind: TokenKind::Number(text),
            location,
        }) = tokens.bump()
        else {
            return Err(self.error(
                ErrorCode::INVALID_NUMBER,
                "expected number",
                tokens.location(),
            ));
        };
        let value: f32 = text.parse().map_err(|_| {
            self.error(
                ErrorCode::INVALID_NUMBER,
                format!("invalid number '{text}'"),
                location.clone(),
            )
        })?;
        Ok(Expression::primitive(Primitive::Number(value), location))
    }

    fn parse_object(
        &mut self,
        props: BTreeMap<String, TokenStream>,
        location: Location,
        scope: ScopeId,
    ) -> Result<Expression> {
        self.config.trace("parse_object", &location);
        let mut object = BTreeMap::new();
        for (key, value) in props {
            object.insert(key, self.parse_expression(value, scope)?);
        }
        Ok(Expression::primitive(Primitive::Object(object), location))
    }

    fn parse_array(
        &mut self,
        items: Vec<TokenStream>,
        location: Location,
        scope: ScopeId,
    ) -> Result<Expression> {
        self.config.trace("parse_array", &location);
        let items = items
            .into_iter()
            .map(|item| self.parse_expression(item, scope))
            .collect::<Result<Vec<_>>>()?;
        Ok(Expression::primitive(Primitive::Array(items), location))
    }
}
