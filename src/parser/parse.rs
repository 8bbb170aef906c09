//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including the error type, helper methods, and the program entry point.
//!
//! # Parser Architecture
//!
//! - This module: Parser struct, helper methods, `;`-separated program
//! - `expressions`: expressions with precedence climbing
//!
//! Parser methods are split across files using `impl Parser` blocks, so each
//! module extends the Parser with related functionality while sharing the
//! token cursor.

use crate::parser::ast::*;
use crate::parser::lexer::{LexError, Lexer, Token};

/// Malformed or unsupported source, with the offending span
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Syntax error at {}..{}: {message}", span.start, span.end)]
pub struct SyntaxError {
    pub message: String,
    pub span: Span,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }

    /// Render the error with the offending source line and a caret marker
    pub fn excerpt(&self, source: &str) -> String {
        let start = self.span.start.min(source.len());
        let line_start = source[..start].rfind('\n').map_or(0, |i| i + 1);
        let line_end = source[start..]
            .find('\n')
            .map_or(source.len(), |i| start + i);
        let line = &source[line_start..line_end];
        let column = source[line_start..start].chars().count();
        let width = source[start..self.span.end.clamp(start, line_end)]
            .chars()
            .count()
            .max(1);

        format!(
            "{}\n  {}\n  {}{}",
            self,
            line,
            " ".repeat(column),
            "^".repeat(width)
        )
    }
}

impl From<LexError> for SyntaxError {
    fn from(err: LexError) -> Self {
        SyntaxError {
            message: err.message,
            span: err.span,
        }
    }
}

/// Deepest nesting of groupings and prefix operators the parser accepts
pub const MAX_NESTING_DEPTH: usize = 256;

/// Recursive descent parser for the grammar-aware strategy
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    /// Current nesting, bounded by [`MAX_NESTING_DEPTH`]
    pub(crate) depth: usize,
}

impl Parser {
    pub fn new(source: &str) -> Result<Self, SyntaxError> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize()?;
        Ok(Self {
            tokens,
            position: 0,
            depth: 0,
        })
    }

    /// Parse the entire program: expression statements separated by `;`
    pub fn parse_program(&mut self) -> Result<Expr, SyntaxError> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            if self.match_token(&Token::Semicolon(self.current_span())) {
                continue;
            }

            statements.push(self.parse_expression()?);

            if !self.is_at_end() {
                self.expect_token(
                    &Token::Semicolon(self.current_span()),
                    "Expected ';' after expression",
                )?;
            }
        }

        let span = match (statements.first(), statements.last()) {
            (Some(first), Some(last)) => first.span.merge(last.span),
            _ => Span::new(self.current_span().start, self.current_span().start),
        };

        Ok(Expr::new(ExprKind::Program(statements), span))
    }

    // ===== Helper methods =====

    pub(crate) fn match_token(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn check(&self, token: &Token) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(token)
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.position += 1;
        }
        self.previous()
    }

    pub(crate) fn is_at_end(&self) -> bool {
        matches!(self.peek(), Token::Eof(_))
    }

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.position]
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.position.saturating_sub(1)]
    }

    pub(crate) fn current_span(&self) -> Span {
        self.peek().span()
    }

    pub(crate) fn expect_token(&mut self, token: &Token, message: &str) -> Result<Span, SyntaxError> {
        if self.check(token) {
            Ok(self.advance().span())
        } else {
            Err(SyntaxError::new(
                format!("{}, found {}", message, self.peek()),
                self.current_span(),
            ))
        }
    }

    /// Run `parse` one nesting level deeper, failing past [`MAX_NESTING_DEPTH`]
    pub(crate) fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, SyntaxError>,
    ) -> Result<T, SyntaxError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(SyntaxError::new(
                format!("Expression nested deeper than {} levels", MAX_NESTING_DEPTH),
                self.current_span(),
            ));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    pub(crate) fn expect_identifier(&mut self) -> Result<(String, Span), SyntaxError> {
        if let Token::Ident(name, span) = self.peek() {
            let ident = (name.clone(), *span);
            self.advance();
            Ok(ident)
        } else {
            Err(SyntaxError::new(
                format!("Expected identifier, found {}", self.peek()),
                self.current_span(),
            ))
        }
    }
}
