//! Expression parsing implementation
//!
//! Binary operators are parsed by precedence climbing; everything else by
//! recursive descent. Groupings and prefix operators count toward
//! [`MAX_NESTING_DEPTH`](crate::parser::parse::MAX_NESTING_DEPTH), so a left-assoc
//! chain of any length parses in a loop but `((((...` is cut off.
//!
//! # Supported Expressions
//!
//! - Literals: numbers, strings, identifiers
//! - Array literals `[a, b]` and object literals `{k: v}`
//! - Parenthesized expressions (kept as [`ExprKind::Paren`] for the normalizer)
//! - Prefix unary: `!`, `+`, `-`, `~`, `typeof`, `void`
//! - Postfix: `[]`, `.`, `()`
//! - Binary: logical, bitwise, equality, relational, shift, arithmetic
//!
//! # Precedence
//!
//! From loosest to tightest: `||`, `&&`, `|`, `^`, `&`, equality, relational,
//! shift, additive, multiplicative. All binary levels are left-associative.

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{Parser, SyntaxError};

/// Binary operator and its precedence for the current token, if any
fn binary_op(token: &Token) -> Option<(BinOp, u8)> {
    let entry = match token {
        Token::OrOr(_) => (BinOp::Or, 1),
        Token::AndAnd(_) => (BinOp::And, 2),
        Token::Pipe(_) => (BinOp::BitOr, 3),
        Token::Caret(_) => (BinOp::BitXor, 4),
        Token::Amp(_) => (BinOp::BitAnd, 5),
        Token::EqEq(_) => (BinOp::LooseEq, 6),
        Token::NotEq(_) => (BinOp::LooseNe, 6),
        Token::EqEqEq(_) => (BinOp::StrictEq, 6),
        Token::NotEqEq(_) => (BinOp::StrictNe, 6),
        Token::Lt(_) => (BinOp::Lt, 7),
        Token::Le(_) => (BinOp::Le, 7),
        Token::Gt(_) => (BinOp::Gt, 7),
        Token::Ge(_) => (BinOp::Ge, 7),
        Token::LtLt(_) => (BinOp::Shl, 8),
        Token::GtGt(_) => (BinOp::Shr, 8),
        Token::GtGtGt(_) => (BinOp::UShr, 8),
        Token::Plus(_) => (BinOp::Add, 9),
        Token::Minus(_) => (BinOp::Sub, 9),
        Token::Star(_) => (BinOp::Mul, 10),
        Token::Slash(_) => (BinOp::Div, 10),
        Token::Percent(_) => (BinOp::Mod, 10),
        _ => return None,
    };
    Some(entry)
}

fn unary_op(token: &Token) -> Option<UnOp> {
    match token {
        Token::Bang(_) => Some(UnOp::Not),
        Token::Plus(_) => Some(UnOp::Plus),
        Token::Minus(_) => Some(UnOp::Neg),
        Token::Tilde(_) => Some(UnOp::BitNot),
        Token::Typeof(_) => Some(UnOp::Typeof),
        Token::Void(_) => Some(UnOp::Void),
        _ => None,
    }
}

impl Parser {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, SyntaxError> {
        self.nested(|parser| parser.parse_binary(1))
    }

    /// Precedence climbing over every binary level at or above `min_prec`
    fn parse_binary(&mut self, min_prec: u8) -> Result<Expr, SyntaxError> {
        let mut left = self.parse_unary()?;

        while let Some((op, prec)) = binary_op(self.peek()) {
            if prec < min_prec {
                break;
            }
            self.advance();

            let right = self.parse_binary(prec + 1)?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }

        Ok(left)
    }

    /// Parse prefix unary operators (right-associative)
    fn parse_unary(&mut self) -> Result<Expr, SyntaxError> {
        if let Some(op) = unary_op(self.peek()) {
            let start = self.advance().span();
            let operand = self.nested(Self::parse_unary)?;
            let span = start.merge(operand.span);
            return Ok(Expr::new(
                ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                },
                span,
            ));
        }

        self.parse_postfix()
    }

    /// Parse postfix member access and calls (`[]`, `.`, `()`)
    fn parse_postfix(&mut self) -> Result<Expr, SyntaxError> {
        let mut expr = self.parse_primary()?;

        loop {
            let span = self.current_span();

            if self.match_token(&Token::LBracket(span)) {
                let property = self.parse_expression()?;
                let close = self.expect_token(
                    &Token::RBracket(self.current_span()),
                    "Expected ']' after property expression",
                )?;
                let span = expr.span.merge(close);
                expr = Expr::new(
                    ExprKind::Member {
                        object: Box::new(expr),
                        property: Box::new(property),
                        computed: true,
                    },
                    span,
                );
            } else if self.match_token(&Token::Dot(span)) {
                let (name, name_span) = self.expect_identifier()?;
                let span = expr.span.merge(name_span);
                expr = Expr::new(
                    ExprKind::Member {
                        object: Box::new(expr),
                        property: Box::new(Expr::new(ExprKind::Ident(name), name_span)),
                        computed: false,
                    },
                    span,
                );
            } else if self.match_token(&Token::LParen(span)) {
                let args = self.parse_argument_list()?;
                let close = self.expect_token(
                    &Token::RParen(self.current_span()),
                    "Expected ')' after call arguments",
                )?;
                let span = expr.span.merge(close);
                expr = Expr::new(
                    ExprKind::Call {
                        callee: Box::new(expr),
                        args,
                    },
                    span,
                );
            } else {
                break;
            }
        }

        Ok(expr)
    }

    /// Parse argument list: (expr, expr, ...)
    fn parse_argument_list(&mut self) -> Result<Vec<Expr>, SyntaxError> {
        let mut args = Vec::new();

        while !self.check(&Token::RParen(self.current_span())) {
            args.push(self.parse_expression()?);

            if !self.match_token(&Token::Comma(self.current_span())) {
                break;
            }
        }

        Ok(args)
    }

    /// Parse primary (literals, identifiers, groupings)
    fn parse_primary(&mut self) -> Result<Expr, SyntaxError> {
        let span = self.current_span();

        match self.peek().clone() {
            Token::Number(n, span) => {
                self.advance();
                Ok(Expr::new(ExprKind::Number(n), span))
            }
            Token::Str(s, span) => {
                self.advance();
                Ok(Expr::new(ExprKind::Str(s), span))
            }
            Token::Ident(name, span) => {
                self.advance();
                match name.as_str() {
                    "function" | "new" | "var" | "let" | "const" | "return" | "if" | "for"
                    | "while" | "class" | "delete" | "in" | "instanceof" => Err(SyntaxError::new(
                        format!("Unsupported construct: keyword '{}'", name),
                        span,
                    )),
                    _ => Ok(Expr::new(ExprKind::Ident(name), span)),
                }
            }
            Token::LParen(_) => {
                self.advance();
                if self.check(&Token::RParen(self.current_span())) {
                    return Err(SyntaxError::new(
                        "Empty parentheses are not an expression",
                        span.merge(self.current_span()),
                    ));
                }
                let inner = self.parse_expression()?;
                if self.check(&Token::Comma(self.current_span())) {
                    return Err(SyntaxError::new(
                        "Unsupported construct: comma sequence",
                        self.current_span(),
                    ));
                }
                let close = self.expect_token(
                    &Token::RParen(self.current_span()),
                    "Expected ')' after expression",
                )?;
                Ok(Expr::new(ExprKind::Paren(Box::new(inner)), span.merge(close)))
            }
            Token::LBracket(_) => {
                self.advance();
                self.parse_array_literal(span)
            }
            Token::LBrace(_) => {
                self.advance();
                self.parse_object_literal(span)
            }
            other => Err(SyntaxError::new(format!("Unexpected token {}", other), span)),
        }
    }

    /// Parse array literal after its opening '['
    fn parse_array_literal(&mut self, open: Span) -> Result<Expr, SyntaxError> {
        let mut elements = Vec::new();

        while !self.check(&Token::RBracket(self.current_span())) {
            if self.check(&Token::Comma(self.current_span())) {
                return Err(SyntaxError::new(
                    "Unsupported construct: array hole",
                    self.current_span(),
                ));
            }
            elements.push(self.parse_expression()?);

            if !self.match_token(&Token::Comma(self.current_span())) {
                break;
            }
        }

        let close = self.expect_token(
            &Token::RBracket(self.current_span()),
            "Expected ']' after array elements",
        )?;
        Ok(Expr::new(ExprKind::Array(elements), open.merge(close)))
    }

    /// Parse object literal after its opening '{'
    fn parse_object_literal(&mut self, open: Span) -> Result<Expr, SyntaxError> {
        let mut properties = Vec::new();

        while !self.check(&Token::RBrace(self.current_span())) {
            let (key, computed) = self.parse_property_key()?;
            self.expect_token(
                &Token::Colon(self.current_span()),
                "Expected ':' after property key",
            )?;
            let value = self.parse_expression()?;
            properties.push(Property {
                key,
                value,
                computed,
            });

            if !self.match_token(&Token::Comma(self.current_span())) {
                break;
            }
        }

        let close = self.expect_token(
            &Token::RBrace(self.current_span()),
            "Expected '}' after object properties",
        )?;
        Ok(Expr::new(ExprKind::Object(properties), open.merge(close)))
    }

    /// Parse `name`, `"name"`, `0` or `[expr]` in key position
    fn parse_property_key(&mut self) -> Result<(Expr, bool), SyntaxError> {
        match self.peek().clone() {
            Token::Ident(name, span) => {
                self.advance();
                Ok((Expr::new(ExprKind::Str(name), span), false))
            }
            Token::Str(s, span) => {
                self.advance();
                Ok((Expr::new(ExprKind::Str(s), span), false))
            }
            Token::Number(n, span) => {
                self.advance();
                Ok((Expr::new(ExprKind::Number(n), span), false))
            }
            Token::LBracket(_) => {
                self.advance();
                let key = self.parse_expression()?;
                self.expect_token(
                    &Token::RBracket(self.current_span()),
                    "Expected ']' after computed key",
                )?;
                Ok((key, true))
            }
            other => Err(SyntaxError::new(
                format!("Expected property key, found {}", other),
                other.span(),
            )),
        }
    }
}
