//! Source parser
//!
//! This module transforms obfuscated expression text into a normalized
//! [`Tree`]:
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`] and [`expressions`]: Grammar-aware parsing (tokens → AST)
//! - [`brackets`]: Grammar-free parsing by delimiter matching
//! - [`ast`]: AST node definitions
//!
//! # Supported Dialect
//!
//! The grammar-aware strategy covers the JavaScript subset JSFuck-style code
//! is written in:
//! - Literals: numbers, strings, arrays, objects, identifiers
//! - Operators: prefix unary, binary with JavaScript precedence
//! - Member access and calls
//! - `;`-separated expression statements
//!
//! Statements, assignment, functions and the like are rejected with a
//! [`SyntaxError`].
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with precedence climbing for binary operators.
//! No external parser generator dependencies.

pub mod ast;
pub mod brackets;
pub mod expressions;
pub mod lexer;
pub mod parse;

pub use brackets::Delimiter;
pub use parse::SyntaxError;

use crate::tree::{normalize::normalize, Tree};
use std::fmt;
use std::str::FromStr;

/// How source text is turned into a tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Full expression grammar
    #[default]
    Grammar,
    /// Matching pairs of one delimiter, no grammar
    Brackets(Delimiter),
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Grammar => write!(f, "grammar"),
            Strategy::Brackets(delimiter) => write!(f, "brackets {}", delimiter),
        }
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "grammar" => Ok(Strategy::Grammar),
            "brackets" => Ok(Strategy::Brackets(Delimiter::default())),
            other => Err(format!("unknown strategy '{}'", other)),
        }
    }
}

/// Parse `source` with `strategy`, normalize, and lay the result out as a tree
pub fn parse(source: &str, strategy: Strategy) -> Result<Tree, SyntaxError> {
    let expr = match strategy {
        Strategy::Grammar => parse::Parser::new(source)?.parse_program()?,
        Strategy::Brackets(delimiter) => brackets::parse_brackets(source, delimiter)?,
    };

    Ok(Tree::from_expr(source, &normalize(expr)))
}
