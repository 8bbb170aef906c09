//! Bracket-matching strategy
//!
//! Builds an expression tree with no grammar at all: every matching pair of
//! the chosen delimiter becomes a [`ExprKind::Group`] node. Quoted strings are
//! skipped so a delimiter inside a literal does not count.

use crate::parser::ast::{Expr, ExprKind, Span};
use crate::parser::parse::SyntaxError;
use std::fmt;
use std::str::FromStr;

/// Grouping delimiter used by the bracket-matching strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    #[default]
    Paren,
    Bracket,
    Brace,
}

impl Delimiter {
    pub fn open(&self) -> char {
        match self {
            Delimiter::Paren => '(',
            Delimiter::Bracket => '[',
            Delimiter::Brace => '{',
        }
    }

    pub fn close(&self) -> char {
        match self {
            Delimiter::Paren => ')',
            Delimiter::Bracket => ']',
            Delimiter::Brace => '}',
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.open(), self.close())
    }
}

impl FromStr for Delimiter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "(" | ")" | "()" | "paren" => Ok(Delimiter::Paren),
            "[" | "]" | "[]" | "bracket" => Ok(Delimiter::Bracket),
            "{" | "}" | "{}" | "brace" => Ok(Delimiter::Brace),
            other => Err(format!("unknown delimiter '{}'", other)),
        }
    }
}

/// A pair still waiting for its closing delimiter
struct OpenPair {
    start: usize,
    children: Vec<Expr>,
}

/// Parse `source` by matching `delimiter` pairs.
///
/// The root spans the whole source with surrounding whitespace trimmed. A
/// pair (or the root) whose trimmed contents are exactly one nested pair is
/// emitted as [`ExprKind::Paren`] so the normalizer can fold it.
pub fn parse_brackets(source: &str, delimiter: Delimiter) -> Result<Expr, SyntaxError> {
    let (open, close) = (delimiter.open(), delimiter.close());
    let mut stack: Vec<OpenPair> = Vec::new();
    let mut top_level = Vec::new();
    let mut chars = source.char_indices();

    while let Some((i, ch)) = chars.next() {
        if ch == '"' || ch == '\'' || ch == '`' {
            // Skip the literal; a missing closing quote just runs to the end
            let mut escaped = false;
            for (_, c) in chars.by_ref() {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == ch {
                    break;
                }
            }
            continue;
        }

        if ch == open {
            stack.push(OpenPair {
                start: i,
                children: Vec::new(),
            });
        } else if ch == close {
            let pair = stack.pop().ok_or_else(|| {
                SyntaxError::new(
                    format!("Unmatched closing '{}'", close),
                    Span::new(i, i + ch.len_utf8()),
                )
            })?;
            let span = Span::new(pair.start, i + ch.len_utf8());
            let inner = trim_span(source, Span::new(span.start + 1, span.end - 1));
            let group = group_node(pair.children, span, inner);

            match stack.last_mut() {
                Some(parent) => parent.children.push(group),
                None => top_level.push(group),
            }
        }
    }

    if let Some(pair) = stack.pop() {
        return Err(SyntaxError::new(
            format!("Unmatched opening '{}'", open),
            Span::new(pair.start, pair.start + open.len_utf8()),
        ));
    }

    let root = trim_span(source, Span::new(0, source.len()));
    Ok(group_node(top_level, root, root))
}

/// `Paren` when `children` is one pair filling `inner`, `Group` otherwise
fn group_node(mut children: Vec<Expr>, span: Span, inner: Span) -> Expr {
    if children.len() == 1 && children[0].span == inner {
        let only = children.remove(0);
        Expr::new(ExprKind::Paren(Box::new(only)), span)
    } else {
        Expr::new(ExprKind::Group(children), span)
    }
}

/// Shrink `span` past leading and trailing whitespace
fn trim_span(source: &str, span: Span) -> Span {
    let text = span.text(source);
    let leading = text.len() - text.trim_start().len();
    let trimmed = text.trim();
    Span::new(span.start + leading, span.start + leading + trimmed.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_pairs() {
        let expr = parse_brackets("(1+2)*(3)", Delimiter::Paren).unwrap();

        assert_eq!(expr.span, Span::new(0, 9));
        match expr.into_kind() {
            ExprKind::Group(children) => {
                assert_eq!(children.len(), 2);
                assert_eq!(children[0].span, Span::new(0, 5));
                assert_eq!(children[1].span, Span::new(6, 9));
            }
            other => panic!("Expected group, got {:?}", other),
        }
    }

    #[test]
    fn test_single_pair_is_wrap() {
        let expr = parse_brackets(" ((a)(b)) \n", Delimiter::Paren).unwrap();

        assert_eq!(expr.span, Span::new(1, 9));
        match expr.into_kind() {
            ExprKind::Paren(inner) => {
                assert_eq!(inner.span, Span::new(1, 9));
                assert!(matches!(inner.kind, ExprKind::Group(ref c) if c.len() == 2));
            }
            other => panic!("Expected wrap, got {:?}", other),
        }
    }

    #[test]
    fn test_quoted_delimiters_ignored() {
        let expr = parse_brackets("f(\")\")", Delimiter::Paren).unwrap();
        match expr.into_kind() {
            ExprKind::Group(children) => {
                assert_eq!(children.len(), 1);
                assert_eq!(children[0].span, Span::new(1, 6));
            }
            other => panic!("Expected group, got {:?}", other),
        }
    }

    #[test]
    fn test_other_delimiter() {
        let expr = parse_brackets("[[]][+[]]", Delimiter::Bracket).unwrap();
        match expr.into_kind() {
            ExprKind::Group(children) => assert_eq!(children.len(), 2),
            other => panic!("Expected group, got {:?}", other),
        }
    }

    #[test]
    fn test_unmatched_closer() {
        let err = parse_brackets("1)", Delimiter::Paren).unwrap_err();
        assert_eq!(err.message, "Unmatched closing ')'");
        assert_eq!(err.span, Span::new(1, 2));
    }

    #[test]
    fn test_unmatched_opener() {
        let err = parse_brackets("(()", Delimiter::Paren).unwrap_err();
        assert_eq!(err.message, "Unmatched opening '('");
        assert_eq!(err.span, Span::new(0, 1));
    }
}
