//! Evaluation error types for the reference interpreter
//!
//! This module defines [`HostError`], the JavaScript-style failures an
//! evaluation can raise. The stepper wraps them together with the span of
//! the node being evaluated.

use crate::parser::SyntaxError;

/// Errors that can occur while evaluating a source fragment
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HostError {
    /// The fragment (or a `Function` body) does not parse
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// Operation applied to a value of the wrong type
    #[error("TypeError: {0}")]
    Type(String),

    /// Unbound identifier
    #[error("ReferenceError: {0}")]
    Reference(String),

    /// Argument out of range, or call depth exhausted
    #[error("RangeError: {0}")]
    Range(String),
}

impl HostError {
    /// JavaScript constructor name of the error
    pub fn name(&self) -> &'static str {
        match self {
            HostError::Syntax(_) => "SyntaxError",
            HostError::Type(_) => "TypeError",
            HostError::Reference(_) => "ReferenceError",
            HostError::Range(_) => "RangeError",
        }
    }

    pub(crate) fn not_defined(name: &str) -> Self {
        HostError::Reference(format!("{} is not defined", name))
    }

    pub(crate) fn not_a_function(what: &str) -> Self {
        HostError::Type(format!("{} is not a function", what))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::Span;

    #[test]
    fn test_error_display() {
        assert_eq!(
            HostError::not_defined("a").to_string(),
            "ReferenceError: a is not defined"
        );
        assert_eq!(
            HostError::Range("Invalid array length".to_string()).to_string(),
            "RangeError: Invalid array length"
        );

        let syntax = HostError::from(SyntaxError::new("Unexpected token ')'", Span::new(0, 1)));
        assert_eq!(syntax.name(), "SyntaxError");
        assert_eq!(syntax.to_string(), "Syntax error at 0..1: Unexpected token ')'");
    }
}
