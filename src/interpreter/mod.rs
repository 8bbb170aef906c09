//! Reference JavaScript interpreter
//!
//! The stepper only needs something that turns a source fragment into a
//! [`Value`]; that seam is [`HostEvaluator`]. [`Interpreter`] is the built-in
//! implementation, covering the expression subset JSFuck output is made of:
//!
//! - [`engine`]: expression evaluation, calls and `Function(...)` bodies
//! - [`ops`]: operators and property access
//! - [`builtins`]: global functions (`String`, `Array`, `escape`, ...)
//! - [`methods`]: prototype methods (`"a".italics()`, `[].flat`, ...)
//! - [`coercion`]: the implicit type conversions
//! - [`errors`]: the error values an evaluation can raise
//!
//! # Host Environment
//!
//! Every evaluation gets the same [`Environment`], so names bound with
//! [`define_binding`] are visible to all later fragments.

pub mod builtins;
pub mod coercion;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod methods;
pub mod ops;

pub use engine::Interpreter;
pub use errors::HostError;

use crate::parser::ast::Span;
use crate::parser::SyntaxError;
use crate::runtime::{Environment, Value};

/// Evaluates a complete source fragment against an environment
pub trait HostEvaluator {
    fn evaluate(&mut self, source: &str, env: &mut Environment) -> Result<Value, HostError>;
}

/// Evaluate `source` and bind the result to `name` in `env`
///
/// Returns the bound value. A previous binding of the same name is replaced.
pub fn define_binding(
    evaluator: &mut dyn HostEvaluator,
    env: &mut Environment,
    name: &str,
    source: &str,
) -> Result<Value, HostError> {
    if !engine::is_identifier(name) {
        return Err(HostError::Syntax(SyntaxError::new(
            format!("Invalid binding name '{}'", name),
            Span::new(0, name.len()),
        )));
    }

    let value = evaluator.evaluate(source, env)?;
    log::debug!("bound {} = {:?}", name, value);
    env.define(name, value.clone());
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_binding() {
        let mut interpreter = Interpreter::new();
        let mut env = Environment::with_globals();

        let value = define_binding(&mut interpreter, &mut env, "t", "!![]").unwrap();
        assert!(matches!(value, Value::Bool(true)));
        assert!(matches!(env.lookup("t"), Some(Value::Bool(true))));

        let err = define_binding(&mut interpreter, &mut env, "1x", "0").unwrap_err();
        assert_eq!(err.name(), "SyntaxError");
        assert!(!env.contains("1x"));
    }

    #[test]
    fn test_failed_binding_keeps_previous() {
        let mut interpreter = Interpreter::new();
        let mut env = Environment::with_globals();

        define_binding(&mut interpreter, &mut env, "x", "1").unwrap();
        assert!(define_binding(&mut interpreter, &mut env, "x", "nope").is_err());
        assert!(matches!(env.lookup("x"), Some(Value::Number(n)) if *n == 1.0));
    }
}
