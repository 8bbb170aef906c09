//! Unary operator evaluation

use crate::interpreter::coercion::{to_boolean, to_int32, to_number};
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::HostError;
use crate::parser::ast::{Expr, ExprKind, UnOp};
use crate::runtime::{Environment, Value};

impl Interpreter {
    pub(crate) fn evaluate_unary_op(
        &mut self,
        op: UnOp,
        operand: &Expr,
        env: &mut Environment,
    ) -> Result<Value, HostError> {
        // `typeof` of an unbound name is "undefined", not a ReferenceError
        if op == UnOp::Typeof {
            if let ExprKind::Ident(name) = &operand.kind {
                if !self.is_bound(name, env) {
                    return Ok(Value::str("undefined"));
                }
            }
        }

        let value = self.evaluate_expr(operand, env)?;
        Ok(apply_unary(op, &value))
    }
}

/// Apply a prefix operator to an evaluated operand
pub fn apply_unary(op: UnOp, value: &Value) -> Value {
    match op {
        UnOp::Not => Value::Bool(!to_boolean(value)),
        UnOp::Plus => Value::Number(to_number(value)),
        UnOp::Neg => Value::Number(-to_number(value)),
        UnOp::BitNot => Value::Number(f64::from(!to_int32(value))),
        UnOp::Typeof => Value::str(value.type_of()),
        UnOp::Void => Value::Undefined,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jsfuck_primitives() {
        let empty = Value::array(vec![]);

        assert!(matches!(apply_unary(UnOp::Not, &empty), Value::Bool(false)));
        assert!(matches!(apply_unary(UnOp::Plus, &empty), Value::Number(n) if n == 0.0));
        assert!(matches!(apply_unary(UnOp::Plus, &Value::Bool(true)), Value::Number(n) if n == 1.0));
        assert!(matches!(apply_unary(UnOp::BitNot, &empty), Value::Number(n) if n == -1.0));
    }

    #[test]
    fn test_typeof_and_void() {
        assert!(matches!(apply_unary(UnOp::Typeof, &Value::Null), Value::Str(ref s) if s == "object"));
        assert!(matches!(apply_unary(UnOp::Void, &Value::Number(1.0)), Value::Undefined));
    }

    #[test]
    fn test_negation_of_string() {
        assert!(matches!(apply_unary(UnOp::Neg, &Value::str("3")), Value::Number(n) if n == -3.0));
        assert!(matches!(apply_unary(UnOp::Neg, &Value::str("x")), Value::Number(n) if n.is_nan()));
    }
}
