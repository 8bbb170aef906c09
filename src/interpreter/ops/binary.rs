//! Binary operator evaluation

use crate::interpreter::coercion::{
    to_boolean, to_int32, to_number, to_primitive, to_string, to_uint32,
};
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::HostError;
use crate::parser::ast::{BinOp, Expr, ExprKind};
use crate::runtime::{Environment, Value};
use std::cmp::Ordering;

impl Interpreter {
    /// Evaluate `left op right`, walking a left-assoc chain such as
    /// `a+b+c+...` in a loop so its length does not add nesting depth
    pub(crate) fn evaluate_binary_op(
        &mut self,
        op: BinOp,
        left: &Expr,
        right: &Expr,
        env: &mut Environment,
    ) -> Result<Value, HostError> {
        let mut pending = vec![(op, right)];
        let mut leftmost = left;
        while let ExprKind::Binary { op, left, right } = &leftmost.kind {
            pending.push((*op, right.as_ref()));
            leftmost = left.as_ref();
        }

        let mut acc = self.evaluate_expr(leftmost, env)?;
        for (op, right) in pending.into_iter().rev() {
            // Logical operators yield one of their operands, unconverted
            acc = match op {
                BinOp::And if !to_boolean(&acc) => acc,
                BinOp::Or if to_boolean(&acc) => acc,
                BinOp::And | BinOp::Or => self.evaluate_expr(right, env)?,
                _ => {
                    let right = self.evaluate_expr(right, env)?;
                    apply_binary(op, &acc, &right)
                }
            };
        }
        Ok(acc)
    }
}

/// Apply a non-short-circuit binary operator to evaluated operands
pub fn apply_binary(op: BinOp, left: &Value, right: &Value) -> Value {
    use BinOp::*;

    match op {
        Add => add(left, right),
        Sub => Value::Number(to_number(left) - to_number(right)),
        Mul => Value::Number(to_number(left) * to_number(right)),
        Div => Value::Number(to_number(left) / to_number(right)),
        // Rust's `%` on f64 truncates like JavaScript's
        Mod => Value::Number(to_number(left) % to_number(right)),
        LooseEq => Value::Bool(loose_equals(left, right)),
        LooseNe => Value::Bool(!loose_equals(left, right)),
        StrictEq => Value::Bool(left.strict_equals(right)),
        StrictNe => Value::Bool(!left.strict_equals(right)),
        Lt => Value::Bool(compare(left, right) == Some(Ordering::Less)),
        Gt => Value::Bool(compare(left, right) == Some(Ordering::Greater)),
        Le => Value::Bool(matches!(
            compare(left, right),
            Some(Ordering::Less | Ordering::Equal)
        )),
        Ge => Value::Bool(matches!(
            compare(left, right),
            Some(Ordering::Greater | Ordering::Equal)
        )),
        BitAnd => int32(to_int32(left) & to_int32(right)),
        BitOr => int32(to_int32(left) | to_int32(right)),
        BitXor => int32(to_int32(left) ^ to_int32(right)),
        Shl => int32(to_int32(left).wrapping_shl(to_uint32(right) & 31)),
        Shr => int32(to_int32(left).wrapping_shr(to_uint32(right) & 31)),
        UShr => Value::Number(f64::from(to_uint32(left) >> (to_uint32(right) & 31))),
        And => {
            if to_boolean(left) {
                right.clone()
            } else {
                left.clone()
            }
        }
        Or => {
            if to_boolean(left) {
                left.clone()
            } else {
                right.clone()
            }
        }
    }
}

fn int32(n: i32) -> Value {
    Value::Number(f64::from(n))
}

/// `+`: string concatenation if either primitive is a string, else addition
fn add(left: &Value, right: &Value) -> Value {
    let left = to_primitive(left);
    let right = to_primitive(right);

    if matches!(left, Value::Str(_)) || matches!(right, Value::Str(_)) {
        let mut s = to_string(&left);
        s.push_str(&to_string(&right));
        Value::Str(s)
    } else {
        Value::Number(to_number(&left) + to_number(&right))
    }
}

/// Abstract relational comparison; `None` when either side is `NaN`
fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (to_primitive(left), to_primitive(right)) {
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(&b)),
        (a, b) => to_number(&a).partial_cmp(&to_number(&b)),
    }
}

/// Abstract equality (`==`)
pub fn loose_equals(left: &Value, right: &Value) -> bool {
    use Value::*;

    match (left, right) {
        (Undefined | Null, Undefined | Null) => true,
        (Undefined | Null, _) | (_, Undefined | Null) => false,
        (Number(_), Str(_)) | (Str(_), Number(_)) => to_number(left) == to_number(right),
        (Bool(_), _) => loose_equals(&Number(to_number(left)), right),
        (_, Bool(_)) => loose_equals(left, &Number(to_number(right))),
        (Array(_) | Object(_) | Function(_), Number(_) | Str(_)) => {
            loose_equals(&to_primitive(left), right)
        }
        (Number(_) | Str(_), Array(_) | Object(_) | Function(_)) => {
            loose_equals(left, &to_primitive(right))
        }
        _ => left.strict_equals(right),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: f64) -> Value {
        Value::Number(n)
    }

    #[test]
    fn test_add_concatenates_objects() {
        let empty = Value::array(vec![]);
        assert!(matches!(add(&empty, &empty), Value::Str(ref s) if s.is_empty()));
        assert!(matches!(add(&Value::Bool(true), &num(1.0)), Value::Number(n) if n == 2.0));
        assert!(matches!(add(&Value::Bool(false), &empty), Value::Str(ref s) if s == "false"));
    }

    #[test]
    fn test_loose_equality() {
        let empty = Value::array(vec![]);

        assert!(loose_equals(&empty, &num(0.0)));
        assert!(loose_equals(&empty, &Value::Bool(false)));
        assert!(loose_equals(&Value::Null, &Value::Undefined));
        assert!(!loose_equals(&Value::Null, &num(0.0)));
        assert!(loose_equals(&Value::str("1"), &Value::Bool(true)));
        assert!(!loose_equals(&empty, &Value::array(vec![])));
    }

    #[test]
    fn test_relational() {
        assert!(matches!(apply_binary(BinOp::Lt, &Value::str("a"), &Value::str("b")), Value::Bool(true)));
        assert!(matches!(apply_binary(BinOp::Lt, &Value::str("10"), &num(9.0)), Value::Bool(false)));
        assert!(matches!(apply_binary(BinOp::Ge, &num(f64::NAN), &num(1.0)), Value::Bool(false)));
    }

    #[test]
    fn test_bitwise_and_shifts() {
        assert!(matches!(apply_binary(BinOp::BitOr, &num(1.5), &num(2.0)), Value::Number(n) if n == 3.0));
        assert!(matches!(apply_binary(BinOp::Shl, &num(1.0), &num(33.0)), Value::Number(n) if n == 2.0));
        assert!(matches!(apply_binary(BinOp::Shr, &num(-8.0), &num(1.0)), Value::Number(n) if n == -4.0));
        assert!(matches!(
            apply_binary(BinOp::UShr, &num(-1.0), &num(0.0)),
            Value::Number(n) if n == 4_294_967_295.0
        ));
    }

    #[test]
    fn test_modulo_sign_follows_dividend() {
        assert!(matches!(apply_binary(BinOp::Mod, &num(-7.0), &num(3.0)), Value::Number(n) if n == -1.0));
    }
}
