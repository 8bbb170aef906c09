//! Built-in global function implementations
//!
//! These are the functions [`Environment::with_globals`] binds. Prototype
//! methods live in [`crate::interpreter::methods`].
//!
//! # Supported Built-ins
//!
//! - `String`, `Number`, `Boolean`: conversions when called as functions
//! - `Array(...)`, `Object(...)`
//! - `Function(p1, ..., body)`: builds a function from source text
//! - `escape`, `unescape`, `parseInt`, `parseFloat`, `isNaN`, `isFinite`
//!
//! [`Environment::with_globals`]: crate::runtime::Environment::with_globals

use crate::interpreter::coercion::{
    decimal_prefix_len, is_js_whitespace, to_boolean, to_int32, to_number, to_string,
};
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::HostError;
use crate::runtime::value::{Global, Object, ObjectClass};
use crate::runtime::{Environment, Value};

/// Largest array `Array(n)` will allocate
const MAX_ARRAY_LENGTH: f64 = 16_777_216.0;

impl Interpreter {
    pub(crate) fn call_global(
        &mut self,
        global: Global,
        args: Vec<Value>,
        _env: &mut Environment,
    ) -> Result<Value, HostError> {
        let arg = |i: usize| args.get(i).cloned().unwrap_or_default();

        match global {
            Global::String => Ok(Value::Str(match args.first() {
                Some(value) => to_string(value),
                None => String::new(),
            })),
            Global::Number => Ok(Value::Number(args.first().map_or(0.0, to_number))),
            Global::Boolean => Ok(Value::Bool(to_boolean(&arg(0)))),
            Global::Array => {
                if let [Value::Number(n)] = args.as_slice() {
                    return array_of_length(*n);
                }
                Ok(Value::array(args))
            }
            Global::Object => Ok(match arg(0) {
                Value::Undefined | Value::Null => Value::object(Object::new(ObjectClass::Plain)),
                // Primitives are returned as-is rather than boxed
                other => other,
            }),
            Global::Function => self.make_script_function(&args),
            Global::Escape => Ok(Value::Str(escape(&to_string(&arg(0))))),
            Global::Unescape => Ok(Value::Str(unescape(&to_string(&arg(0))))),
            Global::ParseInt => Ok(Value::Number(parse_int(&to_string(&arg(0)), &arg(1)))),
            Global::ParseFloat => Ok(Value::Number(parse_float(&to_string(&arg(0))))),
            Global::IsNaN => Ok(Value::Bool(to_number(&arg(0)).is_nan())),
            Global::IsFinite => Ok(Value::Bool(to_number(&arg(0)).is_finite())),
        }
    }
}

/// `Array(n)`: `n` holes
fn array_of_length(n: f64) -> Result<Value, HostError> {
    if n < 0.0 || n.fract() != 0.0 || n > 4_294_967_295.0 {
        return Err(HostError::Range("Invalid array length".to_string()));
    }
    if n > MAX_ARRAY_LENGTH {
        return Err(HostError::Range(format!(
            "Array length {} is too large to allocate",
            n
        )));
    }
    Ok(Value::array(vec![Value::Undefined; n as usize]))
}

/// `escape`: percent-encode everything but `A-Z a-z 0-9 @*_+-./`, per UTF-16 unit
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for unit in s.encode_utf16() {
        match char::from_u32(u32::from(unit)) {
            Some(c) if c.is_ascii_alphanumeric() || "@*_+-./".contains(c) => out.push(c),
            _ if unit < 256 => out.push_str(&format!("%{:02X}", unit)),
            _ => out.push_str(&format!("%u{:04X}", unit)),
        }
    }
    out
}

/// `unescape`: decode `%XX` and `%uXXXX`; malformed escapes stay literal
pub fn unescape(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut units: Vec<u16> = Vec::with_capacity(chars.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '%' {
            if chars.get(i + 1) == Some(&'u') {
                if let Some(unit) = hex_unit(&chars, i + 2, 4) {
                    units.push(unit);
                    i += 6;
                    continue;
                }
            } else if let Some(unit) = hex_unit(&chars, i + 1, 2) {
                units.push(unit);
                i += 3;
                continue;
            }
        }
        let mut buf = [0u16; 2];
        units.extend_from_slice(chars[i].encode_utf16(&mut buf));
        i += 1;
    }

    String::from_utf16_lossy(&units)
}

fn hex_unit(chars: &[char], start: usize, len: usize) -> Option<u16> {
    let digits = chars.get(start..start + len)?;
    digits
        .iter()
        .try_fold(0u16, |acc, c| c.to_digit(16).map(|d| acc * 16 + d as u16))
}

/// `parseInt(string, radix)`
pub fn parse_int(s: &str, radix: &Value) -> f64 {
    let mut text = s.trim_start_matches(is_js_whitespace);
    let mut sign = 1.0;
    if let Some(rest) = text.strip_prefix('-') {
        sign = -1.0;
        text = rest;
    } else if let Some(rest) = text.strip_prefix('+') {
        text = rest;
    }

    let mut radix = to_int32(radix);
    let mut strip_prefix = true;
    if radix != 0 {
        if !(2..=36).contains(&radix) {
            return f64::NAN;
        }
        strip_prefix = radix == 16;
    } else {
        radix = 10;
    }

    if strip_prefix {
        if let Some(rest) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
            text = rest;
            radix = 16;
        }
    }

    let radix = radix as u32;
    let mut value = None;
    for c in text.chars() {
        match c.to_digit(radix) {
            Some(d) => value = Some(value.unwrap_or(0.0) * f64::from(radix) + f64::from(d)),
            None => break,
        }
    }

    value.map_or(f64::NAN, |v: f64| sign * v)
}

/// `parseFloat(string)`: the longest decimal prefix
pub fn parse_float(s: &str) -> f64 {
    let text = s.trim_start_matches(is_js_whitespace);
    let unsigned = text.trim_start_matches(['+', '-']);

    if unsigned.starts_with("Infinity") && text.len() - unsigned.len() <= 1 {
        return if text.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    match decimal_prefix_len(text) {
        0 => f64::NAN,
        len => text[..len].parse().unwrap_or(f64::NAN),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_round_trip() {
        assert_eq!(escape("a b/ü€"), "a%20b/%FC%u20AC");
        assert_eq!(unescape("a%20b/%FC%u20AC"), "a b/ü€");
        assert_eq!(unescape("100%"), "100%");
        assert_eq!(unescape("%zz%u12"), "%zz%u12");
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int("  42px", &Value::Undefined), 42.0);
        assert_eq!(parse_int("-0x1A", &Value::Undefined), -26.0);
        assert_eq!(parse_int("z", &Value::Number(36.0)), 35.0);
        assert_eq!(parse_int("101", &Value::Number(2.0)), 5.0);
        assert!(parse_int("", &Value::Undefined).is_nan());
        assert!(parse_int("1", &Value::Number(40.0)).is_nan());
    }

    #[test]
    fn test_parse_float() {
        assert_eq!(parse_float("3.14abc"), 3.14);
        assert_eq!(parse_float("  -Infinity!"), f64::NEG_INFINITY);
        assert_eq!(parse_float(".5"), 0.5);
        assert!(parse_float("abc").is_nan());
        assert!(parse_float("--1").is_nan());
    }

    #[test]
    fn test_array_constructor() {
        let mut interpreter = Interpreter::new();
        let mut env = Environment::with_globals();

        let holes = interpreter
            .call_global(Global::Array, vec![Value::Number(3.0)], &mut env)
            .unwrap();
        assert!(matches!(holes, Value::Array(ref v) if v.borrow().len() == 3));

        let err = interpreter
            .call_global(Global::Array, vec![Value::Number(-1.0)], &mut env)
            .unwrap_err();
        assert_eq!(err, HostError::Range("Invalid array length".to_string()));
    }
}
