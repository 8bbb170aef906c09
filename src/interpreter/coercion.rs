//! Type conversions
//!
//! These mirror the abstract operations JavaScript uses implicitly
//! (`ToPrimitive`, `ToNumber`, `ToString`, `ToBoolean`, `ToInt32`). None of
//! them can run user code here because objects never carry custom
//! `valueOf`/`toString` methods, so all of them are infallible.

use crate::runtime::display::number_to_string;
use crate::runtime::value::{ObjectClass, Value};
use std::rc::Rc;

pub fn to_boolean(value: &Value) -> bool {
    match value {
        Value::Undefined | Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => *n != 0.0 && !n.is_nan(),
        Value::Str(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) | Value::Function(_) => true,
    }
}

/// Reduce reference values to a primitive; arrays join, objects report their tag
pub fn to_primitive(value: &Value) -> Value {
    match value {
        Value::Array(_) | Value::Object(_) | Value::Function(_) => Value::Str(to_string(value)),
        other => other.clone(),
    }
}

pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Undefined => f64::NAN,
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => *n,
        Value::Str(s) => string_to_number(s),
        other => to_number(&to_primitive(other)),
    }
}

pub fn to_string(value: &Value) -> String {
    to_string_guarded(value, &mut Vec::new())
}

/// `seen` holds the arrays being joined; a cyclic element joins as ""
fn to_string_guarded(value: &Value, seen: &mut Vec<*const ()>) -> String {
    match value {
        Value::Undefined => "undefined".to_string(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_to_string(*n),
        Value::Str(s) => s.clone(),
        Value::Array(items) => {
            let id = Rc::as_ptr(items) as *const ();
            if seen.contains(&id) {
                return String::new();
            }
            seen.push(id);
            let parts: Vec<String> = items
                .borrow()
                .iter()
                .map(|item| match item {
                    Value::Undefined | Value::Null => String::new(),
                    other => to_string_guarded(other, seen),
                })
                .collect();
            seen.pop();
            parts.join(",")
        }
        Value::Object(object) => object_tag(&object.borrow().class),
        Value::Function(function) => function.to_string(),
    }
}

/// `Array#join` with an explicit separator
pub fn join(items: &[Value], separator: &str) -> String {
    items
        .iter()
        .map(|item| match item {
            Value::Undefined | Value::Null => String::new(),
            other => to_string(other),
        })
        .collect::<Vec<_>>()
        .join(separator)
}

/// `Object#toString` result for an object of `class`
pub fn object_tag(class: &ObjectClass) -> String {
    format!("[object {}]", class.tag())
}

/// ToIntegerOrInfinity: truncate toward zero, `NaN` becomes 0
pub fn to_integer(n: f64) -> f64 {
    if n.is_nan() {
        0.0
    } else {
        n.trunc()
    }
}

pub fn to_int32(value: &Value) -> i32 {
    to_uint32(value) as i32
}

pub fn to_uint32(value: &Value) -> u32 {
    let n = to_number(value);
    if !n.is_finite() {
        return 0;
    }
    n.trunc().rem_euclid(4_294_967_296.0) as u32
}

/// Resolve a relative index against `len`, clamping to `0..=len`
pub fn relative_index(n: f64, len: usize) -> usize {
    let n = to_integer(n);
    let len_f = len as f64;
    if n < 0.0 {
        (len_f + n).max(0.0) as usize
    } else {
        n.min(len_f) as usize
    }
}

/// Property key of `value`, as used by `o[value]`
pub fn property_key(value: &Value) -> String {
    to_string(value)
}

/// Canonical array index: digits only, no leading zeros
pub fn array_index(key: &str) -> Option<usize> {
    if key.is_empty() || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    if !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse().ok()
}

pub(crate) fn is_js_whitespace(c: char) -> bool {
    c.is_whitespace() || c == '\u{FEFF}'
}

/// StringToNumber: the whole (trimmed) string must be a numeric literal
pub fn string_to_number(s: &str) -> f64 {
    let text = s.trim_matches(is_js_whitespace);
    if text.is_empty() {
        return 0.0;
    }

    match text {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = text.strip_prefix(prefix) {
            return parse_digits(digits, radix).unwrap_or(f64::NAN);
        }
    }

    if decimal_prefix_len(text) == text.len() {
        text.parse().unwrap_or(f64::NAN)
    } else {
        f64::NAN
    }
}

/// Every character of `digits` must be a digit of `radix`
fn parse_digits(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    digits.chars().try_fold(0.0, |acc, c| {
        c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
    })
}

/// Length of the longest prefix of `s` that is a signed decimal literal
/// (`1`, `-1.5`, `.5`, `2e-3`), or 0 if there is none
pub fn decimal_prefix_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;

    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        digits += j - frac_start;
        if digits > 0 {
            i = j;
        }
    }

    if digits == 0 {
        return 0;
    }

    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    i
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::value::Object;

    #[test]
    fn test_to_string_of_arrays() {
        let nested = Value::array(vec![
            Value::Number(1.0),
            Value::array(vec![Value::Number(2.0), Value::Null]),
            Value::Undefined,
        ]);

        assert_eq!(to_string(&Value::array(vec![])), "");
        assert_eq!(to_string(&nested), "1,2,,");
        assert_eq!(to_string(&Value::object(Object::new(ObjectClass::Plain))), "[object Object]");
    }

    #[test]
    fn test_to_string_cyclic_array() {
        let array = Value::array(vec![Value::Number(1.0)]);
        if let Value::Array(items) = &array {
            items.borrow_mut().push(array.clone());
        }
        assert_eq!(to_string(&array), "1,");
    }

    #[test]
    fn test_to_number() {
        assert_eq!(to_number(&Value::array(vec![])), 0.0);
        assert_eq!(to_number(&Value::Bool(true)), 1.0);
        assert_eq!(to_number(&Value::str(" 12 ")), 12.0);
        assert_eq!(to_number(&Value::str("0x1f")), 31.0);
        assert_eq!(to_number(&Value::str("1e3")), 1000.0);
        assert_eq!(to_number(&Value::str("-Infinity")), f64::NEG_INFINITY);
        assert!(to_number(&Value::str("1a")).is_nan());
        assert!(to_number(&Value::str("inf")).is_nan());
        assert!(to_number(&Value::str("-0x10")).is_nan());
        assert!(to_number(&Value::Undefined).is_nan());
        assert!(to_number(&Value::object(Object::new(ObjectClass::Plain))).is_nan());
    }

    #[test]
    fn test_to_int32_wraps() {
        assert_eq!(to_int32(&Value::Number(4_294_967_297.0)), 1);
        assert_eq!(to_int32(&Value::Number(2_147_483_648.0)), -2_147_483_648);
        assert_eq!(to_int32(&Value::Number(-1.7)), -1);
        assert_eq!(to_uint32(&Value::Number(-1.0)), 4_294_967_295);
        assert_eq!(to_int32(&Value::Number(f64::NAN)), 0);
    }

    #[test]
    fn test_array_index() {
        assert_eq!(array_index("0"), Some(0));
        assert_eq!(array_index("12"), Some(12));
        assert_eq!(array_index("01"), None);
        assert_eq!(array_index("1.5"), None);
        assert_eq!(array_index(""), None);
    }

    #[test]
    fn test_decimal_prefix_len() {
        assert_eq!(decimal_prefix_len("3.14abc"), 4);
        assert_eq!(decimal_prefix_len("-.5e2x"), 5);
        assert_eq!(decimal_prefix_len("1e"), 1);
        assert_eq!(decimal_prefix_len("."), 0);
        assert_eq!(decimal_prefix_len("abc"), 0);
    }

    #[test]
    fn test_relative_index() {
        assert_eq!(relative_index(-1.0, 3), 2);
        assert_eq!(relative_index(-10.0, 3), 0);
        assert_eq!(relative_index(10.0, 3), 3);
        assert_eq!(relative_index(f64::NAN, 3), 0);
    }
}
