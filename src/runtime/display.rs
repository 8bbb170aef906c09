//! Canonical display strings
//!
//! Every substituted span is replaced by the display string of its value:
//! - functions: `function <name>(){}`
//! - numbers: JavaScript `Number#toString`
//! - `undefined`: `undefined`
//! - anything else: JSON, with `undefined`, functions and non-finite numbers
//!   becoming `null` inside arrays and dropped from objects

use super::value::Value;
use crate::interpreter::errors::HostError;
use std::rc::Rc;

/// Display string substituted for `value`
pub fn display(value: &Value) -> Result<String, HostError> {
    match value {
        Value::Function(f) => Ok(format!("function {}(){{}}", f.name)),
        Value::Number(n) => Ok(number_to_string(*n)),
        Value::Undefined => Ok("undefined".to_string()),
        other => Ok(to_json(other, &mut Vec::new())?.to_string()),
    }
}

/// Format a number the way JavaScript's `Number#toString()` does
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let sign = if n < 0.0 { "-" } else { "" };
    // Shortest round-trip digits, e.g. "1.2345e-7"
    let scientific = format!("{:e}", n.abs());
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => (m.replace('.', ""), e.parse::<i32>().unwrap_or(0)),
        None => return format!("{}", n),
    };

    let digits = mantissa.as_str();
    let k = digits.len() as i32;
    // Position of the decimal point relative to the digit string
    let point = exponent + 1;

    let body = if k <= point && point <= 21 {
        format!("{}{}", digits, "0".repeat((point - k) as usize))
    } else if 0 < point && point <= 21 {
        let (int, frac) = digits.split_at(point as usize);
        format!("{}.{}", int, frac)
    } else if -6 < point && point <= 0 {
        format!("0.{}{}", "0".repeat((-point) as usize), digits)
    } else {
        let (first, rest) = digits.split_at(1);
        let fraction = if rest.is_empty() {
            String::new()
        } else {
            format!(".{}", rest)
        };
        let e = point - 1;
        format!(
            "{}{}e{}{}",
            first,
            fraction,
            if e < 0 { "-" } else { "+" },
            e.abs()
        )
    };

    format!("{}{}", sign, body)
}

/// JSON form of `value`. `seen` holds the arrays and objects currently
/// being serialized, so a cycle is reported instead of recursing forever.
fn to_json(value: &Value, seen: &mut Vec<*const ()>) -> Result<serde_json::Value, HostError> {
    Ok(match value {
        Value::Undefined | Value::Function(_) => serde_json::Value::Null,
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => json_number(*n),
        Value::Str(s) => serde_json::Value::String(s.clone()),
        Value::Array(items) => {
            let id = Rc::as_ptr(items) as *const ();
            enter(seen, id)?;
            let items = items
                .borrow()
                .iter()
                .map(|item| to_json(item, seen))
                .collect::<Result<Vec<_>, _>>()?;
            seen.pop();
            serde_json::Value::Array(items)
        }
        Value::Object(object) => {
            let id = Rc::as_ptr(object) as *const ();
            enter(seen, id)?;
            let mut map = serde_json::Map::new();
            for (key, value) in &object.borrow().properties {
                if matches!(value, Value::Undefined | Value::Function(_)) {
                    continue;
                }
                map.insert(key.clone(), to_json(value, seen)?);
            }
            seen.pop();
            serde_json::Value::Object(map)
        }
    })
}

fn enter(seen: &mut Vec<*const ()>, id: *const ()) -> Result<(), HostError> {
    if seen.contains(&id) {
        return Err(HostError::Type(
            "Converting circular structure to JSON".to_string(),
        ));
    }
    seen.push(id);
    Ok(())
}

fn json_number(n: f64) -> serde_json::Value {
    const MAX_SAFE: f64 = 9_007_199_254_740_991.0;

    if n.fract() == 0.0 && n.abs() <= MAX_SAFE {
        serde_json::Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::value::{Function, Global, Object, ObjectClass};

    #[test]
    fn test_number_to_string() {
        assert_eq!(number_to_string(21.0), "21");
        assert_eq!(number_to_string(-0.0), "0");
        assert_eq!(number_to_string(0.1), "0.1");
        assert_eq!(number_to_string(-1.5), "-1.5");
        assert_eq!(number_to_string(0.000001), "0.000001");
        assert_eq!(number_to_string(1e-7), "1e-7");
        assert_eq!(number_to_string(1.5e-7), "1.5e-7");
        assert_eq!(number_to_string(1e21), "1e+21");
        assert_eq!(number_to_string(123456789012345680000.0), "123456789012345680000");
        assert_eq!(number_to_string(f64::NAN), "NaN");
        assert_eq!(number_to_string(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_display_scalars() {
        assert_eq!(display(&Value::Undefined).unwrap(), "undefined");
        assert_eq!(display(&Value::Null).unwrap(), "null");
        assert_eq!(display(&Value::Bool(false)).unwrap(), "false");
        assert_eq!(display(&Value::str("f")).unwrap(), "\"f\"");
        assert_eq!(display(&Value::Number(f64::NAN)).unwrap(), "NaN");
    }

    #[test]
    fn test_display_function() {
        let flat = Value::function(Function::global(Global::Escape));
        assert_eq!(display(&flat).unwrap(), "function escape(){}");
    }

    #[test]
    fn test_display_nested() {
        let array = Value::array(vec![
            Value::Number(1.0),
            Value::Undefined,
            Value::Number(f64::INFINITY),
            Value::str("a"),
            Value::array(vec![]),
        ]);
        assert_eq!(display(&array).unwrap(), "[1,null,null,\"a\",[]]");

        let mut object = Object::new(ObjectClass::Plain);
        object.set("b", Value::Number(0.5));
        object.set("skip", Value::Undefined);
        object.set("a", Value::Bool(true));
        assert_eq!(display(&Value::object(object)).unwrap(), "{\"b\":0.5,\"a\":true}");
    }

    #[test]
    fn test_display_cycle_is_error() {
        let array = Value::array(vec![]);
        if let Value::Array(items) = &array {
            items.borrow_mut().push(array.clone());
        }
        assert!(matches!(display(&array), Err(HostError::Type(_))));
    }
}
