//! Prototype method implementations
//!
//! A method value is a [`Prototype`] plus a method name; calling it lands
//! in [`Interpreter::call_method`] with the receiver as `this`. Methods that
//! take callbacks call back into the interpreter, so arrays are snapshotted
//! before iterating and never borrowed across a callback.

use crate::interpreter::coercion::{
    is_js_whitespace, join, object_tag, property_key, relative_index, to_boolean, to_integer,
    to_number, to_string, to_uint32,
};
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::HostError;
use crate::interpreter::ops::access::get_property;
use crate::runtime::display::number_to_string;
use crate::runtime::value::{Object, ObjectClass, Prototype};
use crate::runtime::{Environment, Value};
use std::cell::RefCell;
use std::rc::Rc;

/// Longest string `repeat` and `pad*` will build
const MAX_STRING_LENGTH: usize = 1 << 28;

/// Arguments of a native call, `undefined` past the end
struct Args(Vec<Value>);

impl Args {
    fn get(&self, index: usize) -> Value {
        self.0.get(index).cloned().unwrap_or_default()
    }

    fn is_given(&self, index: usize) -> bool {
        !matches!(self.0.get(index), None | Some(Value::Undefined))
    }

    /// Integer argument, `default` when absent
    fn integer(&self, index: usize, default: f64) -> f64 {
        if self.is_given(index) {
            to_integer(to_number(&self.get(index)))
        } else {
            default
        }
    }

    fn string(&self, index: usize) -> String {
        to_string(&self.get(index))
    }
}

impl Interpreter {
    pub(crate) fn call_method(
        &mut self,
        prototype: Prototype,
        name: &str,
        this: Value,
        args: Vec<Value>,
        env: &mut Environment,
    ) -> Result<Value, HostError> {
        let args = Args(args);

        match prototype {
            Prototype::Array => match &this {
                Value::Array(items) => self.array_method(items, &this, name, args, env),
                _ => Err(incompatible("Array", name)),
            },
            Prototype::String => {
                if this.is_nullish() {
                    return Err(HostError::Type(format!(
                        "String.prototype.{} called on null or undefined",
                        name
                    )));
                }
                self.string_method(&to_string(&this), name, args, env)
            }
            Prototype::Number => match this {
                Value::Number(n) => number_method(n, name, &args),
                _ => Err(incompatible("Number", name)),
            },
            Prototype::Boolean => match this {
                Value::Bool(b) if name == "toString" => Ok(Value::str(b.to_string())),
                Value::Bool(_) => Ok(this),
                _ => Err(incompatible("Boolean", name)),
            },
            Prototype::Object => object_method(&this, name, &args, env),
            Prototype::Function => match &this {
                Value::Function(function) => match name {
                    "call" => {
                        let mut rest = args.0.into_iter();
                        let this_arg = rest.next().unwrap_or_default();
                        self.call_function(function, this_arg, rest.collect(), env)
                    }
                    "apply" => {
                        let list = match args.get(1) {
                            Value::Undefined | Value::Null => Vec::new(),
                            Value::Array(items) => items.borrow().clone(),
                            _ => {
                                return Err(HostError::Type(
                                    "CreateListFromArrayLike called on non-object".to_string(),
                                ))
                            }
                        };
                        self.call_function(function, args.get(0), list, env)
                    }
                    _ => Ok(Value::str(function.to_string())),
                },
                _ => Err(incompatible("Function", name)),
            },
        }
    }

    fn array_method(
        &mut self,
        items: &Rc<RefCell<Vec<Value>>>,
        this: &Value,
        name: &str,
        args: Args,
        env: &mut Environment,
    ) -> Result<Value, HostError> {
        let len = items.borrow().len();

        match name {
            "at" => {
                let index = args.integer(0, 0.0);
                let index = if index < 0.0 { len as f64 + index } else { index };
                Ok(element(&items.borrow(), index))
            }
            "concat" => {
                let mut result = items.borrow().clone();
                for arg in args.0 {
                    match arg {
                        Value::Array(other) => result.extend(other.borrow().iter().cloned()),
                        other => result.push(other),
                    }
                }
                Ok(Value::array(result))
            }
            "entries" => Ok(Value::object(Object::new(ObjectClass::ArrayIterator))),
            "fill" => {
                let start = relative_index(args.integer(1, 0.0), len);
                let end = relative_index(args.integer(2, len as f64), len);
                let value = args.get(0);
                for slot in items.borrow_mut().iter_mut().take(end).skip(start) {
                    *slot = value.clone();
                }
                Ok(this.clone())
            }
            "flat" => {
                let depth = args.integer(0, 1.0);
                let mut out = Vec::new();
                flatten(&items.borrow(), depth, &mut out);
                Ok(Value::array(out))
            }
            "includes" => {
                let target = args.get(0);
                let from = relative_index(args.integer(1, 0.0), len);
                Ok(Value::Bool(
                    items.borrow().iter().skip(from).any(|v| v.same_value_zero(&target)),
                ))
            }
            "indexOf" => {
                let target = args.get(0);
                let from = relative_index(args.integer(1, 0.0), len);
                let found = items
                    .borrow()
                    .iter()
                    .enumerate()
                    .skip(from)
                    .find(|(_, v)| v.strict_equals(&target))
                    .map(|(i, _)| i);
                Ok(index_or_minus_one(found))
            }
            "lastIndexOf" => {
                let target = args.get(0);
                let found = items.borrow().iter().rposition(|v| v.strict_equals(&target));
                Ok(index_or_minus_one(found))
            }
            "join" => {
                let separator = if args.is_given(0) {
                    args.string(0)
                } else {
                    ",".to_string()
                };
                let snapshot = items.borrow().clone();
                Ok(Value::Str(join(&snapshot, &separator)))
            }
            "toString" => Ok(Value::Str(to_string(this))),
            "pop" => Ok(items.borrow_mut().pop().unwrap_or_default()),
            "shift" => {
                let mut items = items.borrow_mut();
                Ok(if items.is_empty() {
                    Value::Undefined
                } else {
                    items.remove(0)
                })
            }
            "push" => {
                let mut items = items.borrow_mut();
                items.extend(args.0);
                Ok(Value::Number(items.len() as f64))
            }
            "unshift" => {
                let mut items = items.borrow_mut();
                items.splice(0..0, args.0);
                Ok(Value::Number(items.len() as f64))
            }
            "reverse" => {
                items.borrow_mut().reverse();
                Ok(this.clone())
            }
            "slice" => {
                let start = relative_index(args.integer(0, 0.0), len);
                let end = relative_index(args.integer(1, len as f64), len);
                let slice = items.borrow().get(start..end.max(start)).unwrap_or(&[]).to_vec();
                Ok(Value::array(slice))
            }
            "sort" => {
                let snapshot = items.borrow().clone();
                let sorted = self.sort_values(snapshot, &args.get(0), env)?;
                *items.borrow_mut() = sorted;
                Ok(this.clone())
            }
            "every" | "filter" | "find" | "findIndex" | "forEach" | "map" | "some" => {
                self.iterate_array(items, this, name, args, env)
            }
            _ => Err(HostError::not_a_function(&format!("Array.prototype.{}", name))),
        }
    }

    /// The callback-taking array methods
    fn iterate_array(
        &mut self,
        items: &Rc<RefCell<Vec<Value>>>,
        this: &Value,
        name: &str,
        args: Args,
        env: &mut Environment,
    ) -> Result<Value, HostError> {
        let callback = args.get(0);
        if !matches!(callback, Value::Function(_)) {
            return Err(HostError::not_a_function(&to_string(&callback)));
        }
        let this_arg = args.get(1);
        let snapshot = items.borrow().clone();
        let mut mapped = Vec::new();

        for (i, item) in snapshot.into_iter().enumerate() {
            let result = self.call_value(
                &callback,
                this_arg.clone(),
                vec![item.clone(), Value::Number(i as f64), this.clone()],
                env,
            )?;
            let hit = to_boolean(&result);

            match name {
                "every" if !hit => return Ok(Value::Bool(false)),
                "some" if hit => return Ok(Value::Bool(true)),
                "find" if hit => return Ok(item),
                "findIndex" if hit => return Ok(Value::Number(i as f64)),
                "filter" if hit => mapped.push(item),
                "map" => mapped.push(result),
                _ => {}
            }
        }

        Ok(match name {
            "every" => Value::Bool(true),
            "some" => Value::Bool(false),
            "findIndex" => Value::Number(-1.0),
            "filter" | "map" => Value::array(mapped),
            _ => Value::Undefined,
        })
    }

    /// Stable insertion sort; `undefined` always sorts last
    fn sort_values(
        &mut self,
        values: Vec<Value>,
        comparator: &Value,
        env: &mut Environment,
    ) -> Result<Vec<Value>, HostError> {
        let (mut defined, undefined): (Vec<Value>, Vec<Value>) = values
            .into_iter()
            .partition(|v| !matches!(v, Value::Undefined));

        for i in 1..defined.len() {
            let mut j = i;
            while j > 0 && self.sorts_after(&defined[j - 1], &defined[j], comparator, env)? {
                defined.swap(j - 1, j);
                j -= 1;
            }
        }

        defined.extend(undefined);
        Ok(defined)
    }

    fn sorts_after(
        &mut self,
        a: &Value,
        b: &Value,
        comparator: &Value,
        env: &mut Environment,
    ) -> Result<bool, HostError> {
        match comparator {
            Value::Undefined => Ok(to_string(a) > to_string(b)),
            _ => {
                let order =
                    self.call_value(comparator, Value::Undefined, vec![a.clone(), b.clone()], env)?;
                Ok(to_number(&order) > 0.0)
            }
        }
    }

    fn string_method(
        &mut self,
        s: &str,
        name: &str,
        args: Args,
        env: &mut Environment,
    ) -> Result<Value, HostError> {
        let chars: Vec<char> = s.chars().collect();
        let len = chars.len();

        match name {
            "at" => {
                let index = args.integer(0, 0.0);
                let index = if index < 0.0 { len as f64 + index } else { index };
                Ok(char_at(&chars, index).map_or(Value::Undefined, Value::Str))
            }
            "charAt" => Ok(Value::Str(char_at(&chars, args.integer(0, 0.0)).unwrap_or_default())),
            "charCodeAt" | "codePointAt" => {
                let index = args.integer(0, 0.0);
                match chars.get(index as usize).filter(|_| index >= 0.0) {
                    Some(c) => Ok(Value::Number(f64::from(u32::from(*c)))),
                    None if name == "charCodeAt" => Ok(Value::Number(f64::NAN)),
                    None => Ok(Value::Undefined),
                }
            }
            "concat" => {
                let mut out = s.to_string();
                for arg in &args.0 {
                    out.push_str(&to_string(arg));
                }
                Ok(Value::Str(out))
            }
            "endsWith" => {
                let end = relative_index(args.integer(1, len as f64).max(0.0), len);
                let head: String = chars[..end].iter().collect();
                Ok(Value::Bool(head.ends_with(&args.string(0))))
            }
            "startsWith" | "includes" => {
                let from = relative_index(args.integer(1, 0.0).max(0.0), len);
                let tail: String = chars[from..].iter().collect();
                let needle = args.string(0);
                Ok(Value::Bool(if name == "startsWith" {
                    tail.starts_with(&needle)
                } else {
                    tail.contains(&needle)
                }))
            }
            "indexOf" => {
                let needle: Vec<char> = args.string(0).chars().collect();
                let from = relative_index(args.integer(1, 0.0).max(0.0), len);
                Ok(index_or_minus_one(find_chars(&chars, &needle, from)))
            }
            "lastIndexOf" => {
                let needle: Vec<char> = args.string(0).chars().collect();
                let found = (0..=len.saturating_sub(needle.len()))
                    .rev()
                    .find(|&i| chars[i..].starts_with(&needle));
                Ok(index_or_minus_one(found))
            }
            "slice" => {
                let start = relative_index(args.integer(0, 0.0), len);
                let end = relative_index(args.integer(1, len as f64), len);
                Ok(Value::Str(collect(&chars, start, end)))
            }
            "substring" => {
                let clamp = |n: f64| n.clamp(0.0, len as f64) as usize;
                let a = clamp(args.integer(0, 0.0));
                let b = clamp(args.integer(1, len as f64));
                Ok(Value::Str(collect(&chars, a.min(b), a.max(b))))
            }
            "substr" => {
                let start = relative_index(args.integer(0, 0.0), len);
                let count = args.integer(1, len as f64).clamp(0.0, len as f64) as usize;
                Ok(Value::Str(collect(&chars, start, (start + count).min(len))))
            }
            "split" => {
                if !args.is_given(0) {
                    return Ok(Value::array(vec![Value::str(s)]));
                }
                let limit = if args.is_given(1) {
                    to_uint32(&args.get(1)) as usize
                } else {
                    usize::MAX
                };
                let separator = args.string(0);
                let parts: Vec<Value> = if separator.is_empty() {
                    chars.iter().map(|c| Value::Str(c.to_string())).take(limit).collect()
                } else {
                    s.split(separator.as_str()).map(Value::str).take(limit).collect()
                };
                Ok(Value::array(parts))
            }
            "repeat" => {
                let count = args.integer(0, 0.0);
                if count < 0.0 || count.is_infinite() {
                    return Err(HostError::Range(format!(
                        "Invalid count value: {}",
                        number_to_string(count)
                    )));
                }
                if s.len() as f64 * count > MAX_STRING_LENGTH as f64 {
                    return Err(HostError::Range("Invalid string length".to_string()));
                }
                Ok(Value::Str(s.repeat(count as usize)))
            }
            "replace" => {
                let pattern = args.string(0);
                let Some(at) = s.find(&pattern) else {
                    return Ok(Value::str(s));
                };
                let replacement = match args.get(1) {
                    callback @ Value::Function(_) => {
                        let position = s[..at].chars().count() as f64;
                        let result = self.call_value(
                            &callback,
                            Value::Undefined,
                            vec![Value::str(pattern.clone()), Value::Number(position), Value::str(s)],
                            env,
                        )?;
                        to_string(&result)
                    }
                    other => to_string(&other),
                };
                Ok(Value::Str(format!(
                    "{}{}{}",
                    &s[..at],
                    replacement,
                    &s[at + pattern.len()..]
                )))
            }
            "toUpperCase" => Ok(Value::Str(s.to_uppercase())),
            "toLowerCase" => Ok(Value::Str(s.to_lowercase())),
            "trim" => Ok(Value::str(s.trim_matches(is_js_whitespace))),
            "trimStart" => Ok(Value::str(s.trim_start_matches(is_js_whitespace))),
            "trimEnd" => Ok(Value::str(s.trim_end_matches(is_js_whitespace))),
            "padStart" | "padEnd" => {
                let target = args.integer(0, 0.0).max(0.0) as usize;
                if target > MAX_STRING_LENGTH {
                    return Err(HostError::Range("Invalid string length".to_string()));
                }
                let filler: Vec<char> = if args.is_given(1) {
                    args.string(1).chars().collect()
                } else {
                    vec![' ']
                };
                if target <= len || filler.is_empty() {
                    return Ok(Value::str(s));
                }
                let pad: String = filler.iter().cycle().take(target - len).collect();
                Ok(Value::Str(if name == "padStart" {
                    pad + s
                } else {
                    format!("{}{}", s, pad)
                }))
            }
            "toString" | "valueOf" => Ok(Value::str(s)),
            html => Ok(Value::Str(html_method(s, html, &args)?)),
        }
    }
}

/// The legacy HTML wrappers (`"a".bold()`, `"a".fontcolor("red")`, ...)
fn html_method(s: &str, name: &str, args: &Args) -> Result<String, HostError> {
    let attribute = |attr: &str| format!("{}=\"{}\"", attr, args.string(0).replace('"', "&quot;"));
    let (tag, attr) = match name {
        "anchor" => ("a", Some(attribute("name"))),
        "big" => ("big", None),
        "blink" => ("blink", None),
        "bold" => ("b", None),
        "fixed" => ("tt", None),
        "fontcolor" => ("font", Some(attribute("color"))),
        "fontsize" => ("font", Some(attribute("size"))),
        "italics" => ("i", None),
        "link" => ("a", Some(attribute("href"))),
        "small" => ("small", None),
        "strike" => ("strike", None),
        "sub" => ("sub", None),
        "sup" => ("sup", None),
        other => {
            return Err(HostError::not_a_function(&format!(
                "String.prototype.{}",
                other
            )))
        }
    };

    Ok(match attr {
        Some(attr) => format!("<{} {}>{}</{}>", tag, attr, s, tag),
        None => format!("<{}>{}</{}>", tag, s, tag),
    })
}

fn number_method(n: f64, name: &str, args: &Args) -> Result<Value, HostError> {
    match name {
        "toString" => {
            let radix = args.integer(0, 10.0);
            if !(2.0..=36.0).contains(&radix) {
                return Err(HostError::Range(
                    "toString() radix must be between 2 and 36".to_string(),
                ));
            }
            Ok(Value::Str(if radix == 10.0 {
                number_to_string(n)
            } else {
                radix_to_string(n, radix as u32)
            }))
        }
        "toFixed" => {
            let digits = args.integer(0, 0.0);
            if !(0.0..=100.0).contains(&digits) {
                return Err(HostError::Range(
                    "toFixed() digits argument must be between 0 and 100".to_string(),
                ));
            }
            Ok(Value::Str(if !n.is_finite() || n.abs() >= 1e21 {
                number_to_string(n)
            } else {
                format!("{:.*}", digits as usize, n)
            }))
        }
        _ => Ok(Value::Number(n)),
    }
}

fn object_method(
    this: &Value,
    name: &str,
    args: &Args,
    env: &Environment,
) -> Result<Value, HostError> {
    match name {
        "toString" => Ok(Value::Str(match this {
            Value::Undefined => "[object Undefined]".to_string(),
            Value::Null => "[object Null]".to_string(),
            Value::Bool(_) => "[object Boolean]".to_string(),
            Value::Number(_) => "[object Number]".to_string(),
            Value::Str(_) => "[object String]".to_string(),
            Value::Array(_) => "[object Array]".to_string(),
            Value::Function(_) => "[object Function]".to_string(),
            Value::Object(object) => object_tag(&object.borrow().class),
        })),
        "hasOwnProperty" => {
            let key = property_key(&args.get(0));
            Ok(Value::Bool(match this {
                Value::Object(object) => object.borrow().get(&key).is_some(),
                Value::Array(_) | Value::Str(_) => {
                    key == "length"
                        || (key.bytes().all(|b| b.is_ascii_digit())
                            && !matches!(get_property(this, &key, env)?, Value::Undefined))
                }
                _ => false,
            }))
        }
        _ => Ok(this.clone()),
    }
}

/// Digits of `n` in `radix` (2..=36), fraction cut off after 52 digits
pub fn radix_to_string(n: f64, radix: u32) -> String {
    if !n.is_finite() {
        return number_to_string(n);
    }

    let digit = |d: u32| char::from_digit(d, radix).unwrap_or('0');
    let negative = n < 0.0;
    let n = n.abs();
    let mut int = n.trunc();
    let mut frac = n - int;

    let mut int_digits = Vec::new();
    loop {
        int_digits.push(digit((int % f64::from(radix)) as u32));
        int = (int / f64::from(radix)).trunc();
        if int < 1.0 {
            break;
        }
    }
    int_digits.reverse();

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.extend(int_digits);

    if frac > 0.0 {
        out.push('.');
        for _ in 0..52 {
            frac *= f64::from(radix);
            let d = frac.trunc();
            out.push(digit(d as u32));
            frac -= d;
            if frac <= 0.0 {
                break;
            }
        }
    }

    out
}

fn incompatible(prototype: &str, name: &str) -> HostError {
    HostError::Type(format!(
        "{}.prototype.{} called on incompatible receiver",
        prototype, name
    ))
}


fn element(items: &[Value], index: f64) -> Value {
    if index < 0.0 {
        return Value::Undefined;
    }
    items.get(index as usize).cloned().unwrap_or_default()
}

fn char_at(chars: &[char], index: f64) -> Option<String> {
    if index < 0.0 {
        return None;
    }
    chars.get(index as usize).map(|c| c.to_string())
}

fn collect(chars: &[char], start: usize, end: usize) -> String {
    if start >= end {
        return String::new();
    }
    chars[start..end].iter().collect()
}

fn find_chars(haystack: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.is_empty() {
        return Some(from.min(haystack.len()));
    }
    (from..haystack.len()).find(|&i| haystack[i..].starts_with(needle))
}

fn index_or_minus_one(index: Option<usize>) -> Value {
    Value::Number(index.map_or(-1.0, |i| i as f64))
}

fn flatten(items: &[Value], depth: f64, out: &mut Vec<Value>) {
    for item in items {
        match item {
            Value::Array(inner) if depth >= 1.0 => flatten(&inner.borrow(), depth - 1.0, out),
            // Holes are dropped by `flat`
            Value::Undefined => {}
            other => out.push(other.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radix_to_string() {
        assert_eq!(radix_to_string(35.0, 36), "z");
        assert_eq!(radix_to_string(255.0, 16), "ff");
        assert_eq!(radix_to_string(-5.0, 2), "-101");
        assert_eq!(radix_to_string(0.5, 2), "0.1");
        assert_eq!(radix_to_string(0.0, 2), "0");
    }

    #[test]
    fn test_html_methods() {
        let args = Args(vec![Value::str("a\"b")]);
        assert_eq!(html_method("x", "italics", &args).unwrap(), "<i>x</i>");
        assert_eq!(
            html_method("x", "link", &args).unwrap(),
            "<a href=\"a&quot;b\">x</a>"
        );
        assert!(html_method("x", "marquee", &args).is_err());
    }

    #[test]
    fn test_find_chars() {
        let hay: Vec<char> = "banana".chars().collect();
        let needle: Vec<char> = "na".chars().collect();

        assert_eq!(find_chars(&hay, &needle, 0), Some(2));
        assert_eq!(find_chars(&hay, &needle, 3), Some(4));
        assert_eq!(find_chars(&hay, &needle, 5), None);
    }

    #[test]
    fn test_to_fixed_range() {
        let args = Args(vec![Value::Number(101.0)]);
        assert!(matches!(number_method(1.0, "toFixed", &args), Err(HostError::Range(_))));

        let args = Args(vec![Value::Number(2.0)]);
        assert!(matches!(number_method(1.005, "toFixed", &args), Ok(Value::Str(ref s)) if s.len() == 4));
    }
}
