//! Runtime value representation
//!
//! This module defines the [`Value`] enum, the values the reference
//! interpreter computes with. Arrays and objects are shared, mutable
//! references as in JavaScript; everything else is copied.
//!
//! # Value Types
//!
//! - [`Value::Undefined`] and [`Value::Null`]
//! - [`Value::Bool`], [`Value::Number`] (IEEE double), [`Value::Str`]
//! - [`Value::Array`] and [`Value::Object`]: reference types, compared by identity
//! - [`Value::Function`]: native globals, native methods and `Function(...)` bodies
//!
//! Strings are indexed by Unicode scalar value rather than UTF-16 unit.

use crate::parser::ast::Expr;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    Array(Rc<RefCell<Vec<Value>>>),
    Object(Rc<RefCell<Object>>),
    Function(Rc<Function>),
}

impl Value {
    pub fn str(s: impl Into<String>) -> Value {
        Value::Str(s.into())
    }

    pub fn array(items: Vec<Value>) -> Value {
        Value::Array(Rc::new(RefCell::new(items)))
    }

    pub fn object(object: Object) -> Value {
        Value::Object(Rc::new(RefCell::new(object)))
    }

    pub fn function(function: Function) -> Value {
        Value::Function(Rc::new(function))
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// Result of the `typeof` operator
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null | Value::Array(_) | Value::Object(_) => "object",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Function(_) => "function",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Strict equality (`===`): same type and value, references by identity
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => same_function(a, b),
            _ => false,
        }
    }

    /// SameValueZero, used by `includes`: like `===` except `NaN` equals itself
    pub fn same_value_zero(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) if a.is_nan() && b.is_nan() => true,
            _ => self.strict_equals(other),
        }
    }
}

/// What kind of object an [`Object`] is, fixing its `toString` tag
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectClass {
    Plain,
    /// Result of `Array#entries`
    ArrayIterator,
    /// The global object `this` refers to outside of a method call
    Global,
}

impl ObjectClass {
    pub fn tag(&self) -> &'static str {
        match self {
            ObjectClass::Plain => "Object",
            ObjectClass::ArrayIterator => "Array Iterator",
            ObjectClass::Global => "global",
        }
    }
}

/// Object with insertion-ordered own properties
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    pub class: ObjectClass,
    pub properties: Vec<(String, Value)>,
}

impl Object {
    pub fn new(class: ObjectClass) -> Self {
        Self {
            class,
            properties: Vec::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Insert or overwrite, keeping the original position of an existing key
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        match self.properties.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.properties.push((key, value)),
        }
    }
}

/// Global functions installed by [`crate::runtime::Environment::with_globals`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Global {
    String,
    Number,
    Boolean,
    Array,
    Object,
    Function,
    Escape,
    Unescape,
    ParseInt,
    ParseFloat,
    IsNaN,
    IsFinite,
}

impl Global {
    pub const ALL: [Global; 12] = [
        Global::String,
        Global::Number,
        Global::Boolean,
        Global::Array,
        Global::Object,
        Global::Function,
        Global::Escape,
        Global::Unescape,
        Global::ParseInt,
        Global::ParseFloat,
        Global::IsNaN,
        Global::IsFinite,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Global::String => "String",
            Global::Number => "Number",
            Global::Boolean => "Boolean",
            Global::Array => "Array",
            Global::Object => "Object",
            Global::Function => "Function",
            Global::Escape => "escape",
            Global::Unescape => "unescape",
            Global::ParseInt => "parseInt",
            Global::ParseFloat => "parseFloat",
            Global::IsNaN => "isNaN",
            Global::IsFinite => "isFinite",
        }
    }
}

/// Prototype a native method belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prototype {
    Array,
    String,
    Number,
    Boolean,
    Object,
    Function,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FunctionKind {
    Global(Global),
    Method(Prototype, &'static str),
    /// Built by the `Function` constructor; `body` is parsed once up front
    Script {
        params: Vec<String>,
        source: String,
        body: Rc<ScriptBody>,
    },
}

/// Parsed body of a `Function(...)`-built function
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptBody {
    /// `return <expr>`
    Return(Expr),
    /// Statements run for their effects; the call yields `undefined`
    Effects(Vec<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub kind: FunctionKind,
}

impl Function {
    pub fn global(global: Global) -> Self {
        Self {
            name: global.name().to_string(),
            kind: FunctionKind::Global(global),
        }
    }

    pub fn method(prototype: Prototype, name: &'static str) -> Self {
        Self {
            name: name.to_string(),
            kind: FunctionKind::Method(prototype, name),
        }
    }

    /// Declared parameter count, as reported by `length`
    pub fn arity(&self) -> usize {
        match &self.kind {
            FunctionKind::Script { params, .. } => params.len(),
            FunctionKind::Global(_) | FunctionKind::Method(..) => 1,
        }
    }
}

/// Native functions are equal when they are the same built-in
fn same_function(a: &Rc<Function>, b: &Rc<Function>) -> bool {
    match (&a.kind, &b.kind) {
        (FunctionKind::Global(x), FunctionKind::Global(y)) => x == y,
        (FunctionKind::Method(px, x), FunctionKind::Method(py, y)) => px == py && x == y,
        _ => Rc::ptr_eq(a, b),
    }
}

/// `Function#toString`
impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            FunctionKind::Script { params, source, .. } => {
                write!(f, "function anonymous({}\n) {{\n{}\n}}", params.join(","), source)
            }
            _ => write!(f, "function {}() {{ [native code] }}", self.name),
        }
    }
}
