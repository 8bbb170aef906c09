//! Property access
//!
//! Every value type exposes a fixed set of properties: `length` and indices
//! on strings and arrays, `constructor`, and the methods of its prototype.
//! Method properties resolve to [`FunctionKind::Method`] values that are
//! dispatched when called.
//!
//! [`FunctionKind::Method`]: crate::runtime::value::FunctionKind::Method

use crate::interpreter::coercion::{array_index, property_key, to_string};
use crate::interpreter::constants::{
    ARRAY_METHODS, BOOLEAN_METHODS, FUNCTION_METHODS, NUMBER_METHODS, OBJECT_METHODS,
    STRING_METHODS,
};
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::HostError;
use crate::parser::ast::{Expr, ExprKind};
use crate::runtime::display::number_to_string;
use crate::runtime::value::{Function, Global, ObjectClass, Prototype};
use crate::runtime::{Environment, Value};

impl Interpreter {
    /// Evaluate `object.property` or `object[property]`, returning the
    /// object as well so a call can bind it as `this`
    pub(crate) fn evaluate_member_access(
        &mut self,
        object: &Expr,
        property: &Expr,
        computed: bool,
        env: &mut Environment,
    ) -> Result<(Value, Value), HostError> {
        let object = self.evaluate_expr(object, env)?;
        let key = if computed {
            property_key(&self.evaluate_expr(property, env)?)
        } else {
            match &property.kind {
                ExprKind::Ident(name) | ExprKind::Str(name) => name.clone(),
                ExprKind::Number(n) => number_to_string(*n),
                _ => property_key(&self.evaluate_expr(property, env)?),
            }
        };

        let value = get_property(&object, &key, env)?;
        Ok((object, value))
    }
}

/// Read property `key` of `object`
pub fn get_property(object: &Value, key: &str, env: &Environment) -> Result<Value, HostError> {
    match object {
        Value::Undefined | Value::Null => Err(HostError::Type(format!(
            "Cannot read properties of {} (reading '{}')",
            to_string(object),
            key
        ))),
        Value::Str(s) => {
            if key == "length" {
                return Ok(Value::Number(s.chars().count() as f64));
            }
            if let Some(index) = array_index(key) {
                return Ok(s
                    .chars()
                    .nth(index)
                    .map(|c| Value::Str(c.to_string()))
                    .unwrap_or(Value::Undefined));
            }
            Ok(prototype_member(Prototype::String, key))
        }
        Value::Array(items) => {
            if key == "length" {
                return Ok(Value::Number(items.borrow().len() as f64));
            }
            if let Some(index) = array_index(key) {
                return Ok(items.borrow().get(index).cloned().unwrap_or_default());
            }
            Ok(prototype_member(Prototype::Array, key))
        }
        Value::Number(_) => Ok(prototype_member(Prototype::Number, key)),
        Value::Bool(_) => Ok(prototype_member(Prototype::Boolean, key)),
        Value::Object(object) => {
            let object = object.borrow();
            if let Some(value) = object.get(key) {
                return Ok(value.clone());
            }
            if object.class == ObjectClass::Global {
                if let Some(value) = env.lookup(key) {
                    return Ok(value.clone());
                }
            }
            Ok(prototype_member(Prototype::Object, key))
        }
        Value::Function(function) => match key {
            "name" => Ok(Value::str(function.name.clone())),
            "length" => Ok(Value::Number(function.arity() as f64)),
            _ => Ok(prototype_member(Prototype::Function, key)),
        },
    }
}

/// `constructor` or a method of `prototype`, falling back to `Object.prototype`
fn prototype_member(prototype: Prototype, key: &str) -> Value {
    if key == "constructor" {
        return Value::function(Function::global(constructor_of(prototype)));
    }

    if let Some(name) = methods_of(prototype).iter().copied().find(|m| *m == key) {
        return Value::function(Function::method(prototype, name));
    }

    match OBJECT_METHODS.iter().copied().find(|m| *m == key) {
        Some(name) if prototype != Prototype::Object => {
            Value::function(Function::method(Prototype::Object, name))
        }
        _ => Value::Undefined,
    }
}

fn methods_of(prototype: Prototype) -> &'static [&'static str] {
    match prototype {
        Prototype::Array => ARRAY_METHODS,
        Prototype::String => STRING_METHODS,
        Prototype::Number => NUMBER_METHODS,
        Prototype::Boolean => BOOLEAN_METHODS,
        Prototype::Object => OBJECT_METHODS,
        Prototype::Function => FUNCTION_METHODS,
    }
}

fn constructor_of(prototype: Prototype) -> Global {
    match prototype {
        Prototype::Array => Global::Array,
        Prototype::String => Global::String,
        Prototype::Number => Global::Number,
        Prototype::Boolean => Global::Boolean,
        Prototype::Object => Global::Object,
        Prototype::Function => Global::Function,
    }
}
