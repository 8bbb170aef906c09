//! Global binding table
//!
//! One [`Environment`] is shared, mutably, by every evaluation a session
//! performs: a binding made by one step (or by the `set` command) is
//! visible to all later steps. Isolation is a matter of creating a fresh
//! environment.

use super::value::{Function, Global, Value};
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Default)]
pub struct Environment {
    bindings: FxHashMap<String, Value>,
}

impl Environment {
    /// Empty environment, without even the built-in globals
    pub fn new() -> Self {
        Self::default()
    }

    /// Environment holding the built-in global functions
    pub fn with_globals() -> Self {
        let mut env = Self::new();
        for global in Global::ALL {
            env.define(global.name(), Value::function(Function::global(global)));
        }
        env
    }

    /// Bind `name`, replacing any previous binding
    pub fn define(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.bindings.insert(name.into(), value)
    }

    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.bindings.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Bound names in sorted order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.bindings.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_globals() {
        let env = Environment::with_globals();

        assert_eq!(env.len(), Global::ALL.len());
        assert!(matches!(env.lookup("escape"), Some(Value::Function(f)) if f.name == "escape"));
        assert!(env.lookup("alert").is_none());
    }

    #[test]
    fn test_define_replaces() {
        let mut env = Environment::new();

        assert!(env.define("x", Value::Number(1.0)).is_none());
        assert!(matches!(env.define("x", Value::Null), Some(Value::Number(_))));
        assert!(matches!(env.lookup("x"), Some(Value::Null)));
        assert!(env.remove("x").is_some());
        assert!(env.is_empty());
    }

    #[test]
    fn test_names_sorted() {
        let mut env = Environment::new();
        env.define("b", Value::Undefined);
        env.define("a", Value::Undefined);

        assert_eq!(env.names(), vec!["a", "b"]);
    }
}
