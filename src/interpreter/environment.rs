// File: src/interpreter/environment.rs
//
// Flat variable environment for the Scribo interpreter.
// One mapping from name to value is shared by the whole program: blocks do
// not open scopes, so a name declared inside a branch stays visible after it.

use super::value::Value;
use ahash::AHashMap;

/// Variable storage for one interpreter run
///
/// # Examples
///
/// ```
/// use scribo::interpreter::{Environment, Value};
///
/// let mut env = Environment::new();
/// env.define("x", Value::Number(10.0));
/// assert_eq!(env.get("x"), Some(Value::Number(10.0)));
/// assert_eq!(env.get("y"), None);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Environment {
    values: AHashMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds or rebinds a name
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    /// Returns a clone of the bound value
    pub fn get(&self, name: &str) -> Option<Value> {
        self.values.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Declared names, sorted for stable display
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.values.keys().cloned().collect();
        names.sort();
        names
    }

    /// All bindings sorted by name
    pub fn entries(&self) -> Vec<(String, Value)> {
        let mut entries: Vec<(String, Value)> =
            self.values.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_overwrites() {
        let mut env = Environment::new();
        env.define("x", Value::Number(1.0));
        env.define("x", Value::Text("one".into()));
        assert_eq!(env.get("x"), Some(Value::Text("one".into())));
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn test_names_sorted() {
        let mut env = Environment::new();
        env.define("zeta", Value::Nil);
        env.define("alpha", Value::Boolean(true));
        assert_eq!(env.names(), vec!["alpha".to_string(), "zeta".to_string()]);
        assert_eq!(env.entries()[0], ("alpha".to_string(), Value::Boolean(true)));
    }

    #[test]
    fn test_clear() {
        let mut env = Environment::new();
        env.define("x", Value::Nil);
        env.clear();
        assert!(env.is_empty());
        assert!(!env.contains("x"));
    }
}
