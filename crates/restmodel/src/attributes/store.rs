//! Raw attribute storage.
//!
//! The store is the only state a model instance truly owns. It holds values in
//! their wire form and never applies guards, mutators or casts; callers make
//! those decisions before writing.

use serde_json::{Map, Value};

/// Mapping from attribute name to raw wire value.
///
/// A key stored with `Value::Null` is present: [`AttributeStore::has`] reports
/// it, and [`AttributeStore::get`] returns `Some(&Value::Null)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeStore {
    values: Map<String, Value>,
}

impl AttributeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the raw stored value, or `None` if the key was never set.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Store a raw value unconditionally.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    pub fn has(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.values.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.values
    }
}

impl From<Map<String, Value>> for AttributeStore {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}
