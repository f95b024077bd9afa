//! Runtime attribute values.
//!
//! The store keeps wire-form [`serde_json::Value`]s. Everything crossing the
//! model's public surface (reads, writes, mutators, dynamic calls) is an
//! [`AttrValue`], which can additionally carry rich temporal values, nested
//! model instances and typed collections.

use chrono::NaiveDateTime;
use serde_json::{Map, Value};

use crate::casts::dates;
use crate::collection::Collection;
use crate::model::Model;

/// Runtime representation of an attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),

    /// Decoded structure (object or array) from an `object`, `array` or
    /// `json` cast, or an uncast structured value.
    Structure(Value),

    /// Rich temporal value produced by `date`/`datetime` casts.
    DateTime(NaiveDateTime),

    /// Nested model instance produced by a model cast.
    Model(Box<Model>),

    /// Typed collection produced by an "array of model" cast.
    Collection(Collection),
}

impl AttrValue {
    /// Lift a raw wire value into its runtime form without any cast.
    pub fn from_raw(value: Value) -> Self {
        match value {
            Value::Null => AttrValue::Null,
            Value::Bool(b) => AttrValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => AttrValue::Int(i),
                None => AttrValue::Float(n.as_f64().unwrap_or_default()),
            },
            Value::String(s) => AttrValue::String(s),
            structure => AttrValue::Structure(structure),
        }
    }

    /// Lower this value back to wire form.
    ///
    /// Nested models lower to their raw attribute object and collections to an
    /// array of those. Temporal values are formatted with `date_format`;
    /// returns `None` only when that format cannot be rendered.
    pub fn into_raw(self, date_format: &str) -> Option<Value> {
        Some(match self {
            AttrValue::Null => Value::Null,
            AttrValue::Bool(b) => Value::Bool(b),
            AttrValue::Int(i) => Value::from(i),
            AttrValue::Float(f) => Value::from(f),
            AttrValue::String(s) => Value::String(s),
            AttrValue::Structure(v) => v,
            AttrValue::DateTime(dt) => Value::String(dates::format_date_time(&dt, date_format)?),
            AttrValue::Model(model) => Value::Object(model.into_attributes()),
            AttrValue::Collection(collection) => Value::Array(collection.to_raw()),
        })
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttrValue::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttrValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Float(v) => Some(*v),
            AttrValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_structure(&self) -> Option<&Value> {
        match self {
            AttrValue::Structure(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_date_time(&self) -> Option<&NaiveDateTime> {
        match self {
            AttrValue::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    pub fn as_model(&self) -> Option<&Model> {
        match self {
            AttrValue::Model(model) => Some(model),
            _ => None,
        }
    }

    pub fn as_collection(&self) -> Option<&Collection> {
        match self {
            AttrValue::Collection(collection) => Some(collection),
            _ => None,
        }
    }

    pub fn into_model(self) -> Option<Model> {
        match self {
            AttrValue::Model(model) => Some(*model),
            _ => None,
        }
    }

    pub fn into_collection(self) -> Option<Collection> {
        match self {
            AttrValue::Collection(collection) => Some(collection),
            _ => None,
        }
    }
}

impl From<Value> for AttrValue {
    fn from(value: Value) -> Self {
        AttrValue::from_raw(value)
    }
}

impl From<Map<String, Value>> for AttrValue {
    fn from(map: Map<String, Value>) -> Self {
        AttrValue::Structure(Value::Object(map))
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<i32> for AttrValue {
    fn from(value: i32) -> Self {
        AttrValue::Int(i64::from(value))
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Int(value)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Float(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::String(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::String(value)
    }
}

impl From<NaiveDateTime> for AttrValue {
    fn from(value: NaiveDateTime) -> Self {
        AttrValue::DateTime(value)
    }
}

impl From<Model> for AttrValue {
    fn from(value: Model) -> Self {
        AttrValue::Model(Box::new(value))
    }
}

impl From<Collection> for AttrValue {
    fn from(value: Collection) -> Self {
        AttrValue::Collection(value)
    }
}

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(AttrValue::Null, Into::into)
    }
}
