//! Typed collections of model instances.
//!
//! This is the container produced by "array of model" casts and by hydrating a
//! top-level JSON array. Every element shares the collection's schema.

use serde::ser::{Error as _, Serialize, SerializeSeq, Serializer};
use serde_json::Value;

use crate::attributes::AttrValue;
use crate::error::{ModelError, Result};
use crate::model::Model;
use crate::schema::ModelSchema;

#[derive(Debug, Clone)]
pub struct Collection {
    schema: &'static ModelSchema,
    items: Vec<Model>,
}

impl Collection {
    pub fn new(schema: &'static ModelSchema) -> Self {
        Self {
            schema,
            items: Vec::new(),
        }
    }

    /// Hydrate one trusted instance per raw element. Every element must be an
    /// object.
    pub fn make_of(schema: &'static ModelSchema, items: Vec<Value>) -> Result<Self> {
        let items = items
            .into_iter()
            .map(|item| match item {
                Value::Object(map) => Ok(Model::hydrate(schema, map)),
                other => Err(ModelError::raw_cast_failure(schema.name(), &other)),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { schema, items })
    }

    pub fn schema(&self) -> &'static ModelSchema {
        self.schema
    }

    /// Append an element: an instance as is, or a raw structure filled
    /// through the element type's guard.
    pub fn add(&mut self, item: impl Into<AttrValue>) -> Result<&mut Self> {
        let model = match item.into() {
            AttrValue::Model(model) => *model,
            AttrValue::Structure(Value::Object(map)) => Model::make(self.schema, map)?,
            other => return Err(ModelError::cast_failure(self.schema.name(), format!("{other:?}"))),
        };
        self.items.push(model);
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Model> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Model> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<Model> {
        self.items
    }

    /// Restricted projection of every element.
    pub fn all_visible(&self) -> Result<Vec<Value>> {
        self.items
            .iter()
            .map(|model| model.to_restricted_structure().map(Value::Object))
            .collect()
    }

    /// Full projection of every element.
    pub fn to_structure(&self) -> Result<Vec<Value>> {
        self.items
            .iter()
            .map(|model| model.to_structure().map(Value::Object))
            .collect()
    }

    /// Raw attribute objects, as stored by the "array of model" cast.
    pub fn to_raw(&self) -> Vec<Value> {
        self.items
            .iter()
            .map(|model| Value::Object(model.get_attributes().clone()))
            .collect()
    }
}

impl PartialEq for Collection {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.schema, other.schema) && self.items == other.items
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Model;
    type IntoIter = std::slice::Iter<'a, Model>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl IntoIterator for Collection {
    type Item = Model;
    type IntoIter = std::vec::IntoIter<Model>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl Serialize for Collection {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.items.len()))?;
        for model in &self.items {
            let structure = model.to_structure().map_err(S::Error::custom)?;
            seq.serialize_element(&structure)?;
        }
        seq.end()
    }
}
