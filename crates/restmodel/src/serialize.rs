//! # Visibility & Serialization
//!
//! Two projections of a model into plain data:
//!
//! - [`Model::to_structure`]: every stored attribute.
//! - [`Model::to_restricted_structure`]: only the type's visible set, plus the
//!   primary key. A wildcard visible set makes the two identical.
//!
//! Each attribute goes through the read pipeline (get-mutator, else cast, else
//! raw) and the result is then projected:
//!
//! | Runtime value | Projected as |
//! |---------------|--------------|
//! | nested model | its restricted projection |
//! | collection | restricted projection of each element |
//! | date-time | text in the model's date format |
//! | anything else | its wire form |
//!
//! Attributes that only exist through a get-mutator (nothing stored under the
//! name) are not projected.

use serde::ser::{Error as _, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::attributes::AttrValue;
use crate::casts::dates;
use crate::error::{ModelError, Result};
use crate::model::Model;
use crate::schema::Visibility;

impl Model {
    pub fn to_structure(&self) -> Result<Map<String, Value>> {
        self.attributes_to_structure(self.get_attributes().keys())
    }

    pub fn to_restricted_structure(&self) -> Result<Map<String, Value>> {
        match self.schema().visibility() {
            Visibility::All => self.to_structure(),
            Visibility::Only(names) => {
                let key_name = self.key_name();
                self.attributes_to_structure(
                    self.get_attributes()
                        .keys()
                        .filter(|key| *key == key_name || names.contains(*key)),
                )
            }
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_structure()?)?)
    }

    pub fn to_restricted_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_restricted_structure()?)?)
    }

    fn attributes_to_structure<'a>(
        &self,
        keys: impl Iterator<Item = &'a String>,
    ) -> Result<Map<String, Value>> {
        let mut structure = Map::new();
        for key in keys {
            let value = self.get_attribute(key)?;
            structure.insert(key.clone(), self.project(key, value)?);
        }
        Ok(structure)
    }

    fn project(&self, key: &str, value: AttrValue) -> Result<Value> {
        match value {
            AttrValue::Model(model) => Ok(Value::Object(model.to_restricted_structure()?)),
            AttrValue::Collection(collection) => Ok(Value::Array(collection.all_visible()?)),
            AttrValue::DateTime(dt) => dates::format_date_time(&dt, self.date_format())
                .map(Value::String)
                .ok_or_else(|| ModelError::cast_failure(key, dt)),
            other => {
                let shown = format!("{other:?}");
                other
                    .into_raw(self.date_format())
                    .ok_or_else(|| ModelError::cast_failure(key, shown))
            }
        }
    }
}

impl Serialize for Model {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_structure()
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}
