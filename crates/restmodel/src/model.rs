//! # Models
//!
//! A [`Model`] is one instance of a REST resource: an [`AttributeStore`] plus
//! the [`ModelSchema`] of its type. Attributes are read and written by name and
//! every access runs through the same pipeline.
//!
//! ## Read Path ([`Model::get_attribute`])
//!
//! 1. Take the raw value from the store (may be absent).
//! 2. Get-mutator declared? Return what it returns.
//! 3. Cast rule declared? Return the cast-on-read result.
//! 4. Otherwise lift the raw value as is.
//!
//! ## Write Path ([`Model::set_attribute`])
//!
//! 1. Authorize the name against the fillable policy.
//! 2. Set-mutator declared? It decides what is stored; done.
//! 3. Store the cast-on-write result, or the raw value if no rule is declared.
//!
//! ## Trusted Writes
//!
//! Data that already comes from the server ([`Model::hydrate`],
//! [`Model::from_response`], [`Model::set_raw_attributes`]) is stored verbatim
//! and skips both the guard and the casts. [`Model::force_fill`] skips only the
//! guard. [`Model::set_key`] writes the key straight into the store.
//!
//! ## Bulk Fill
//!
//! [`Model::fill`] is all-or-nothing: every key is authorized before anything
//! is written, and if a later mutator or cast fails the store is restored to
//! its state before the call.

use serde_json::{Map, Value};

use crate::attributes::{AttrValue, AttributeStore};
use crate::casts::{dates, CastRule};
use crate::collection::Collection;
use crate::dispatch;
use crate::error::{ModelError, Result};
use crate::schema::{ModelSchema, PrimaryKey};

#[derive(Debug, Clone)]
pub struct Model {
    schema: &'static ModelSchema,
    attributes: AttributeStore,
    primary_key: PrimaryKey,
    date_format: String,
}

/// A decoded response body: an object is one instance, an array many.
#[derive(Debug, Clone, PartialEq)]
pub enum Hydrated {
    One(Model),
    Many(Collection),
}

impl Model {
    pub fn new(schema: &'static ModelSchema) -> Self {
        Self {
            schema,
            attributes: AttributeStore::new(),
            primary_key: schema.primary_key().clone(),
            date_format: schema.date_format().to_string(),
        }
    }

    /// Create an instance and bulk-fill it through the guard.
    pub fn make<I, K, V>(schema: &'static ModelSchema, attributes: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttrValue>,
    {
        let mut model = Self::new(schema);
        model.fill(attributes)?;
        Ok(model)
    }

    /// Create an instance from trusted raw attributes.
    pub fn hydrate(schema: &'static ModelSchema, attributes: Map<String, Value>) -> Self {
        let mut model = Self::new(schema);
        model.set_raw_attributes(attributes);
        model
    }

    /// Create an instance holding only its primary key.
    pub fn with_key(schema: &'static ModelSchema, key: impl Into<Value>) -> Self {
        let mut model = Self::new(schema);
        model.set_key(key);
        model
    }

    /// Hydrate from a decoded response body.
    pub fn from_response(schema: &'static ModelSchema, body: Value) -> Result<Hydrated> {
        match body {
            Value::Object(map) => Ok(Hydrated::One(Self::hydrate(schema, map))),
            Value::Array(items) => Collection::make_of(schema, items).map(Hydrated::Many),
            other => Err(ModelError::raw_cast_failure(schema.name(), &other)),
        }
    }

    pub fn schema(&self) -> &'static ModelSchema {
        self.schema
    }

    // --- Primary key ---

    pub fn key_name(&self) -> &str {
        &self.primary_key.name
    }

    pub fn key_type(&self) -> &CastRule {
        &self.primary_key.kind
    }

    pub fn set_key_name(&mut self, name: impl Into<String>, kind: CastRule) -> &mut Self {
        self.primary_key = PrimaryKey::new(name, kind);
        self
    }

    pub fn get_key(&self) -> Result<AttrValue> {
        self.get_attribute(&self.primary_key.name)
    }

    pub fn set_key(&mut self, value: impl Into<Value>) -> &mut Self {
        let name = self.primary_key.name.clone();
        self.attributes.set(name, value.into());
        self
    }

    // --- Dates ---

    pub fn date_format(&self) -> &str {
        &self.date_format
    }

    pub fn set_date_format(&mut self, format: impl Into<String>) -> &mut Self {
        self.date_format = format.into();
        self
    }

    /// Normalize any recognized date/time input into this model's storage text.
    pub fn from_date_time(&self, value: impl Into<AttrValue>) -> Result<String> {
        let value = value.into();
        dates::from_date_time(&value, &self.date_format)
            .ok_or_else(|| ModelError::InvalidDateTime(format!("{value:?}")))
    }

    // --- Raw store ---

    pub fn get_attributes(&self) -> &Map<String, Value> {
        self.attributes.as_map()
    }

    /// Direct store access, for set-mutators.
    pub fn attributes_mut(&mut self) -> &mut AttributeStore {
        &mut self.attributes
    }

    pub fn get_raw(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn set_raw_attributes(&mut self, attributes: Map<String, Value>) -> &mut Self {
        for (key, value) in attributes {
            self.attributes.set(key, value);
        }
        self
    }

    pub fn into_attributes(self) -> Map<String, Value> {
        self.attributes.into_map()
    }

    pub fn has(&self, key: &str) -> bool {
        self.attributes.has(key)
    }

    pub fn unset(&mut self, key: &str) -> Option<Value> {
        self.attributes.remove(key)
    }

    // --- Mutators ---

    pub fn has_get_mutator(&self, key: &str) -> bool {
        self.schema.mutators().has_get_mutator(key)
    }

    pub fn has_set_mutator(&self, key: &str) -> bool {
        self.schema.mutators().has_set_mutator(key)
    }

    /// Run the get-mutator for `key` on `raw`; `None` if there is none.
    pub fn mutate_attribute(&self, key: &str, raw: Option<&Value>) -> Option<Result<AttrValue>> {
        self.schema
            .mutators()
            .get_mutator(key)
            .map(|mutator| mutator(self, raw))
    }

    /// Run the set-mutator for `key`; `None` if there is none.
    pub fn mutating_attribute(&mut self, key: &str, value: AttrValue) -> Option<Result<()>> {
        let mutator = self.schema.mutators().set_mutator(key)?;
        Some(mutator(self, value))
    }

    pub fn get_mutated_attributes(&self) -> Vec<String> {
        self.schema.mutated_attributes()
    }

    // --- Attributes ---

    pub fn get_attribute(&self, key: &str) -> Result<AttrValue> {
        let raw = self.attributes.get(key);

        if let Some(mutated) = self.mutate_attribute(key, raw) {
            return mutated;
        }

        if let Some(rule) = self.schema.cast_rule(key) {
            return rule.cast_on_read(key, raw, &self.date_format);
        }

        Ok(raw.cloned().map_or(AttrValue::Null, AttrValue::from_raw))
    }

    pub fn set_attribute(&mut self, key: &str, value: impl Into<AttrValue>) -> Result<&mut Self> {
        self.schema.fillable().authorize(self.schema.name(), key)?;
        self.assign(key, value.into())?;
        Ok(self)
    }

    /// Write through mutators and casts, without the guard.
    fn assign(&mut self, key: &str, value: AttrValue) -> Result<()> {
        if let Some(result) = self.mutating_attribute(key, value.clone()) {
            return result;
        }

        let raw = match self.schema.cast_rule(key) {
            Some(rule) => rule.cast_on_write(key, value, &self.date_format)?,
            None => {
                let shown = format!("{value:?}");
                value
                    .into_raw(&self.date_format)
                    .ok_or_else(|| ModelError::cast_failure(key, shown))?
            }
        };
        self.attributes.set(key, raw);
        Ok(())
    }

    /// Bulk-assign through the guard. All-or-nothing.
    pub fn fill<I, K, V>(&mut self, attributes: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttrValue>,
    {
        let pairs: Vec<(String, AttrValue)> = attributes
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();

        let policy = self.schema.fillable();
        for (key, _) in &pairs {
            policy.authorize(self.schema.name(), key)?;
        }

        self.apply_atomically(pairs)
    }

    /// Bulk-assign through mutators and casts, skipping the guard.
    pub fn force_fill<I, K, V>(&mut self, attributes: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttrValue>,
    {
        let pairs = attributes
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        self.apply_atomically(pairs)
    }

    fn apply_atomically(&mut self, pairs: Vec<(String, AttrValue)>) -> Result<&mut Self> {
        let snapshot = self.attributes.clone();
        for (key, value) in pairs {
            if let Err(err) = self.assign(&key, value) {
                tracing::debug!(model = self.schema.name(), attribute = %key, "fill rolled back");
                self.attributes = snapshot;
                return Err(err);
            }
        }
        Ok(self)
    }

    // --- Dynamic dispatch ---

    /// Dispatch a call by name.
    ///
    /// `setFooBar(value)` assigns `fooBar`, going straight to its set-mutator
    /// when one exists and through [`Self::set_attribute`] otherwise; the value
    /// defaults to `true`. Other names must be registered extension handlers.
    pub fn call(&mut self, method: &str, params: Vec<AttrValue>) -> Result<AttrValue> {
        if let Some(key) = dispatch::setter_attribute(method) {
            let value = params.into_iter().next().unwrap_or(AttrValue::Bool(true));
            match self.mutating_attribute(&key, value.clone()) {
                Some(result) => result?,
                None => {
                    self.set_attribute(&key, value)?;
                }
            }
            return Ok(AttrValue::Null);
        }

        match self.schema.extensions().instance_handler(method) {
            Some(handler) => handler(self, params),
            None => Err(ModelError::UnknownOperation {
                method: method.to_string(),
            }),
        }
    }

    // --- Paths ---

    /// Render the type's endpoint path from this instance's raw attributes.
    ///
    /// Types without a declared path render as `None`.
    pub fn resolve_path(&self) -> Result<Option<String>> {
        self.schema
            .path()
            .map(|path| path.render(self.attributes.as_map()))
            .transpose()
    }
}

impl PartialEq for Model {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.schema, other.schema)
            && self.attributes == other.attributes
            && self.primary_key == other.primary_key
            && self.date_format == other.date_format
    }
}
