//! # Model Schemas
//!
//! A schema is the per-type declaration every instance of that type shares:
//! cast rules, visible set, fillable policy, mutator and extension tables,
//! primary key descriptor, date format and endpoint path. It is built once,
//! usually inside a `Lazy` static behind a [`SchemaFn`], and never changes
//! afterwards apart from the snake attribute flag.
//!
//! ```ignore
//! fn contact() -> &'static ModelSchema {
//!     static SCHEMA: Lazy<ModelSchema> = Lazy::new(|| {
//!         ModelSchema::builder("Contact")
//!             .cast("created_at", CastRule::DateTime)
//!             .visible(["type"])
//!             .build()
//!     });
//!     &SCHEMA
//! }
//! ```
//!
//! Schema names identify the type in the mutator cache and in error messages,
//! so they must be unique within a process.

use std::sync::atomic::{AtomicBool, Ordering};

use once_cell::sync::Lazy;

use crate::attributes::AttrValue;
use crate::cache::MutatorCache;
use crate::casts::CastRule;
use crate::config::ModelConfig;
use crate::dispatch::{ExtensionTable, InstanceHandler, StaticHandler};
use crate::error::{ModelError, Result};
use crate::fillable::FillablePolicy;
use crate::mutators::{GetMutator, MutatorTable, SetMutator};
use crate::path::EndpointPath;

/// Deferred reference to a type's schema, used by nested model casts so that
/// types may refer to each other.
pub type SchemaFn = fn() -> &'static ModelSchema;

/// Primary key descriptor: attribute name and its declared type.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryKey {
    pub name: String,
    pub kind: CastRule,
}

impl PrimaryKey {
    pub fn new(name: impl Into<String>, kind: CastRule) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

impl Default for PrimaryKey {
    fn default() -> Self {
        Self::new("id", CastRule::Int)
    }
}

/// Attributes exposed by the restricted projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visibility {
    All,
    /// The listed names; the primary key is always added.
    Only(Vec<String>),
}

impl Default for Visibility {
    fn default() -> Self {
        Visibility::Only(Vec::new())
    }
}

impl Visibility {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.len() == 1 && names[0] == "*" {
            Visibility::All
        } else {
            Visibility::Only(names)
        }
    }
}

#[derive(Debug)]
pub struct ModelSchema {
    name: &'static str,
    primary_key: PrimaryKey,
    casts: Vec<(String, CastRule)>,
    visibility: Visibility,
    fillable: FillablePolicy,
    mutators: MutatorTable,
    extensions: ExtensionTable,
    date_format: String,
    snake_attributes: AtomicBool,
    path: Option<EndpointPath>,
}

impl ModelSchema {
    pub fn builder(name: &'static str) -> SchemaBuilder {
        SchemaBuilder::new(name)
    }

    /// The plain model type: no casts, mutators or extensions.
    pub fn base() -> &'static ModelSchema {
        static BASE: Lazy<ModelSchema> = Lazy::new(|| ModelSchema::builder("Model").build());
        &BASE
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn primary_key(&self) -> &PrimaryKey {
        &self.primary_key
    }

    pub fn cast_rule(&self, attribute: &str) -> Option<&CastRule> {
        self.casts
            .iter()
            .find(|(name, _)| name == attribute)
            .map(|(_, rule)| rule)
    }

    pub fn has_cast(&self, attribute: &str) -> bool {
        self.cast_rule(attribute).is_some()
    }

    pub fn casts(&self) -> impl Iterator<Item = (&str, &CastRule)> {
        self.casts.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    pub fn visibility(&self) -> &Visibility {
        &self.visibility
    }

    pub fn fillable(&self) -> &FillablePolicy {
        &self.fillable
    }

    pub fn mutators(&self) -> &MutatorTable {
        &self.mutators
    }

    pub fn extensions(&self) -> &ExtensionTable {
        &self.extensions
    }

    pub fn date_format(&self) -> &str {
        &self.date_format
    }

    pub fn path(&self) -> Option<&EndpointPath> {
        self.path.as_ref()
    }

    pub fn snake_attributes(&self) -> bool {
        self.snake_attributes.load(Ordering::Relaxed)
    }

    /// Flip the case convention for mutated names.
    ///
    /// Takes effect for [`Self::mutated_attributes`] only after
    /// [`Self::reset_mutator_cache`].
    pub fn set_snake_attributes(&self, snake: bool) {
        self.snake_attributes.store(snake, Ordering::Relaxed);
    }

    /// Names of attributes with a get-mutator, cached process-wide.
    pub fn mutated_attributes(&self) -> Vec<String> {
        MutatorCache::global().mutated_attributes(self).to_vec()
    }

    pub fn reset_mutator_cache(&self) -> bool {
        MutatorCache::global().reset(self.name)
    }

    /// Invoke a class-level extension handler.
    pub fn call_static(&'static self, method: &str, params: Vec<AttrValue>) -> Result<AttrValue> {
        match self.extensions.static_handler(method) {
            Some(handler) => handler(self, params),
            None => Err(ModelError::UnknownOperation {
                method: method.to_string(),
            }),
        }
    }
}

pub struct SchemaBuilder {
    name: &'static str,
    primary_key: PrimaryKey,
    casts: Vec<(String, CastRule)>,
    visibility: Visibility,
    fillable: FillablePolicy,
    mutators: MutatorTable,
    extensions: ExtensionTable,
    config: ModelConfig,
    path: Option<EndpointPath>,
}

impl SchemaBuilder {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            primary_key: PrimaryKey::default(),
            casts: Vec::new(),
            visibility: Visibility::default(),
            fillable: FillablePolicy::default(),
            mutators: MutatorTable::new(),
            extensions: ExtensionTable::default(),
            config: ModelConfig::default(),
            path: None,
        }
    }

    pub fn with_config(mut self, config: &ModelConfig) -> Self {
        self.config = config.clone();
        self
    }

    pub fn key(mut self, name: impl Into<String>, kind: CastRule) -> Self {
        self.primary_key = PrimaryKey::new(name, kind);
        self
    }

    pub fn cast(mut self, attribute: impl Into<String>, rule: CastRule) -> Self {
        let attribute = attribute.into();
        self.casts.retain(|(name, _)| *name != attribute);
        self.casts.push((attribute, rule));
        self
    }

    pub fn visible<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.visibility = Visibility::from_names(names);
        self
    }

    pub fn fillable_policy(mut self, policy: FillablePolicy) -> Self {
        self.fillable = policy;
        self
    }

    pub fn get_mutator(mut self, attribute: &str, mutator: GetMutator) -> Self {
        self.mutators.register_get(attribute, mutator);
        self
    }

    pub fn set_mutator(mut self, attribute: &str, mutator: SetMutator) -> Self {
        self.mutators.register_set(attribute, mutator);
        self
    }

    pub fn extension(mut self, method: impl Into<String>, handler: InstanceHandler) -> Self {
        self.extensions.register(method, handler);
        self
    }

    pub fn static_extension(mut self, method: impl Into<String>, handler: StaticHandler) -> Self {
        self.extensions.register_static(method, handler);
        self
    }

    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.config.date_format = format.into();
        self
    }

    pub fn snake_attributes(mut self, snake: bool) -> Self {
        self.config.snake_attributes = snake;
        self
    }

    pub fn path(mut self, template: impl Into<String>) -> Self {
        self.path = Some(EndpointPath::new(template));
        self
    }

    pub fn build(self) -> ModelSchema {
        ModelSchema {
            name: self.name,
            primary_key: self.primary_key,
            casts: self.casts,
            visibility: self.visibility,
            fillable: self.fillable,
            mutators: self.mutators,
            extensions: self.extensions,
            date_format: self.config.date_format,
            snake_attributes: AtomicBool::new(self.config.snake_attributes),
            path: self.path,
        }
    }
}
