//! Dynamic dispatch fallback.
//!
//! Models accept a small set of calls by name:
//!
//! - `setFooBar(value)` assigns attribute `fooBar` (value defaults to `true`).
//! - Any other name must be a handler registered in the type's
//!   [`ExtensionTable`]; instance handlers via [`crate::model::Model::call`],
//!   class-level handlers via [`crate::schema::ModelSchema::call_static`].
//!
//! Anything else is a [`crate::error::ModelError::UnknownOperation`].

use crate::attributes::AttrValue;
use crate::error::Result;
use crate::model::Model;
use crate::schema::ModelSchema;

pub type InstanceHandler = fn(&mut Model, Vec<AttrValue>) -> Result<AttrValue>;
pub type StaticHandler = fn(&'static ModelSchema, Vec<AttrValue>) -> Result<AttrValue>;

#[derive(Debug, Clone, Default)]
pub struct ExtensionTable {
    instance: Vec<(String, InstanceHandler)>,
    statics: Vec<(String, StaticHandler)>,
}

impl ExtensionTable {
    pub fn register(&mut self, method: impl Into<String>, handler: InstanceHandler) {
        let method = method.into();
        self.instance.retain(|(name, _)| *name != method);
        self.instance.push((method, handler));
    }

    pub fn register_static(&mut self, method: impl Into<String>, handler: StaticHandler) {
        let method = method.into();
        self.statics.retain(|(name, _)| *name != method);
        self.statics.push((method, handler));
    }

    pub fn instance_handler(&self, method: &str) -> Option<InstanceHandler> {
        self.instance
            .iter()
            .find(|(name, _)| name == method)
            .map(|(_, handler)| *handler)
    }

    pub fn static_handler(&self, method: &str) -> Option<StaticHandler> {
        self.statics
            .iter()
            .find(|(name, _)| name == method)
            .map(|(_, handler)| *handler)
    }

    pub fn methods(&self) -> impl Iterator<Item = &str> {
        self.instance
            .iter()
            .map(|(name, _)| name.as_str())
            .chain(self.statics.iter().map(|(name, _)| name.as_str()))
    }
}

/// Attribute targeted by a setter-style call: `setListItems` -> `listItems`.
///
/// The character after `set` must be uppercase, so names like `settle` are
/// left to the extension table.
pub fn setter_attribute(method: &str) -> Option<String> {
    let rest = method.strip_prefix("set")?;
    let mut chars = rest.chars();
    let first = chars.next()?;
    if !first.is_uppercase() {
        return None;
    }
    Some(first.to_lowercase().chain(chars).collect())
}
