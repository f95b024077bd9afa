//! # Accessor/Mutator Resolver
//!
//! Each type registers its get/set overrides once, in its schema. Overrides
//! are keyed by the attribute's PascalCase token, so `list_items`,
//! `listItems` and `ListItems` all name the same override.
//!
//! ## Precedence
//!
//! - A get-mutator wins over any cast rule declared for the same attribute. It
//!   receives the raw stored value (pre-cast) and returns the visible value.
//! - A set-mutator wins over the default store write and over cast coercion.
//!   It is solely responsible for what, if anything, lands in the store, and
//!   may write under a different key than the one assigned.
//!
//! ## Mutated Attribute Names
//!
//! [`MutatorTable::mutated_attributes`] lists the attributes with a
//! get-mutator in declaration order. With snake attributes on, each is listed
//! once in snake_case; otherwise the snake_case and camelCase forms are both
//! listed. The result is cached per type by [`crate::cache::MutatorCache`].

use convert_case::{Case, Casing};
use serde_json::Value;

use crate::attributes::AttrValue;
use crate::error::Result;
use crate::model::Model;

/// Get override: receives the raw stored value, returns the visible value.
pub type GetMutator = fn(&Model, Option<&Value>) -> Result<AttrValue>;

/// Set override: receives the assigned value and writes the store itself.
pub type SetMutator = fn(&mut Model, AttrValue) -> Result<()>;

#[derive(Debug, Clone, Default)]
pub struct MutatorTable {
    getters: Vec<(String, GetMutator)>,
    setters: Vec<(String, SetMutator)>,
}

impl MutatorTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_get(&mut self, attribute: &str, mutator: GetMutator) {
        upsert(&mut self.getters, studly(attribute), mutator);
    }

    pub fn register_set(&mut self, attribute: &str, mutator: SetMutator) {
        upsert(&mut self.setters, studly(attribute), mutator);
    }

    pub fn get_mutator(&self, attribute: &str) -> Option<GetMutator> {
        let token = studly(attribute);
        self.getters
            .iter()
            .find(|(name, _)| *name == token)
            .map(|(_, mutator)| *mutator)
    }

    pub fn set_mutator(&self, attribute: &str) -> Option<SetMutator> {
        let token = studly(attribute);
        self.setters
            .iter()
            .find(|(name, _)| *name == token)
            .map(|(_, mutator)| *mutator)
    }

    pub fn has_get_mutator(&self, attribute: &str) -> bool {
        self.get_mutator(attribute).is_some()
    }

    pub fn has_set_mutator(&self, attribute: &str) -> bool {
        self.set_mutator(attribute).is_some()
    }

    /// Attribute names with a get-mutator, in the configured case convention.
    pub fn mutated_attributes(&self, snake: bool) -> Vec<String> {
        let mut names = Vec::with_capacity(self.getters.len() * 2);
        for (token, _) in &self.getters {
            names.push(token.to_case(Case::Snake));
            if !snake {
                names.push(token.to_case(Case::Camel));
            }
        }
        names.dedup();
        names
    }
}

fn upsert<F>(entries: &mut Vec<(String, F)>, token: String, mutator: F) {
    match entries.iter_mut().find(|(name, _)| *name == token) {
        Some(entry) => entry.1 = mutator,
        None => entries.push((token, mutator)),
    }
}

/// PascalCase token identifying an attribute regardless of its case form.
pub fn studly(attribute: &str) -> String {
    attribute.to_case(Case::Pascal)
}
