//! Process-wide mutator-name cache.
//!
//! Computing a type's mutated attribute names walks its mutator table and
//! converts every name's case, so the result is kept per type for the life of
//! the process. Entries are keyed by schema name, populated lazily on first
//! use, and never invalidated automatically; [`MutatorCache::reset`] drops a
//! single type's entry (used after flipping the snake attribute flag, and in
//! tests).
//!
//! Population is idempotent, so two threads racing on the same first access
//! compute the same set; the write lock only guards the insert.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use once_cell::sync::Lazy;

use crate::schema::ModelSchema;

static GLOBAL: Lazy<MutatorCache> = Lazy::new(MutatorCache::default);

#[derive(Debug, Default)]
pub struct MutatorCache {
    entries: RwLock<HashMap<&'static str, Arc<[String]>>>,
}

impl MutatorCache {
    pub fn global() -> &'static MutatorCache {
        &GLOBAL
    }

    /// The cached mutated attribute names of `schema`, computing them on first use.
    pub fn mutated_attributes(&self, schema: &ModelSchema) -> Arc<[String]> {
        if let Some(names) = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(schema.name())
        {
            return Arc::clone(names);
        }

        let computed: Arc<[String]> = schema
            .mutators()
            .mutated_attributes(schema.snake_attributes())
            .into();
        tracing::debug!(model = schema.name(), names = ?computed, "mutator cache populated");

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(entries.entry(schema.name()).or_insert(computed))
    }

    /// Drop the entry of one type. Returns whether an entry existed.
    pub fn reset(&self, model: &str) -> bool {
        let removed = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(model)
            .is_some();
        if removed {
            tracing::debug!(model, "mutator cache reset");
        }
        removed
    }

    pub fn contains(&self, model: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(model)
    }
}
