//! Mass-assignment guard.
//!
//! The policy is declared once per type and consulted before any write coming
//! from [`crate::model::Model::fill`] or
//! [`crate::model::Model::set_attribute`]. Trusted paths (hydrating from a
//! server response, [`crate::model::Model::set_key`], set-mutators writing the
//! store) do not consult it.

use crate::error::{ModelError, Result};

const WILDCARD: &str = "*";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FillablePolicy {
    /// Every attribute may be assigned.
    #[default]
    Unguarded,
    /// Only the listed attributes may be assigned; `"*"` allows all.
    Fillable(Vec<String>),
    /// Every attribute except the listed ones may be assigned; `"*"` blocks all.
    Guarded(Vec<String>),
}

impl FillablePolicy {
    pub fn fillable<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FillablePolicy::Fillable(names.into_iter().map(Into::into).collect())
    }

    pub fn guarded<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FillablePolicy::Guarded(names.into_iter().map(Into::into).collect())
    }

    pub fn is_fillable(&self, attribute: &str) -> bool {
        match self {
            FillablePolicy::Unguarded => true,
            FillablePolicy::Fillable(allowed) => allowed
                .iter()
                .any(|name| name == WILDCARD || name == attribute),
            FillablePolicy::Guarded(denied) => !denied
                .iter()
                .any(|name| name == WILDCARD || name == attribute),
        }
    }

    /// Fail with [`ModelError::GuardRejection`] unless `attribute` may be assigned.
    pub fn authorize(&self, model: &str, attribute: &str) -> Result<()> {
        if self.is_fillable(attribute) {
            return Ok(());
        }
        tracing::debug!(model, attribute, "mass assignment rejected");
        Err(ModelError::GuardRejection {
            model: model.to_string(),
            attribute: attribute.to_string(),
        })
    }
}
