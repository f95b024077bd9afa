//! # Attribute System
//!
//! Attributes live in two forms:
//!
//! | Form | Type | Where |
//! |------|------|-------|
//! | Raw | [`serde_json::Value`] | inside the [`AttributeStore`], exactly as sent over the wire |
//! | Runtime | [`AttrValue`] | what readers get back and writers hand in |
//!
//! Moving between them is the job of the mutator resolver and the cast engine.
//! The store itself never transforms anything.

mod store;
mod value;

pub use store::AttributeStore;
pub use value::AttrValue;
