//! # restmodel Architecture
//!
//! restmodel lets application code treat remote REST resources as typed local
//! objects. It performs no I/O: it only governs how one instance's attribute
//! bag is read, written, transformed and rendered. Transport, endpoint routing
//! and request lifecycle belong to the caller.
//!
//! ## Components
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Model (model.rs) + Serialization (serialize.rs)            │
//! │  - get/set by name, bulk fill, projections, dynamic calls   │
//! └─────────────────────────────────────────────────────────────┘
//!          │                  │                    │
//!          ▼                  ▼                    ▼
//! ┌────────────────┐ ┌─────────────────┐ ┌────────────────────┐
//! │ Fillable Guard │ │ Mutator Resolver│ │ Cast Engine        │
//! │ (fillable.rs)  │ │ (mutators.rs,   │ │ (casts/)           │
//! │                │ │  cache.rs)      │ │                    │
//! └────────────────┘ └─────────────────┘ └────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Attribute Store (attributes/) - raw wire values only       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything a type declares (casts, visible set, fillable policy, mutators,
//! extension handlers, primary key, date format, endpoint path) lives in one
//! [`schema::ModelSchema`], built once and shared by all its instances.
//!
//! ## Example
//!
//! ```
//! use once_cell::sync::Lazy;
//! use restmodel::{AttrValue, CastRule, Model, ModelSchema};
//!
//! fn invoice() -> &'static ModelSchema {
//!     static SCHEMA: Lazy<ModelSchema> = Lazy::new(|| {
//!         ModelSchema::builder("Invoice")
//!             .cast("total", CastRule::Float)
//!             .cast("issued_at", CastRule::Timestamp)
//!             .visible(["total"])
//!             .build()
//!     });
//!     &SCHEMA
//! }
//!
//! let mut model = Model::new(invoice());
//! model.set_attribute("total", "12.5").unwrap();
//! model.set_attribute("issued_at", "1970-01-02").unwrap();
//!
//! assert_eq!(model.get_attribute("total").unwrap(), AttrValue::Float(12.5));
//! assert_eq!(model.get_attribute("issued_at").unwrap(), AttrValue::Int(86_400));
//! assert_eq!(model.to_restricted_json().unwrap(), r#"{"total":12.5}"#);
//! ```
//!
//! ## Module Overview
//!
//! - [`model`]: The model instance and its read/write pipeline
//! - [`serialize`]: Full and visibility-restricted projections
//! - [`schema`]: Per-type declarations
//! - [`attributes`]: Raw store and runtime values
//! - [`casts`]: Cast rules and temporal normalization
//! - [`mutators`] / [`cache`]: Accessor/mutator overrides and their name cache
//! - [`fillable`]: Mass-assignment guard
//! - [`dispatch`]: Setter-style calls and extension handlers
//! - [`collection`]: Typed collections of instances
//! - [`path`]: Endpoint path templates
//! - [`config`]: Configuration
//! - [`error`]: Error types

pub mod attributes;
pub mod cache;
pub mod casts;
pub mod collection;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod fillable;
pub mod model;
pub mod mutators;
pub mod path;
pub mod schema;
pub mod serialize;

#[cfg(test)]
pub(crate) mod test_utils;

pub use attributes::{AttrValue, AttributeStore};
pub use casts::CastRule;
pub use collection::Collection;
pub use config::ModelConfig;
pub use error::{ModelError, Result};
pub use fillable::FillablePolicy;
pub use model::{Hydrated, Model};
pub use schema::{ModelSchema, SchemaFn, Visibility};
