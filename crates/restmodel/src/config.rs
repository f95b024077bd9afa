//! # Configuration
//!
//! Model configuration is managed by [`confique`], which layers environment
//! variables over an optional TOML file over compiled defaults.
//!
//! ## Available Settings
//!
//! | Key | Env | Default | Description |
//! |-----|-----|---------|-------------|
//! | `date_format` | `RESTMODEL_DATE_FORMAT` | `%Y-%m-%d %H:%M:%S` | Storage format for `date`/`datetime` casts |
//! | `snake_attributes` | `RESTMODEL_SNAKE_ATTRIBUTES` | `false` | Register mutated names in snake_case only |
//!
//! Schemas start from [`ModelConfig::default`]; pass a loaded config to
//! [`crate::schema::SchemaBuilder::with_config`] to apply overrides.

use std::path::Path;

use confique::Config;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    /// chrono strftime pattern used to store `date` and `datetime` attributes.
    #[config(default = "%Y-%m-%d %H:%M:%S", env = "RESTMODEL_DATE_FORMAT")]
    pub date_format: String,

    /// When set, mutated attribute names are registered in snake_case only.
    /// Otherwise both the snake_case and camelCase forms are registered.
    #[config(default = false, env = "RESTMODEL_SNAKE_ATTRIBUTES")]
    pub snake_attributes: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            snake_attributes: false,
        }
    }
}

impl ModelConfig {
    /// Load config from the environment and, when given, a TOML file.
    ///
    /// A missing file is not an error; the remaining layers still apply.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = Self::builder().env();
        if let Some(path) = file {
            builder = builder.file(path);
        }
        Ok(builder.load()?)
    }
}
