use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    /// A bulk or generic write named an attribute the type does not allow.
    #[error("Attribute [{attribute}] is not fillable on {model}")]
    GuardRejection { model: String, attribute: String },

    /// A dynamic call matched neither a setter nor a registered handler.
    #[error("Method {method} does not exist")]
    UnknownOperation { method: String },

    #[error("Unable to cast attribute [{attribute}] from value {value}")]
    CastFailure { attribute: String, value: String },

    #[error("Unrecognized date/time value: {0}")]
    InvalidDateTime(String),

    #[error("Unknown cast rule: {0}")]
    UnknownCastRule(String),

    #[error("Missing value for path parameter [{0}]")]
    MissingValue(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] confique::Error),
}

impl ModelError {
    pub(crate) fn cast_failure(attribute: &str, value: impl std::fmt::Display) -> Self {
        ModelError::CastFailure {
            attribute: attribute.to_string(),
            value: value.to_string(),
        }
    }

    /// Cast failure on a wire value. Text is reported unquoted.
    pub(crate) fn raw_cast_failure(attribute: &str, raw: &serde_json::Value) -> Self {
        match raw.as_str() {
            Some(text) => Self::cast_failure(attribute, text),
            None => Self::cast_failure(attribute, raw),
        }
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
