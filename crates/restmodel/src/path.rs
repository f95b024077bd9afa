//! Endpoint path templates.
//!
//! The transport layer owns request construction; models only fill in the
//! resource path. A template like `contacts/{contact_id}/items/{id}` has each
//! `{name}` replaced by the named raw attribute. Scalars render as their plain
//! text. A placeholder with no value (absent, null, or structured) fails with
//! [`ModelError::MissingValue`].

use serde_json::{Map, Value};

use crate::error::{ModelError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointPath {
    template: String,
}

impl EndpointPath {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Names of the placeholders in template order.
    pub fn parameters(&self) -> Vec<&str> {
        let mut names = Vec::new();
        let mut rest = self.template.as_str();
        while let Some(start) = rest.find('{') {
            let Some(len) = rest[start + 1..].find('}') else {
                break;
            };
            names.push(&rest[start + 1..start + 1 + len]);
            rest = &rest[start + len + 2..];
        }
        names
    }

    /// Substitute every placeholder in a single pass over the template.
    pub fn render(&self, values: &Map<String, Value>) -> Result<String> {
        let mut out = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();
        while let Some(start) = rest.find('{') {
            let Some(len) = rest[start + 1..].find('}') else {
                break;
            };
            let name = &rest[start + 1..start + 1 + len];
            out.push_str(&rest[..start]);
            match values.get(name) {
                Some(Value::String(s)) => out.push_str(s),
                Some(Value::Number(n)) => out.push_str(&n.to_string()),
                Some(Value::Bool(b)) => out.push_str(&b.to_string()),
                _ => return Err(ModelError::MissingValue(name.to_string())),
            }
            rest = &rest[start + len + 2..];
        }
        out.push_str(rest);
        Ok(out)
    }
}
