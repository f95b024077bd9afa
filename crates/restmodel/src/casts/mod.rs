//! # Cast Engine
//!
//! Casts convert between the raw wire form held in the store and the runtime
//! form handed to readers. A rule is declared once per attribute per type, see
//! [`crate::schema::SchemaBuilder::cast`].
//!
//! ## Rules
//!
//! | Rule | Stored as | Read as |
//! |------|-----------|---------|
//! | `int` / `integer` | number | [`AttrValue::Int`] |
//! | `float` / `real` / `double` | number | [`AttrValue::Float`] |
//! | `string` | text | [`AttrValue::String`] |
//! | `bool` / `boolean` | bool | [`AttrValue::Bool`] |
//! | `object` / `array` / `json` | JSON text | [`AttrValue::Structure`] |
//! | `date` / `datetime` | text in the model's date format | [`AttrValue::DateTime`] |
//! | `timestamp` | epoch seconds | [`AttrValue::Int`] |
//! | nested model | object of raw attributes | [`AttrValue::Model`] |
//! | array of model | array of raw attribute objects | [`AttrValue::Collection`] |
//!
//! ## Null Propagation
//!
//! Null is never coerced. A null written under any rule is stored as null (the
//! key is still created), and a stored null reads back as null. The one
//! asymmetry is an *absent* "array of model" attribute, which reads as an empty
//! collection so callers can start adding elements to it.

pub mod dates;

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::attributes::AttrValue;
use crate::collection::Collection;
use crate::error::{ModelError, Result};
use crate::model::Model;
use crate::schema::{ModelSchema, SchemaFn};

/// A declared cast rule for one attribute.
#[derive(Clone, Copy)]
pub enum CastRule {
    Int,
    Float,
    String,
    Bool,
    Object,
    Array,
    Json,
    Date,
    DateTime,
    Timestamp,
    /// A single nested instance of the given type.
    Model(SchemaFn),
    /// A homogeneous collection of instances of the given type.
    ModelArray(SchemaFn),
}

impl CastRule {
    /// The rule's declaration name; nested types use the schema name, with a
    /// `[]` suffix for collections.
    pub fn name(&self) -> String {
        match self {
            CastRule::Int => "int".to_string(),
            CastRule::Float => "float".to_string(),
            CastRule::String => "string".to_string(),
            CastRule::Bool => "bool".to_string(),
            CastRule::Object => "object".to_string(),
            CastRule::Array => "array".to_string(),
            CastRule::Json => "json".to_string(),
            CastRule::Date => "date".to_string(),
            CastRule::DateTime => "datetime".to_string(),
            CastRule::Timestamp => "timestamp".to_string(),
            CastRule::Model(schema) => schema().name().to_string(),
            CastRule::ModelArray(schema) => format!("{}[]", schema().name()),
        }
    }

    /// Convert a raw stored value into its runtime form.
    ///
    /// `raw` is `None` when the attribute was never set.
    pub fn cast_on_read(
        &self,
        attribute: &str,
        raw: Option<&Value>,
        date_format: &str,
    ) -> Result<AttrValue> {
        tracing::trace!(attribute, rule = %self, "cast on read");

        let raw = match (self, raw) {
            (CastRule::ModelArray(schema), None) => {
                return Ok(AttrValue::Collection(Collection::new(schema())));
            }
            (_, None) | (_, Some(Value::Null)) => return Ok(AttrValue::Null),
            (_, Some(raw)) => raw,
        };

        match self {
            CastRule::Int | CastRule::Float | CastRule::String | CastRule::Bool => self
                .coerce(raw)
                .map(AttrValue::from_raw)
                .ok_or_else(|| ModelError::raw_cast_failure(attribute, raw)),
            CastRule::Object | CastRule::Array | CastRule::Json => {
                let decoded = match raw {
                    Value::String(text) => serde_json::from_str(text)
                        .map_err(|_| ModelError::raw_cast_failure(attribute, raw))?,
                    other => other.clone(),
                };
                Ok(match (self, decoded) {
                    (_, Value::Null) => AttrValue::Null,
                    (CastRule::Array, scalar) if !scalar.is_array() && !scalar.is_object() => {
                        AttrValue::Structure(Value::Array(vec![scalar]))
                    }
                    (_, decoded) => AttrValue::Structure(decoded),
                })
            }
            CastRule::Date | CastRule::DateTime => {
                let dt = dates::parse_stored(raw, date_format)
                    .ok_or_else(|| ModelError::raw_cast_failure(attribute, raw))?;
                Ok(AttrValue::DateTime(match self {
                    CastRule::Date => dates::start_of_day(&dt),
                    _ => dt,
                }))
            }
            CastRule::Timestamp => match raw.as_i64() {
                Some(secs) => Ok(AttrValue::Int(secs)),
                None => dates::parse_stored(raw, date_format)
                    .map(|dt| AttrValue::Int(dates::to_timestamp(&dt)))
                    .ok_or_else(|| ModelError::raw_cast_failure(attribute, raw)),
            },
            CastRule::Model(schema) => match raw {
                Value::Object(map) => Ok(AttrValue::Model(Box::new(Model::hydrate(
                    schema(),
                    map.clone(),
                )))),
                other => Err(ModelError::raw_cast_failure(attribute, other)),
            },
            CastRule::ModelArray(schema) => match raw {
                Value::Array(items) => Collection::make_of(schema(), items.clone())
                    .map(AttrValue::Collection)
                    .map_err(|_| ModelError::raw_cast_failure(attribute, raw)),
                other => Err(ModelError::raw_cast_failure(attribute, other)),
            },
        }
    }

    /// Convert an incoming runtime value into its canonical stored form.
    pub fn cast_on_write(
        &self,
        attribute: &str,
        value: AttrValue,
        date_format: &str,
    ) -> Result<Value> {
        tracing::trace!(attribute, rule = %self, "cast on write");

        if value.is_null() {
            return Ok(Value::Null);
        }

        match self {
            CastRule::Int | CastRule::Float | CastRule::String | CastRule::Bool => {
                let raw = lower(attribute, value, date_format)?;
                self.coerce(&raw)
                    .ok_or_else(|| ModelError::raw_cast_failure(attribute, &raw))
            }
            CastRule::Object | CastRule::Array | CastRule::Json => {
                let structure = match value {
                    AttrValue::String(text) => serde_json::from_str(&text)
                        .map_err(|_| ModelError::cast_failure(attribute, &text))?,
                    AttrValue::DateTime(dt) => return Err(ModelError::cast_failure(attribute, dt)),
                    other => lower(attribute, other, date_format)?,
                };
                let structure = match (self, structure) {
                    (CastRule::Array, scalar) if !scalar.is_array() && !scalar.is_object() => {
                        Value::Array(vec![scalar])
                    }
                    (_, structure) => structure,
                };
                Ok(Value::String(serde_json::to_string(&structure)?))
            }
            CastRule::Date | CastRule::DateTime => {
                let dt = dates::parse_date_time(&value)
                    .ok_or_else(|| failure_for(attribute, &value))?;
                dates::format_date_time(&dt, date_format)
                    .map(Value::String)
                    .ok_or_else(|| failure_for(attribute, &value))
            }
            CastRule::Timestamp => dates::parse_date_time(&value)
                .map(|dt| Value::from(dates::to_timestamp(&dt)))
                .ok_or_else(|| failure_for(attribute, &value)),
            CastRule::Model(_) => match lower(attribute, value, date_format)? {
                raw @ (Value::Object(_) | Value::Null) => Ok(raw),
                other => Err(ModelError::raw_cast_failure(attribute, &other)),
            },
            CastRule::ModelArray(_) => match lower(attribute, value, date_format)? {
                Value::Array(items) if items.iter().all(Value::is_object) => Ok(Value::Array(items)),
                Value::Null => Ok(Value::Null),
                other => Err(ModelError::raw_cast_failure(attribute, &other)),
            },
        }
    }

    /// Primitive coercion on wire values. Structures only coerce to text.
    fn coerce(&self, raw: &Value) -> Option<Value> {
        match self {
            CastRule::Int => coerce_int(raw).map(Value::from),
            CastRule::Float => coerce_float(raw).map(Value::from),
            CastRule::String => Some(Value::String(match raw {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => other.to_string(),
            })),
            CastRule::Bool => coerce_bool(raw).map(Value::Bool),
            _ => None,
        }
    }
}

fn coerce_int(raw: &Value) -> Option<i64> {
    match raw {
        Value::Bool(b) => Some(i64::from(*b)),
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64))
        }
        _ => None,
    }
}

fn coerce_float(raw: &Value) -> Option<f64> {
    match raw {
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

fn coerce_bool(raw: &Value) -> Option<bool> {
    match raw {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => Some(n.as_f64().is_some_and(|f| f != 0.0)),
        Value::String(s) => Some(!matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "" | "0" | "false"
        )),
        Value::Array(items) => Some(!items.is_empty()),
        Value::Object(map) => Some(!map.is_empty()),
        Value::Null => None,
    }
}

fn lower(attribute: &str, value: AttrValue, date_format: &str) -> Result<Value> {
    let shown = format!("{value:?}");
    value
        .into_raw(date_format)
        .ok_or_else(|| ModelError::cast_failure(attribute, shown))
}

fn failure_for(attribute: &str, value: &AttrValue) -> ModelError {
    match value {
        AttrValue::String(s) => ModelError::cast_failure(attribute, s),
        other => ModelError::cast_failure(attribute, format!("{other:?}")),
    }
}

impl FromStr for CastRule {
    type Err = ModelError;

    /// Parse a primitive rule name. Nested model rules are declared with
    /// [`CastRule::Model`] / [`CastRule::ModelArray`] directly.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "int" | "integer" => Ok(CastRule::Int),
            "float" | "real" | "double" => Ok(CastRule::Float),
            "string" => Ok(CastRule::String),
            "bool" | "boolean" => Ok(CastRule::Bool),
            "object" => Ok(CastRule::Object),
            "array" => Ok(CastRule::Array),
            "json" => Ok(CastRule::Json),
            "date" => Ok(CastRule::Date),
            "datetime" => Ok(CastRule::DateTime),
            "timestamp" => Ok(CastRule::Timestamp),
            _ => Err(ModelError::UnknownCastRule(s.to_string())),
        }
    }
}

impl fmt::Display for CastRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl fmt::Debug for CastRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CastRule({})", self.name())
    }
}

impl PartialEq for CastRule {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CastRule::Model(a), CastRule::Model(b))
            | (CastRule::ModelArray(a), CastRule::ModelArray(b)) => {
                std::ptr::eq::<ModelSchema>(a(), b())
            }
            (CastRule::Model(_), _) | (CastRule::ModelArray(_), _) => false,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_DATE_FORMAT;
    use crate::test_utils::{base_schema, visible_schema};
    use serde_json::json;

    const PRIMITIVES: [CastRule; 4] = [CastRule::Int, CastRule::Float, CastRule::String, CastRule::Bool];

    const ALL: [CastRule; 10] = [
        CastRule::Int,
        CastRule::Float,
        CastRule::String,
        CastRule::Bool,
        CastRule::Object,
        CastRule::Array,
        CastRule::Json,
        CastRule::Date,
        CastRule::DateTime,
        CastRule::Timestamp,
    ];

    fn read(rule: CastRule, raw: Value) -> Result<AttrValue> {
        rule.cast_on_read("attr", Some(&raw), DEFAULT_DATE_FORMAT)
    }

    fn write(rule: CastRule, value: impl Into<AttrValue>) -> Result<Value> {
        rule.cast_on_write("attr", value.into(), DEFAULT_DATE_FORMAT)
    }

    #[test]
    fn test_null_is_preserved_for_every_rule() {
        let nested = [CastRule::Model(visible_schema), CastRule::ModelArray(base_schema)];
        for rule in ALL.iter().chain(nested.iter()) {
            assert_eq!(write(*rule, AttrValue::Null).unwrap(), Value::Null, "{rule}");
            assert_eq!(read(*rule, Value::Null).unwrap(), AttrValue::Null, "{rule}");
        }
    }

    #[test]
    fn test_primitive_round_trip_matches_direct_coercion() {
        let inputs = [json!("3"), json!(4.0), json!(2.5), json!(1), json!(0), json!(true)];
        for rule in PRIMITIVES {
            for input in &inputs {
                let direct = read(rule, input.clone()).unwrap();
                let stored = write(rule, AttrValue::from_raw(input.clone())).unwrap();
                assert_eq!(read(rule, stored).unwrap(), direct, "{rule} {input}");
            }
        }
    }

    #[test]
    fn test_primitive_coercions() {
        assert_eq!(read(CastRule::Int, json!("3")).unwrap(), AttrValue::Int(3));
        assert_eq!(read(CastRule::Float, json!("4.0")).unwrap(), AttrValue::Float(4.0));
        assert_eq!(read(CastRule::String, json!(2.5)).unwrap(), AttrValue::from("2.5"));
        assert_eq!(read(CastRule::Bool, json!(1)).unwrap(), AttrValue::Bool(true));
        assert_eq!(read(CastRule::Bool, json!(0)).unwrap(), AttrValue::Bool(false));
        assert_eq!(read(CastRule::Bool, json!("false")).unwrap(), AttrValue::Bool(false));
    }

    #[test]
    fn test_uncoercible_int_is_a_cast_failure() {
        let err = write(CastRule::Int, "abc").unwrap_err();
        assert!(matches!(err, ModelError::CastFailure { attribute, .. } if attribute == "attr"));
    }

    #[test]
    fn test_json_is_stored_as_text_and_read_as_structure() {
        let stored = write(CastRule::Json, AttrValue::Structure(json!({"foo": "bar"}))).unwrap();
        assert_eq!(stored, json!("{\"foo\":\"bar\"}"));
        assert_eq!(
            read(CastRule::Json, stored).unwrap(),
            AttrValue::Structure(json!({"foo": "bar"}))
        );
    }

    #[test]
    fn test_json_accepts_encoded_text() {
        let stored = write(CastRule::Json, "{ \"foo\" : \"bar\" }").unwrap();
        assert_eq!(stored, json!("{\"foo\":\"bar\"}"));
        assert!(write(CastRule::Json, "{not json").is_err());
    }

    #[test]
    fn test_array_wraps_scalars() {
        assert_eq!(
            read(CastRule::Array, json!("5")).unwrap(),
            AttrValue::Structure(json!([5]))
        );
    }

    #[test]
    fn test_structures_from_the_wire_are_read_directly() {
        assert_eq!(
            read(CastRule::Object, json!({"foo": "bar"})).unwrap(),
            AttrValue::Structure(json!({"foo": "bar"}))
        );
    }

    #[test]
    fn test_date_reads_at_midnight() {
        let stored = write(CastRule::Date, "1969-07-20").unwrap();
        assert_eq!(stored, json!("1969-07-20 00:00:00"));
        let value = read(CastRule::Date, json!("1969-07-20 22:56:00")).unwrap();
        let dt = value.as_date_time().unwrap();
        assert_eq!(dt.to_string(), "1969-07-20 00:00:00");
    }

    #[test]
    fn test_timestamp_is_epoch_seconds() {
        let stored = write(CastRule::Timestamp, "1969-07-20 22:56:00").unwrap();
        assert_eq!(stored, json!(-14_173_440));
        assert_eq!(read(CastRule::Timestamp, stored).unwrap(), AttrValue::Int(-14_173_440));
        assert_eq!(
            read(CastRule::Timestamp, json!("1969-07-20 22:56:00")).unwrap(),
            AttrValue::Int(-14_173_440)
        );
    }

    #[test]
    fn test_malformed_temporal_input_fails() {
        for rule in [CastRule::Date, CastRule::DateTime, CastRule::Timestamp] {
            let err = write(rule, "yesterday-ish").unwrap_err();
            match err {
                ModelError::CastFailure { attribute, value } => {
                    assert_eq!(attribute, "attr");
                    assert_eq!(value, "yesterday-ish");
                }
                other => panic!("Expected CastFailure, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_absent_model_array_reads_as_empty_collection() {
        let value = CastRule::ModelArray(base_schema)
            .cast_on_read("items", None, DEFAULT_DATE_FORMAT)
            .unwrap();
        assert!(value.as_collection().unwrap().is_empty());
    }

    #[test]
    fn test_nested_model_reads_as_instance() {
        let value = read(CastRule::Model(visible_schema), json!({"id": 1, "type": "client"})).unwrap();
        let model = value.as_model().unwrap();
        assert_eq!(model.schema().name(), "VisibleStub");
        assert_eq!(model.get_raw("type"), Some(&json!("client")));
    }

    #[test]
    fn test_nested_model_rejects_scalars() {
        assert!(read(CastRule::Model(visible_schema), json!(5)).is_err());
        assert!(read(CastRule::ModelArray(base_schema), json!([1, 2])).is_err());
    }

    #[test]
    fn test_nested_model_write_rejects_non_objects() {
        let err = write(CastRule::Model(visible_schema), 5).unwrap_err();
        assert!(matches!(err, ModelError::CastFailure { value, .. } if value == "5"));
        assert!(write(CastRule::Model(visible_schema), AttrValue::Structure(json!([1]))).is_err());

        let stored = write(CastRule::Model(visible_schema), AttrValue::Structure(json!({"id": 1})));
        assert_eq!(stored.unwrap(), json!({"id": 1}));
    }

    #[test]
    fn test_model_array_write_rejects_non_object_elements() {
        let err = write(CastRule::ModelArray(base_schema), AttrValue::Structure(json!([1, 2])))
            .unwrap_err();
        assert!(matches!(err, ModelError::CastFailure { value, .. } if value == "[1,2]"));
        assert!(write(CastRule::ModelArray(base_schema), AttrValue::Structure(json!({"id": 1}))).is_err());
        assert!(write(CastRule::ModelArray(base_schema), "items").is_err());

        let stored = write(
            CastRule::ModelArray(base_schema),
            AttrValue::Structure(json!([{"id": 1}, {"id": 2}])),
        );
        assert_eq!(stored.unwrap(), json!([{"id": 1}, {"id": 2}]));
    }

    #[test]
    fn test_read_failure_reports_text_unquoted() {
        let err = read(CastRule::DateTime, json!("31st of Never")).unwrap_err();
        assert!(matches!(err, ModelError::CastFailure { value, .. } if value == "31st of Never"));

        let err = read(CastRule::Int, json!("abc")).unwrap_err();
        assert!(matches!(err, ModelError::CastFailure { value, .. } if value == "abc"));
    }

    #[test]
    fn test_parse_rule_names() {
        assert_eq!("integer".parse::<CastRule>().unwrap(), CastRule::Int);
        assert_eq!("boolean".parse::<CastRule>().unwrap(), CastRule::Bool);
        assert_eq!("double".parse::<CastRule>().unwrap(), CastRule::Float);
        assert!(matches!(
            "money".parse::<CastRule>(),
            Err(ModelError::UnknownCastRule(name)) if name == "money"
        ));
    }

    #[test]
    fn test_nested_rule_names() {
        assert_eq!(CastRule::Model(visible_schema).name(), "VisibleStub");
        assert_eq!(CastRule::ModelArray(base_schema).name(), "Model[]");
        assert_ne!(CastRule::Model(visible_schema), CastRule::ModelArray(visible_schema));
    }
}
