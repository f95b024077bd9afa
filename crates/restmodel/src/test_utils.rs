//! Stub schemas shared by the unit tests.

use once_cell::sync::Lazy;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::attributes::AttrValue;
use crate::casts::CastRule;
use crate::error::Result;
use crate::fillable::FillablePolicy;
use crate::model::Model;
use crate::schema::ModelSchema;

pub fn digest(text: &str) -> String {
    format!("{:x}", Sha256::digest(text.as_bytes()))
}

pub fn base_schema() -> &'static ModelSchema {
    ModelSchema::base()
}

pub fn visible_schema() -> &'static ModelSchema {
    static SCHEMA: Lazy<ModelSchema> =
        Lazy::new(|| ModelSchema::builder("VisibleStub").visible(["type"]).build());
    &SCHEMA
}

pub fn guarded_schema() -> &'static ModelSchema {
    static SCHEMA: Lazy<ModelSchema> = Lazy::new(|| {
        ModelSchema::builder("GuardedStub")
            .fillable_policy(FillablePolicy::fillable(["name", "email"]))
            .build()
    });
    &SCHEMA
}

pub fn casting_schema() -> &'static ModelSchema {
    static SCHEMA: Lazy<ModelSchema> = Lazy::new(|| {
        ModelSchema::builder("CastingStub")
            .cast("intAttribute", CastRule::Int)
            .cast("floatAttribute", CastRule::Float)
            .cast("stringAttribute", CastRule::String)
            .cast("boolAttribute", CastRule::Bool)
            .cast("objectAttribute", CastRule::Object)
            .cast("arrayAttribute", CastRule::Array)
            .cast("jsonAttribute", CastRule::Json)
            .cast("dateAttribute", CastRule::Date)
            .cast("datetimeAttribute", CastRule::DateTime)
            .cast("timestampAttribute", CastRule::Timestamp)
            .build()
    });
    &SCHEMA
}

fn get_list_items(_: &Model, raw: Option<&Value>) -> Result<AttrValue> {
    match raw {
        Some(Value::String(text)) => Ok(AttrValue::from_raw(serde_json::from_str(text)?)),
        _ => Ok(AttrValue::Null),
    }
}

fn set_list_items(model: &mut Model, value: AttrValue) -> Result<()> {
    let encoded = match value {
        AttrValue::Structure(structure) => serde_json::to_string(&structure)?,
        other => serde_json::to_string(&other.into_raw("%Y-%m-%d %H:%M:%S"))?,
    };
    model.attributes_mut().set("list_items", Value::String(encoded));
    Ok(())
}

fn get_password(_: &Model, _: Option<&Value>) -> Result<AttrValue> {
    Ok(AttrValue::from("******"))
}

fn set_password(model: &mut Model, value: AttrValue) -> Result<()> {
    let plain = value.as_str().unwrap_or_default().to_string();
    model
        .attributes_mut()
        .set("password_hash", Value::String(digest(&plain)));
    Ok(())
}

fn get_nickname(_: &Model, raw: Option<&Value>) -> Result<AttrValue> {
    Ok(raw
        .and_then(Value::as_str)
        .map_or(AttrValue::Null, |s| AttrValue::from(s.to_uppercase())))
}

fn shout(model: &mut Model, _: Vec<AttrValue>) -> Result<AttrValue> {
    let name = model.get_attribute("nickname")?;
    Ok(AttrValue::from(format!("{}!", name.as_str().unwrap_or_default())))
}

pub fn mutator_schema() -> &'static ModelSchema {
    static SCHEMA: Lazy<ModelSchema> = Lazy::new(|| {
        ModelSchema::builder("MutatorStub")
            .get_mutator("list_items", get_list_items)
            .set_mutator("list_items", set_list_items)
            .get_mutator("password", get_password)
            .set_mutator("password", set_password)
            .cast("nickname", CastRule::Int)
            .get_mutator("nickname", get_nickname)
            .extension("shout", shout)
            .snake_attributes(true)
            .build()
    });
    &SCHEMA
}

pub fn pathed_schema() -> &'static ModelSchema {
    static SCHEMA: Lazy<ModelSchema> = Lazy::new(|| {
        ModelSchema::builder("PathedStub")
            .path("contacts/{contact_id}/items/{id}")
            .build()
    });
    &SCHEMA
}
