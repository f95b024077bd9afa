use once_cell::sync::Lazy;
use restmodel::{AttrValue, CastRule, Collection, Hydrated, Model, ModelSchema};
use serde_json::{json, Value};

fn visible_stub() -> &'static ModelSchema {
    static SCHEMA: Lazy<ModelSchema> =
        Lazy::new(|| ModelSchema::builder("ResourceModelVisibleStub").visible(["type"]).build());
    &SCHEMA
}

fn transform_stub() -> &'static ModelSchema {
    static SCHEMA: Lazy<ModelSchema> = Lazy::new(|| {
        ModelSchema::builder("ResourceModelTransformStub")
            .cast("contact", CastRule::Model(visible_stub))
            .cast("items", CastRule::ModelArray(ModelSchema::base))
            .cast("date", CastRule::Date)
            .visible(["*"])
            .build()
    });
    &SCHEMA
}

fn contact() -> AttrValue {
    AttrValue::Structure(json!({"id": 1, "name": "Test", "type": "client"}))
}

fn items() -> AttrValue {
    AttrValue::Structure(json!([
        {"id": 1, "price": 5},
        {"id": 2, "price": 10},
    ]))
}

#[test]
fn test_nested_model_cast() {
    let mut model = Model::new(transform_stub());
    model.set_attribute("contact", contact()).unwrap();

    let contact = model.get_attribute("contact").unwrap();
    let contact = contact.as_model().unwrap();
    assert_eq!(contact.schema().name(), "ResourceModelVisibleStub");
    assert_eq!(contact.get_attribute("name").unwrap(), AttrValue::from("Test"));
    assert_eq!(contact.get_attribute("type").unwrap(), AttrValue::from("client"));
}

#[test]
fn test_nested_model_write_extracts_structure() {
    let mut model = Model::new(transform_stub());
    let contact = Model::make(visible_stub(), [("id", json!(4)), ("type", json!("lead"))]).unwrap();
    model.set_attribute("contact", contact).unwrap();

    assert_eq!(model.get_raw("contact"), Some(&json!({"id": 4, "type": "lead"})));
}

#[test]
fn test_model_array_cast() {
    let mut model = Model::new(transform_stub());
    model.set_attribute("items", items()).unwrap();

    let items = model.get_attribute("items").unwrap().into_collection().unwrap();
    assert_eq!(items.len(), 2);
    for item in &items {
        assert_eq!(item.schema().name(), "Model");
        assert!(item.has("id"));
        assert!(item.has("price"));
    }
}

#[test]
fn test_model_array_write_accepts_collection() {
    let mut model = Model::new(transform_stub());
    let mut items = model.get_attribute("items").unwrap().into_collection().unwrap();
    assert!(items.is_empty());

    items
        .add(AttrValue::Structure(json!({"id": 1, "price": 5})))
        .unwrap()
        .add(AttrValue::Structure(json!({"id": 2, "price": 10})))
        .unwrap();
    model.set_attribute("items", items).unwrap();

    assert_eq!(
        model.get_raw("items"),
        Some(&json!([{"id": 1, "price": 5}, {"id": 2, "price": 10}]))
    );
    let items = model.get_attribute("items").unwrap().into_collection().unwrap();
    assert_eq!(items.len(), 2);
    for item in items {
        assert!(item.has("id"));
        assert!(item.has("price"));
    }
}

#[test]
fn test_transforms_use_restricted_projection_of_nested_values() {
    let mut model = Model::new(transform_stub());
    model
        .fill([
            ("date", AttrValue::from("2024-02-29")),
            ("contact", contact()),
            ("items", items()),
        ])
        .unwrap();

    let standalone = Model::make(
        visible_stub(),
        [("id", json!(1)), ("name", json!("Test")), ("type", json!("client"))],
    )
    .unwrap();
    let array = standalone.to_structure().unwrap();
    assert!(array.contains_key("id"));
    assert!(array.contains_key("name"));
    assert!(array.contains_key("type"));

    let structure = model.to_structure().unwrap();
    assert_eq!(structure["contact"], json!({"id": 1, "type": "client"}));
    assert_eq!(structure["items"], json!([{"id": 1}, {"id": 2}]));
    assert_eq!(structure["date"], json!("2024-02-29 00:00:00"));

    assert_eq!(model.to_restricted_structure().unwrap(), structure);
}

#[test]
fn test_hydrated_collection_from_response() {
    let body: Value = serde_json::from_str(
        r#"[{"id": 1, "name": "A", "type": "client"}, {"id": 2, "name": "B", "type": "lead"}]"#,
    )
    .unwrap();

    let Hydrated::Many(collection) = Model::from_response(visible_stub(), body).unwrap() else {
        panic!("Expected a collection");
    };
    assert_eq!(
        collection.all_visible().unwrap(),
        vec![json!({"id": 1, "type": "client"}), json!({"id": 2, "type": "lead"})]
    );
}

#[test]
fn test_explicit_null_model_array_reads_null() {
    let mut model = Model::new(transform_stub());
    model.set_attribute("items", AttrValue::Null).unwrap();
    assert_eq!(model.get_attribute("items").unwrap(), AttrValue::Null);

    let empty = Collection::new(ModelSchema::base());
    model.set_attribute("items", empty).unwrap();
    assert_eq!(model.get_raw("items"), Some(&json!([])));
}

#[test]
fn test_nested_casts_reject_malformed_writes() {
    let mut model = Model::new(transform_stub());
    assert!(model.set_attribute("contact", 5).is_err());
    assert!(model
        .set_attribute("items", AttrValue::Structure(json!([1, 2])))
        .is_err());
    assert!(!model.has("contact"));
    assert!(!model.has("items"));

    let err = model
        .fill([("contact", contact()), ("items", AttrValue::Structure(json!([1, 2])))])
        .unwrap_err();
    assert!(matches!(err, restmodel::ModelError::CastFailure { attribute, .. } if attribute == "items"));
    assert!(!model.has("contact"));
    assert!(model.to_structure().unwrap().is_empty());
}
