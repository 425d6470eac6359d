use polystore::{
    EntityState, EntityType, Field, InMemoryAdapter, LifecycleOperation, Model, ModelRegistry,
    StoreError,
};
use serde_json::{Value, json};
use std::sync::Arc;

fn profiles() -> Arc<EntityType> {
    let model = Model::builder("Profile")
        .attribute("name", "")
        .attribute("age", 0)
        .attribute("tags", json!([]))
        .attribute("settings", json!({"theme": "light", "lang": "en"}))
        .data_source("memory", Arc::new(InMemoryAdapter::new("memory")))
        .build()
        .unwrap();
    let mut registry = ModelRegistry::new();
    registry.register(model).unwrap()
}

#[test]
fn every_declared_subset_constructs_with_defaults() {
    let profiles = profiles();
    let full = json!({
        "name": "Alice",
        "age": 30,
        "tags": ["admin"],
        "settings": {"theme": "dark"}
    });
    let fields = ["name", "age", "tags", "settings"];

    for mask in 0u8..16 {
        let mut source = serde_json::Map::new();
        for (bit, field) in fields.iter().enumerate() {
            if mask & (1 << bit) != 0 {
                source.insert(field.to_string(), full[*field].clone());
            }
        }

        let entity = profiles.create(source.clone()).unwrap();
        assert_eq!(entity.state(), EntityState::Orphan);
        assert_eq!(entity.last_data_source(), None);

        let object = entity.to_object();
        for field in fields {
            let expected = match (field, source.get(field)) {
                ("settings", Some(_)) => json!({"theme": "dark", "lang": "en"}),
                (_, Some(value)) => value.clone(),
                (_, None) => profiles.defaults()[field].clone(),
            };
            assert_eq!(object[field], expected, "mask {} field {}", mask, field);
        }
        assert_eq!(object.len(), fields.len());
    }
}

#[test]
fn every_reserved_name_is_rejected() {
    let profiles = profiles();
    for op in LifecycleOperation::ALL {
        let mut source = serde_json::Map::new();
        source.insert("name".to_string(), json!("x"));
        source.insert(op.as_str().to_string(), json!(1));
        let err = profiles.create(source).unwrap_err();
        assert_eq!(err, StoreError::ReservedKeys(vec![op.as_str().to_string()]));
    }
}

#[test]
fn reserved_names_are_reported_before_unknown_names() {
    let profiles = profiles();
    let err = profiles
        .create_from_json(json!({"fetch": 1, "unknown": 2}))
        .unwrap_err();
    assert_eq!(err, StoreError::ReservedKeys(vec!["fetch".to_string()]));
}

#[test]
fn entity_type_metadata() {
    let profiles = profiles();
    assert_eq!(profiles.name(), "ProfileEntity");
    assert_eq!(profiles.model().name(), "Profile");
    assert_eq!(
        EntityType::reserved_names().len(),
        LifecycleOperation::ALL.len()
    );
}

#[test]
fn operations_survive_writes_to_their_names() {
    let profiles = profiles();
    let mut entity = profiles.create_from_json(json!({"name": "Alice"})).unwrap();

    for op in LifecycleOperation::ALL {
        assert!(!entity.set(op.as_str(), json!("overwritten")));
        assert_eq!(entity.field(op.as_str()), Field::Operation(op));
        assert!(!entity.contains_key(op.as_str()));
    }
    assert_eq!(entity.to_object().len(), 4);
}

#[test]
fn attributes_are_detached_copies() {
    let profiles = profiles();
    let mut entity = profiles.create_from_json(json!({"tags": ["a"]})).unwrap();

    let mut copy = entity.to_object();
    copy.insert("name".to_string(), json!("mutated"));
    assert_eq!(entity.get("name"), Some(&json!("")));

    entity.set("tags", json!(["a", "b"]));
    assert_eq!(copy["tags"], json!(["a"]));
    assert_eq!(entity.get("tags"), Some(&Value::from(vec!["a", "b"])));
}
