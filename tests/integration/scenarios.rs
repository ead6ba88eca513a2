//! End-to-end scenarios over an in-memory store.

use crate::common::*;
use schemastore::codec::{decode, encode};
use schemastore::Decoded;

#[test]
fn flat_object_encodes_to_positional_array() {
    let registry = SchemaRegistry::default();
    let schema: Schema = registry.define_template(user_fields()).unwrap().into();

    let encoded = encode(&schema, &json!({"userId": "42", "userName": null})).unwrap();
    assert_eq!(encoded, json!(["42", null]));

    let decoded = decode(&schema, r#"["42", null]"#).unwrap();
    assert_eq!(decoded, Decoded::Valid(json!({"userId": "42", "userName": null})));
}

#[test]
fn nested_object_encodes_to_nested_array() {
    let registry = SchemaRegistry::default();
    let schema: Schema = registry
        .define_template(account_fields(&registry))
        .unwrap()
        .into();

    let value = json!({"profile": {"userId": "1", "userName": "bob"}, "active": true});
    assert_eq!(encode(&schema, &value).unwrap(), json!([["1", "bob"], true]));
}

#[tokio::test(start_paused = true)]
async fn read_once_with_ttl_is_consumed_by_first_read() {
    let (registry, conn) = connected_registry();
    let store = registry
        .define_schema(
            registry.define_template(user_fields()).unwrap(),
            SchemaOptions::default().ttl(2).read_once(true),
        )
        .unwrap();

    let value = json!({"userId": "7", "userName": null});
    store.set("x", &value).await.unwrap();

    assert_eq!(store.get("x").await.unwrap(), Some(value));
    assert!(conn.is_empty());

    // Still inside the 2 second window
    tokio::time::advance(Duration::from_millis(500)).await;
    assert_eq!(store.get("x").await.unwrap(), None);
}

#[tokio::test]
async fn missing_key_forced_and_unforced() {
    let (registry, _conn) = connected_registry();
    let store = registry
        .define_schema(
            registry.define_template(user_fields()).unwrap(),
            SchemaOptions::default(),
        )
        .unwrap();

    assert!(matches!(
        store.get_forced("missing").await,
        Err(Error::KeyNotFound { .. })
    ));
    assert_eq!(store.get("missing").await.unwrap(), None);
}

#[tokio::test]
async fn nested_records_round_trip_through_store() {
    let (registry, conn) = connected_registry();
    let store = registry
        .define_schema(
            registry.define_template(account_fields(&registry)).unwrap(),
            SchemaOptions::default().namespace("accounts"),
        )
        .unwrap();

    let value = json!({"profile": {"userId": "1", "userName": "bob"}, "active": true});
    store.set("bob", &value).await.unwrap();

    assert_eq!(conn.keys(), vec!["accounts+bob".to_string()]);
    assert_eq!(store.get("bob").await.unwrap(), Some(value));
}

#[tokio::test]
async fn stores_with_different_schemas_are_isolated() {
    let (registry, _conn) = connected_registry();
    let users = registry
        .define_schema(
            registry.define_template(user_fields()).unwrap(),
            SchemaOptions::default(),
        )
        .unwrap();
    let counters = registry
        .define_schema(Schema::integer(), SchemaOptions::default())
        .unwrap();

    users.set("same", &json!({"userId": "u"})).await.unwrap();
    counters.set("same", &json!(3)).await.unwrap();

    assert_ne!(users.namespace(), counters.namespace());
    assert_eq!(users.get("same").await.unwrap(), Some(json!({"userId": "u"})));
    assert_eq!(counters.get("same").await.unwrap(), Some(json!(3)));
}

#[tokio::test]
async fn random_key_writes_and_reads_back() {
    let (registry, _conn) = connected_registry();
    let store = registry
        .define_schema(
            registry.define_template(user_fields()).unwrap(),
            SchemaOptions::default(),
        )
        .unwrap();

    let value = json!({"userId": "r", "userName": "random"});
    let key = store.random_key().set(&value).await.unwrap();
    assert_eq!(store.with(&key, |v| v["userName"].clone()).await.unwrap(), Some(json!("random")));
}
