//! Cross-cutting properties: namespace determinism, random keys, wire layout.

use crate::common::*;
use schemastore::codec::{derive_namespace, full_key, generate_random_key, NamespaceOptions};
use std::collections::HashSet;

#[test]
fn namespace_is_stable_across_registries_and_calls() {
    let namespaces: HashSet<String> = (0..5)
        .map(|_| {
            let registry = SchemaRegistry::default();
            registry
                .define_schema(
                    registry.define_template(user_fields()).unwrap(),
                    SchemaOptions::default().ttl(60),
                )
                .unwrap()
                .namespace()
                .to_string()
        })
        .collect();
    assert_eq!(namespaces.len(), 1);
}

#[test]
fn namespace_matches_direct_derivation() {
    let registry = SchemaRegistry::default();
    let template = registry.define_template(user_fields()).unwrap();
    let store = registry
        .define_schema(template.clone(), SchemaOptions::default().read_once(true))
        .unwrap();

    let expected = derive_namespace(
        &Schema::from(template).describe(),
        &NamespaceOptions {
            ttl: None,
            read_once: true,
        },
    )
    .unwrap();
    assert_eq!(store.namespace(), expected);
}

#[test]
fn explicit_namespace_ignores_options() {
    let registry = SchemaRegistry::default();
    let a = registry
        .define_schema(Schema::string(), SchemaOptions::default().namespace("fixed"))
        .unwrap();
    let b = registry
        .define_schema(
            Schema::string(),
            SchemaOptions::default().namespace("fixed").ttl(9).read_once(true),
        )
        .unwrap();
    assert_eq!(a.namespace(), b.namespace());
    assert_eq!(b.options().ttl, Some(9));
    assert!(b.options().read_once);
}

#[test]
fn random_keys_are_distinct() {
    let keys: HashSet<String> = (0..50_000)
        .map(|_| generate_random_key(16).unwrap())
        .collect();
    assert_eq!(keys.len(), 50_000);
}

#[tokio::test]
async fn random_key_set_produces_distinct_stored_records() {
    let (registry, conn) = connected_registry();
    let store = registry
        .define_schema(Schema::integer(), SchemaOptions::default().namespace("r"))
        .unwrap();

    let mut keys = HashSet::new();
    for i in 0..1_000 {
        keys.insert(store.random_key().set(&json!(i)).await.unwrap());
    }
    assert_eq!(keys.len(), 1_000);
    assert_eq!(conn.len(), 1_000);
    assert!(keys.iter().all(|k| k.len() == 22));
}

#[tokio::test]
async fn separator_in_logical_key_is_opaque() {
    let (registry, conn) = connected_registry();
    let store = registry
        .define_schema(Schema::string(), SchemaOptions::default().namespace("ns"))
        .unwrap();

    store.set("a+b", &json!("first")).await.unwrap();
    store.set("a", &json!("second")).await.unwrap();

    assert_eq!(store.full_key("a+b"), full_key("ns", "a+b"));
    assert_eq!(store.get("a+b").await.unwrap(), Some(json!("first")));
    assert_eq!(store.get("a").await.unwrap(), Some(json!("second")));
    assert_eq!(conn.len(), 2);
}

#[tokio::test]
async fn non_object_values_are_stored_bare() {
    let (registry, conn) = connected_registry();
    let tags = registry
        .define_schema(
            Schema::array(Schema::nullable(Schema::string())),
            SchemaOptions::default().namespace("tags"),
        )
        .unwrap();

    tags.set("t", &json!(["a", null, "c"])).await.unwrap();
    assert_eq!(
        conn.get("tags+t").await.unwrap(),
        Some(br#"["a",null,"c"]"#.to_vec())
    );
    assert_eq!(tags.get("t").await.unwrap(), Some(json!(["a", null, "c"])));
}

#[tokio::test]
async fn concurrent_writes_to_different_keys_are_independent() {
    let (registry, conn) = connected_registry();
    let store = registry
        .define_schema(Schema::integer(), SchemaOptions::default().namespace("c"))
        .unwrap();

    let mut handles = Vec::new();
    for i in 0..64 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store.set(&format!("k{}", i), &json!(i)).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(conn.len(), 64);
    for i in 0..64 {
        assert_eq!(store.get(&format!("k{}", i)).await.unwrap(), Some(json!(i)));
    }
}
