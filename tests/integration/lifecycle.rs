//! Registry lifecycle and readiness gate behavior.

use crate::common::*;
use schemastore::CONFIG_FILE_NAME;
use tokio::time::Instant;

#[tokio::test(start_paused = true)]
async fn operations_wait_for_initialize() {
    init_tracing();
    let registry = Arc::new(SchemaRegistry::default());
    let store = registry
        .define_schema(Schema::string(), SchemaOptions::default().namespace("s"))
        .unwrap();

    registry.attach_client(Arc::new(MemoryConnection::new()));
    let host = registry.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(2)).await;
        host.on_initialize().await
    });

    let start = Instant::now();
    assert_eq!(store.set("a", &json!("hello")).await.unwrap(), "a");
    // Ready at 2s; the gate notices on the next 100ms poll at the latest
    let waited = start.elapsed();
    assert!(waited >= Duration::from_secs(2) && waited <= Duration::from_millis(2100));
    assert_eq!(store.get("a").await.unwrap(), Some(json!("hello")));
}

#[tokio::test(start_paused = true)]
async fn slow_connect_is_awaited() {
    init_tracing();
    let registry = SchemaRegistry::default();
    let conn = Arc::new(MemoryConnection::new().with_connect_delay(Duration::from_secs(3)));
    registry.attach_client(conn.clone());
    let store = registry
        .define_schema(Schema::boolean(), SchemaOptions::default())
        .unwrap();

    let connector = conn.clone();
    tokio::spawn(async move { connector.connect().await });

    store.set("flag", &json!(true)).await.unwrap();
    assert!(registry.is_ready());
}

#[tokio::test(start_paused = true)]
async fn default_gate_gives_up_after_thirty_seconds() {
    init_tracing();
    let registry = SchemaRegistry::default();
    let store = registry
        .define_schema(Schema::string(), SchemaOptions::default())
        .unwrap();

    let start = Instant::now();
    let err = store.get("x").await.unwrap_err();
    assert!(matches!(
        err,
        Error::NotReady {
            attempts: 300,
            interval_ms: 100
        }
    ));
    assert_eq!(start.elapsed(), Duration::from_secs(30));
    assert!(err.to_string().contains("must be established"));
}

#[tokio::test(start_paused = true)]
async fn attached_but_never_connected_times_out() {
    let registry = fast_gate_registry(5);
    registry.attach_client(Arc::new(MemoryConnection::new()));
    let store = registry
        .define_schema(Schema::string(), SchemaOptions::default())
        .unwrap();

    assert!(matches!(
        store.set("x", &json!("v")).await,
        Err(Error::NotReady { attempts: 5, .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn every_operation_passes_the_gate() {
    let registry = fast_gate_registry(2);
    let store = registry
        .define_schema(Schema::string(), SchemaOptions::default())
        .unwrap();

    assert!(matches!(store.set("k", &json!("v")).await, Err(Error::NotReady { .. })));
    assert!(matches!(store.get("k").await, Err(Error::NotReady { .. })));
    assert!(matches!(store.get_forced("k").await, Err(Error::NotReady { .. })));
    assert!(matches!(store.delete("k").await, Err(Error::NotReady { .. })));
    assert!(matches!(store.with("k", |v| v).await, Err(Error::NotReady { .. })));
    assert!(matches!(
        store.random_key().set(&json!("v")).await,
        Err(Error::NotReady { .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn on_before_exit_closes_access() {
    let registry = fast_gate_registry(3);
    let conn = Arc::new(MemoryConnection::new());
    registry.attach_client(conn.clone());
    registry.on_initialize().await.unwrap();

    let store = registry
        .define_schema(Schema::integer(), SchemaOptions::default())
        .unwrap();
    store.set("n", &json!(1)).await.unwrap();

    registry.on_before_exit().await.unwrap();
    assert!(!conn.is_ready());
    assert!(!registry.is_attached());
    assert!(matches!(store.get("n").await, Err(Error::NotReady { .. })));
}

#[tokio::test]
async fn reattaching_switches_every_store() {
    let (registry, first) = connected_registry();
    let store = registry
        .define_schema(Schema::integer(), SchemaOptions::default().namespace("n"))
        .unwrap();
    store.set("a", &json!(1)).await.unwrap();

    let second = Arc::new(MemoryConnection::connected());
    registry.attach_client(second.clone());
    assert_eq!(store.get("a").await.unwrap(), None);
    store.set("a", &json!(2)).await.unwrap();

    assert_eq!(first.keys(), vec!["n+a".to_string()]);
    assert_eq!(second.keys(), vec!["n+a".to_string()]);
}

#[tokio::test]
async fn registry_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        "random_key_bytes = 24\n\n[readiness]\nmax_attempts = 10\n",
    )
    .unwrap();

    let config = RegistryConfig::load_or_default(dir.path()).unwrap();
    let registry = SchemaRegistry::new(config).unwrap();
    assert_eq!(registry.config().readiness.max_attempts, 10);

    registry.attach_client(Arc::new(MemoryConnection::connected()));
    let store = registry
        .define_schema(Schema::string(), SchemaOptions::default())
        .unwrap();
    let key = store.random_key().set(&json!("v")).await.unwrap();
    // 24 bytes encode to 32 URL-safe characters
    assert_eq!(key.len(), 32);
}
