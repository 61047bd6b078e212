//! Integration tests for the device registries against in-memory SQLite.

use macwatch_store::{KnownRegistry, Store, StoreError, UnknownRegistry};

async fn setup() -> (Store, KnownRegistry, UnknownRegistry) {
    let store = Store::open_in_memory().await.unwrap();
    store.init_schema().await.unwrap();
    let known = KnownRegistry::new(&store);
    let unknown = UnknownRegistry::new(&store);
    (store, known, unknown)
}

#[tokio::test]
async fn insert_and_read_known() {
    let (_store, known, _unknown) = setup().await;

    known.insert("Printer", "aa:bb:cc:dd:ee:01").await.unwrap();

    let rows = known.all().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Printer");
    assert_eq!(rows[0].mac, "aa:bb:cc:dd:ee:01");
    assert_eq!(rows[0].ip, None);
}

#[tokio::test]
async fn insert_strips_embedded_whitespace() {
    let (_store, known, _unknown) = setup().await;

    known.insert("NAS", " aa:bb: cc:dd:ee:02 ").await.unwrap();

    let macs = known.macs().await.unwrap();
    assert_eq!(macs, vec!["aa:bb:cc:dd:ee:02"]);
}

#[tokio::test]
async fn insert_rejects_malformed_mac() {
    let (_store, known, unknown) = setup().await;

    let err = known.insert("Printer", "not-a-mac").await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidMac { .. }));
    assert_eq!(known.count().await.unwrap(), 0);

    let err = unknown.insert("10.0.0.9", "zz:bb:cc:dd:ee:01").await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidMac { .. }));
    assert_eq!(unknown.count().await.unwrap(), 0);
}

#[tokio::test]
async fn insert_rejects_empty_name() {
    let (_store, known, _unknown) = setup().await;

    let err = known.insert("  ", "aa:bb:cc:dd:ee:03").await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidName));
    assert_eq!(known.count().await.unwrap(), 0);
}

#[tokio::test]
async fn duplicate_check_precedes_syntax_check() {
    let (_store, known, _unknown) = setup().await;

    known.insert("A", "aa:bb:cc:dd:ee:04").await.unwrap();

    // Same MAC again: rejected as a duplicate, store unchanged.
    let err = known.insert("B", "aa:bb:cc:dd:ee:04").await.unwrap_err();
    assert!(matches!(err, StoreError::DuplicateMac { .. }));
    assert_eq!(known.count().await.unwrap(), 1);
}

#[tokio::test]
async fn duplicate_check_folds_case_and_separators() {
    let (_store, known, unknown) = setup().await;

    known.insert("Printer", "aa:bb:cc:dd:ee:01").await.unwrap();

    // Same device written differently: still one identity, still rejected.
    let err = known
        .insert("Printer2", "AA:BB:CC:DD:EE:01")
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateMac { .. }));
    let err = known
        .insert("Printer3", "aa-bb-cc-dd-ee-01")
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateMac { .. }));
    assert_eq!(known.count().await.unwrap(), 1);

    unknown.insert("10.0.0.5", "bb:bb:cc:dd:ee:02").await.unwrap();
    let err = unknown
        .insert("10.0.0.6", "BB-BB-CC-DD-EE-02")
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateMac { .. }));
    assert_eq!(unknown.count().await.unwrap(), 1);
}

#[tokio::test]
async fn duplicate_scope_is_per_registry() {
    let (_store, known, unknown) = setup().await;

    unknown.insert("10.0.0.5", "aa:bb:cc:dd:ee:05").await.unwrap();

    // Promotion: the MAC only exists in the unknown registry, so the known
    // insert succeeds.
    known.insert("Printer", "aa:bb:cc:dd:ee:05").await.unwrap();
    assert_eq!(known.count().await.unwrap(), 1);
    assert_eq!(unknown.count().await.unwrap(), 1);
}

#[tokio::test]
async fn column_projection_and_unknown_column() {
    let (_store, known, _unknown) = setup().await;

    known.insert("A", "aa:bb:cc:dd:ee:06").await.unwrap();
    known.insert("B", "aa:bb:cc:dd:ee:07").await.unwrap();

    let names = known.column("name").await.unwrap();
    assert_eq!(
        names,
        vec![Some("A".to_string()), Some("B".to_string())]
    );

    // Nullable column comes back as None until the engine fills it.
    let ips = known.column("ip").await.unwrap();
    assert_eq!(ips, vec![None, None]);

    let err = known.column("hostname").await.unwrap_err();
    assert!(matches!(err, StoreError::UnknownColumn { .. }));
}

#[tokio::test]
async fn set_ip_and_clear() {
    let (_store, known, _unknown) = setup().await;

    known.insert("A", "aa:bb:cc:dd:ee:08").await.unwrap();
    let id = known.all().await.unwrap()[0].id;

    known.set_ip(id, Some("192.168.1.20")).await.unwrap();
    assert_eq!(
        known.all().await.unwrap()[0].ip.as_deref(),
        Some("192.168.1.20")
    );

    known.set_ip(id, None).await.unwrap();
    assert_eq!(known.all().await.unwrap()[0].ip, None);
}

#[tokio::test]
async fn update_where_validates_new_mac() {
    let (_store, known, _unknown) = setup().await;

    known.insert("A", "aa:bb:cc:dd:ee:09").await.unwrap();

    let err = known
        .update_where("name", "A", "mac", "bogus")
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidMac { .. }));

    let updated = known
        .update_where("name", "A", "mac", "aa:bb:cc:dd:ee:0a")
        .await
        .unwrap();
    assert_eq!(updated, 1);
    assert_eq!(known.macs().await.unwrap(), vec!["aa:bb:cc:dd:ee:0a"]);
}

#[tokio::test]
async fn update_where_matches_id_as_text() {
    let (_store, _known, unknown) = setup().await;

    unknown.insert("10.0.0.1", "aa:bb:cc:dd:ee:0b").await.unwrap();
    let id = unknown.all().await.unwrap()[0].id;

    let updated = unknown
        .update_where("id", &id.to_string(), "ip", "10.0.0.99")
        .await
        .unwrap();
    assert_eq!(updated, 1);
    assert_eq!(unknown.all().await.unwrap()[0].ip, "10.0.0.99");
}

#[tokio::test]
async fn delete_where_removes_matching_rows() {
    let (_store, _known, unknown) = setup().await;

    unknown.insert("10.0.0.1", "aa:bb:cc:dd:ee:0c").await.unwrap();
    unknown.insert("10.0.0.2", "aa:bb:cc:dd:ee:0d").await.unwrap();

    let removed = unknown.delete_where("ip", "10.0.0.1").await.unwrap();
    assert_eq!(removed, 1);
    assert_eq!(unknown.count().await.unwrap(), 1);

    let err = unknown.delete_where("name", "x").await.unwrap_err();
    assert!(matches!(err, StoreError::UnknownColumn { .. }));
}

#[tokio::test]
async fn file_backed_store_persists_across_handles() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("devices.db");
    let path = path.to_str().unwrap();

    {
        let store = Store::open(path).await.unwrap();
        store.init_schema().await.unwrap();
        let known = KnownRegistry::new(&store);
        known.insert("Router", "aa:bb:cc:dd:ee:0e").await.unwrap();
    }

    let store = Store::open(path).await.unwrap();
    store.init_schema().await.unwrap();
    let known = KnownRegistry::new(&store);
    assert_eq!(known.count().await.unwrap(), 1);
}
