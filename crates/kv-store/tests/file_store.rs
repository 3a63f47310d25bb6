//! Integration tests for the file-backed key-value store.

use kv_store::{FileKvStore, KvStore, KvStoreExt, Slot, StorageError};

#[tokio::test]
async fn missing_key_returns_none() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileKvStore::new(dir.path());

    assert!(store.get("@RocketShoes:cart").await.unwrap().is_none());
}

#[tokio::test]
async fn set_creates_root_and_persists_value() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("nested").join("data");
    let store = FileKvStore::new(&root);

    store.set("@RocketShoes:cart", "[]".to_string()).await.unwrap();

    let path = store.path_for("@RocketShoes:cart").unwrap();
    assert!(path.starts_with(&root));
    assert_eq!(std::fs::read_to_string(path).unwrap(), "[]");
}

#[tokio::test]
async fn value_survives_a_new_store_instance() {
    let dir = tempfile::tempdir().unwrap();

    FileKvStore::new(dir.path())
        .set_json("numbers", &vec![3, 1, 2])
        .await
        .unwrap();

    let reopened = FileKvStore::new(dir.path());
    let numbers: Option<Vec<i32>> = reopened.get_json("numbers").await.unwrap();
    assert_eq!(numbers, Some(vec![3, 1, 2]));
}

#[tokio::test]
async fn overwrite_leaves_no_temporary_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileKvStore::new(dir.path());

    store.set("cart", "[1]".to_string()).await.unwrap();
    store.set("cart", "[1,2]".to_string()).await.unwrap();

    assert_eq!(store.get("cart").await.unwrap().as_deref(), Some("[1,2]"));
    let files: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(files.len(), 1);
}

#[tokio::test]
async fn remove_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileKvStore::new(dir.path());
    store.set("cart", "[]".to_string()).await.unwrap();

    store.remove("cart").await.unwrap();
    store.remove("cart").await.unwrap();

    assert!(!store.contains_key("cart").await.unwrap());
}

#[tokio::test]
async fn empty_key_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileKvStore::new(dir.path());

    assert!(matches!(
        store.set("", "x".to_string()).await,
        Err(StorageError::InvalidKey(_))
    ));
}

#[tokio::test]
async fn slot_over_file_store_roundtrips() {
    let dir = tempfile::tempdir().unwrap();
    let slot = Slot::new(FileKvStore::new(dir.path()), "@RocketShoes:cart");

    slot.save(&vec!["a".to_string(), "b".to_string()])
        .await
        .unwrap();

    let reloaded: Slot<_, Vec<String>> =
        Slot::new(FileKvStore::new(dir.path()), "@RocketShoes:cart");
    assert_eq!(
        reloaded.load().await.unwrap(),
        Some(vec!["a".to_string(), "b".to_string()])
    );
}
