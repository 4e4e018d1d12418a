//! Durable credential store behavior across process "restarts".

use mentora::creds::{CredentialStore, FileStore, TokenPair};

#[tokio::test]
async fn save_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("credentials.json");

    let store = FileStore::new(&path);
    let pair = TokenPair::new("access-123", "refresh-456");
    store.save(&pair).await.unwrap();

    assert_eq!(store.load().await.unwrap(), Some(pair.clone()));

    // A second store on the same path sees the same pair (restart survival)
    let reopened = FileStore::new(&path);
    assert_eq!(reopened.load().await.unwrap(), Some(pair));
}

#[tokio::test]
async fn clear_then_load_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path().join("credentials.json"));

    store.save(&TokenPair::new("a", "r")).await.unwrap();
    store.clear().await.unwrap();
    assert_eq!(store.load().await.unwrap(), None);

    // Clearing again is not an error
    store.clear().await.unwrap();
}

#[tokio::test]
async fn load_missing_file_is_no_session() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path().join("never-written.json"));
    assert_eq!(store.load().await.unwrap(), None);
}

#[tokio::test]
async fn save_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path().join("nested/deeper/credentials.json"));

    store.save(&TokenPair::new("a", "r")).await.unwrap();
    assert!(store.load().await.unwrap().is_some());
}

#[tokio::test]
async fn corrupt_file_is_a_storage_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("credentials.json");
    tokio::fs::write(&path, b"not json at all").await.unwrap();

    let store = FileStore::new(&path);
    let err = store.load().await.unwrap_err();
    assert!(err.is_storage_error());
}

#[tokio::test]
async fn saved_file_uses_stable_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("credentials.json");

    FileStore::new(&path)
        .save(&TokenPair::new("t1", "t2"))
        .await
        .unwrap();

    let raw: serde_json::Value =
        serde_json::from_slice(&tokio::fs::read(&path).await.unwrap()).unwrap();
    assert_eq!(raw["access_token"], "t1");
    assert_eq!(raw["refresh_token"], "t2");
}
