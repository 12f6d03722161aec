//! Account slice tests


use annil_core::AccountDirectory;
use annil_storage::{accounts, StorageError};
use chrono::{Duration, Utc};
use test_helpers::{create_test_db, TEST_HASH};

#[tokio::test]
async fn test_create_and_get_account() {
    let db = create_test_db().await;

    let created = accounts::create(db.pool(), "alice", TEST_HASH).await.unwrap();
    assert_eq!(created.username, "alice");
    assert!(!created.allow_share);
    assert!(!created.is_admin);

    let fetched = accounts::get(db.pool(), "alice").await.unwrap().unwrap();
    assert_eq!(fetched, created);
    assert!(accounts::get(db.pool(), "bob").await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_username_rejected() {
    let db = create_test_db().await;

    accounts::create(db.pool(), "alice", TEST_HASH).await.unwrap();
    let result = accounts::create(db.pool(), "alice", TEST_HASH).await;

    assert!(matches!(result, Err(StorageError::Duplicate(_))));
}

#[tokio::test]
async fn test_capability_flags() {
    let db = create_test_db().await;
    accounts::create(db.pool(), "alice", TEST_HASH).await.unwrap();

    accounts::set_allow_share(db.pool(), "alice", true).await.unwrap();
    accounts::set_admin(db.pool(), "alice", true).await.unwrap();

    assert!(accounts::allow_share(db.pool(), "alice").await.unwrap());
    assert!(accounts::is_admin(db.pool(), "alice").await.unwrap());

    // Unknown accounts have no capabilities
    assert!(!accounts::allow_share(db.pool(), "ghost").await.unwrap());
    assert!(!accounts::is_admin(db.pool(), "ghost").await.unwrap());

    let result = accounts::set_admin(db.pool(), "ghost", true).await;
    assert!(matches!(result, Err(StorageError::NotFound { .. })));
}

#[tokio::test]
async fn test_password_hash_roundtrip() {
    let db = create_test_db().await;
    accounts::create(db.pool(), "alice", TEST_HASH).await.unwrap();

    accounts::set_password_hash(db.pool(), "alice", "new-hash").await.unwrap();
    assert_eq!(
        accounts::password_hash(db.pool(), "alice").await.unwrap().as_deref(),
        Some("new-hash")
    );
    assert!(accounts::password_hash(db.pool(), "ghost").await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_and_reregister_moves_registration_time() {
    let db = create_test_db().await;
    let first = Utc::now() - Duration::hours(2);
    accounts::create_registered_at(db.pool(), "alice", TEST_HASH, first)
        .await
        .unwrap();

    assert!(accounts::delete(db.pool(), "alice").await.unwrap());
    assert!(!accounts::delete(db.pool(), "alice").await.unwrap());
    assert!(db.registration_time("alice").await.unwrap().is_none());

    accounts::create(db.pool(), "alice", TEST_HASH).await.unwrap();
    let second = db.registration_time("alice").await.unwrap().unwrap();
    assert!(second.timestamp() > first.timestamp());
}

#[tokio::test]
async fn test_directory_contract() {
    let db = create_test_db().await;
    accounts::create(db.pool(), "alice", TEST_HASH).await.unwrap();
    accounts::set_allow_share(db.pool(), "alice", true).await.unwrap();

    assert!(db.account_exists("alice").await.unwrap());
    assert!(!db.account_exists("bob").await.unwrap());
    assert!(db.share_capability("alice").await.unwrap());
    assert!(!db.share_capability("bob").await.unwrap());
    assert!(db.registration_time("alice").await.unwrap().is_some());
}

#[tokio::test]
async fn test_list_is_ordered() {
    let db = create_test_db().await;
    for name in ["carol", "alice", "bob"] {
        accounts::create(db.pool(), name, TEST_HASH).await.unwrap();
    }

    let names: Vec<String> = accounts::list(db.pool())
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.username)
        .collect();
    assert_eq!(names, vec!["alice", "bob", "carol"]);
}

#[tokio::test]
async fn test_file_database_persists() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("annil.db").display());

    {
        let db = annil_storage::Database::new(&url).await.unwrap();
        accounts::create(db.pool(), "alice", TEST_HASH).await.unwrap();
        db.pool().close().await;
    }

    let db = annil_storage::Database::new(&url).await.unwrap();
    assert!(accounts::exists(db.pool(), "alice").await.unwrap());
}
