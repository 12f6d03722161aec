/// Session lifecycle: creation, expiry, sweeping, account deletion
mod common;

use annil_server::SessionStore;
use common::MemoryDirectory;
use std::sync::Arc;
use std::time::Duration;

const TTL: Duration = Duration::from_secs(3600);

fn store(directory: &Arc<MemoryDirectory>) -> Arc<SessionStore> {
    Arc::new(SessionStore::new(directory.clone(), TTL))
}

#[tokio::test(start_paused = true)]
async fn test_session_authorizes_until_expiry() {
    let directory = MemoryDirectory::new();
    directory.register("alice", false);
    let sessions = store(&directory);

    let id = sessions.create_session("alice").await;
    assert_eq!(sessions.authorize(&id).await.as_deref(), Some("alice"));

    tokio::time::advance(TTL - Duration::from_secs(1)).await;
    assert_eq!(sessions.authorize(&id).await.as_deref(), Some("alice"));

    tokio::time::advance(Duration::from_secs(1)).await;
    assert_eq!(sessions.authorize(&id).await, None);

    // Expired sessions are dropped on access
    assert!(sessions.is_empty().await);
}

#[tokio::test]
async fn test_unknown_session_is_rejected() {
    let directory = MemoryDirectory::new();
    let sessions = store(&directory);

    assert_eq!(sessions.authorize("no-such-session").await, None);
}

#[tokio::test]
async fn test_session_ids_are_unique() {
    let directory = MemoryDirectory::new();
    directory.register("alice", false);
    let sessions = store(&directory);

    let first = sessions.create_session("alice").await;
    let second = sessions.create_session("alice").await;

    assert_ne!(first, second);
    assert_eq!(sessions.len().await, 2);
}

#[tokio::test]
async fn test_deleted_account_invalidates_live_session() {
    let directory = MemoryDirectory::new();
    directory.register("alice", false);
    let sessions = store(&directory);

    let id = sessions.create_session("alice").await;
    directory.remove("alice");

    assert_eq!(sessions.authorize(&id).await, None);
}

#[tokio::test(start_paused = true)]
async fn test_sweep_removes_only_expired_sessions() {
    let directory = MemoryDirectory::new();
    directory.register("alice", false);
    directory.register("bob", false);
    let sessions = store(&directory);

    sessions.create_session("alice").await;
    tokio::time::advance(Duration::from_secs(1800)).await;
    let bob = sessions.create_session("bob").await;
    tokio::time::advance(Duration::from_secs(1800)).await;

    assert_eq!(sessions.sweep().await, 1);
    assert_eq!(sessions.len().await, 1);
    assert_eq!(sessions.authorize(&bob).await.as_deref(), Some("bob"));
}

#[tokio::test(start_paused = true)]
async fn test_background_sweeper_runs_on_interval() {
    let directory = MemoryDirectory::new();
    directory.register("alice", false);
    let sessions = store(&directory);

    let sweeper = SessionStore::spawn_sweeper(&sessions, Duration::from_secs(600));
    sessions.create_session("alice").await;

    // Sweeps before expiry keep it
    tokio::time::advance(TTL - Duration::from_secs(1)).await;
    assert_eq!(sessions.len().await, 1);

    // A tick after expiry removes it without any request touching it
    tokio::time::sleep(Duration::from_secs(1200)).await;
    assert!(sessions.is_empty().await);

    sweeper.abort();
}

#[tokio::test(start_paused = true)]
async fn test_sweeper_stops_when_store_is_dropped() {
    let directory = MemoryDirectory::new();
    let sessions = store(&directory);

    let sweeper = SessionStore::spawn_sweeper(&sessions, Duration::from_secs(60));
    drop(sessions);

    tokio::time::sleep(Duration::from_secs(61)).await;
    tokio::time::timeout(Duration::from_secs(1), sweeper)
        .await
        .expect("sweeper should exit")
        .unwrap();
}
