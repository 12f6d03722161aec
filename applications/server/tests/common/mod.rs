//! Common test utilities and fixtures
#![allow(dead_code)]

use annil_backend::{FileBackend, Multiplexer};
use annil_core::{AccountDirectory, Backend};
use annil_server::{api, config::BackendSettings, AppState, ServerConfig};
use annil_storage::{accounts, Database};
use async_trait::async_trait;
use axum::Router;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub const TEST_SECRET: &str = "test-secret";

/// Account directory double with settable registration times
#[derive(Default)]
pub struct MemoryDirectory {
    accounts: Mutex<HashMap<String, (DateTime<Utc>, bool)>>,
}

impl MemoryDirectory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn register_at(&self, username: &str, registered_at: DateTime<Utc>, allow_share: bool) {
        self.accounts
            .lock()
            .unwrap()
            .insert(username.to_string(), (registered_at, allow_share));
    }

    /// Register with a timestamp safely before anything issued in the test
    pub fn register(&self, username: &str, allow_share: bool) {
        self.register_at(username, Utc::now() - chrono::Duration::hours(1), allow_share);
    }

    pub fn remove(&self, username: &str) {
        self.accounts.lock().unwrap().remove(username);
    }
}

#[async_trait]
impl AccountDirectory for MemoryDirectory {
    async fn account_exists(&self, username: &str) -> annil_core::Result<bool> {
        Ok(self.accounts.lock().unwrap().contains_key(username))
    }

    async fn registration_time(&self, username: &str) -> annil_core::Result<Option<DateTime<Utc>>> {
        Ok(self.accounts.lock().unwrap().get(username).map(|(at, _)| *at))
    }

    async fn share_capability(&self, username: &str) -> annil_core::Result<bool> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .get(username)
            .is_some_and(|(_, allow)| *allow))
    }
}

/// A server over an in-memory database and a temporary file library
pub struct TestApp {
    pub state: AppState,
    pub router: Router,
    pub library_root: TempDir,
}

pub fn test_config(library_root: &std::path::Path) -> ServerConfig {
    let mut config = ServerConfig::default();
    config.auth.jwt_secret = TEST_SECRET.to_string();
    config.auth.bcrypt_cost = 4;
    config.content.backends = vec![BackendSettings::File {
        path: library_root.to_path_buf(),
    }];
    config
}

/// Create a catalog directory with a cover and the given track files
pub fn write_catalog(root: &std::path::Path, catalog: &str, files: &[(&str, &[u8])]) {
    let dir = root.join(catalog);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("cover.jpg"), format!("cover of {catalog}")).unwrap();
    for (name, bytes) in files {
        std::fs::write(dir.join(name), bytes).unwrap();
    }
}

pub async fn create_test_app() -> TestApp {
    let library_root = tempfile::tempdir().unwrap();
    write_catalog(
        library_root.path(),
        "album-a",
        &[
            ("01 - Opening.flac", b"flac-one"),
            ("02 - Second.mp3", b"mp3-two"),
        ],
    );
    write_catalog(library_root.path(), "album-b", &[("01 - Other.flac", b"flac-b")]);

    let config = test_config(library_root.path());
    let db = Arc::new(Database::in_memory().await.unwrap());
    let file = FileBackend::new(library_root.path()).await.unwrap();
    let library: Arc<dyn Backend> = Arc::new(Multiplexer::new(vec![Box::new(file)]));

    let state = AppState::new(db, library, &config);
    let router = api::create_router(state.clone());

    TestApp {
        state,
        router,
        library_root,
    }
}

impl TestApp {
    /// Create an account registered an hour ago
    pub async fn add_account(&self, username: &str, password: &str, admin: bool, allow_share: bool) {
        let hash = self.state.passwords.hash(password).unwrap();
        let registered_at = Utc::now() - chrono::Duration::hours(1);
        accounts::create_registered_at(self.state.db.pool(), username, &hash, registered_at)
            .await
            .unwrap();
        if admin {
            accounts::set_admin(self.state.db.pool(), username, true)
                .await
                .unwrap();
        }
        if allow_share {
            accounts::set_allow_share(self.state.db.pool(), username, true)
                .await
                .unwrap();
        }
    }
}
