/// Login sessions
use annil_core::AccountDirectory;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct Session {
    username: String,
    expires_at: Instant,
}

impl Session {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// In-memory session table keyed by an unguessable id.
///
/// Request handlers and the sweeper share one lock.
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Session>>,
    directory: Arc<dyn AccountDirectory>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(directory: Arc<dyn AccountDirectory>, ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            directory,
            ttl,
        }
    }

    /// Start a session for `username` and return its id
    pub async fn create_session(&self, username: &str) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        let session = Session {
            username: username.to_string(),
            expires_at: Instant::now() + self.ttl,
        };

        self.sessions.lock().await.insert(id.clone(), session);
        tracing::debug!(username, "Session created");
        id
    }

    /// Resolve a session id to its username.
    ///
    /// Returns `None` for unknown or expired sessions and for sessions whose
    /// account has since been deleted. Expired sessions are removed.
    pub async fn authorize(&self, session_id: &str) -> Option<String> {
        let username = {
            let mut sessions = self.sessions.lock().await;
            let session = sessions.get(session_id)?;
            if session.is_expired(Instant::now()) {
                sessions.remove(session_id);
                return None;
            }
            session.username.clone()
        };

        match self.directory.account_exists(&username).await {
            Ok(true) => Some(username),
            Ok(false) => None,
            Err(e) => {
                tracing::warn!(username, "Account lookup failed during session check: {}", e);
                None
            }
        }
    }

    /// Remove every expired session, returning how many were dropped
    pub async fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(now));
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }

    /// Run `sweep` every `interval` until the store is dropped
    pub fn spawn_sweeper(store: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let store: Weak<Self> = Arc::downgrade(store);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
            loop {
                ticker.tick().await;
                let Some(store) = store.upgrade() else {
                    break;
                };
                let removed = store.sweep().await;
                if removed > 0 {
                    tracing::debug!(removed, "Swept expired sessions");
                }
            }
        })
    }
}
