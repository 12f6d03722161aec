/// Shared application state
use crate::config::ServerConfig;
use crate::services::{PasswordHasher, PermissionEvaluator, SessionStore, TokenService};
use annil_core::{AccountDirectory, Backend};
use annil_storage::Database;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub tokens: Arc<TokenService>,
    pub permissions: PermissionEvaluator,
    pub sessions: Arc<SessionStore>,
    pub passwords: PasswordHasher,
    pub library: Arc<dyn Backend>,
}

impl AppState {
    pub fn new(db: Arc<Database>, library: Arc<dyn Backend>, config: &ServerConfig) -> Self {
        let directory: Arc<dyn AccountDirectory> = db.clone();
        let tokens = Arc::new(TokenService::new(
            &config.auth.jwt_secret,
            Arc::clone(&directory),
        ));

        Self {
            permissions: PermissionEvaluator::new(Arc::clone(&tokens)),
            sessions: Arc::new(SessionStore::new(directory, config.sessions.ttl())),
            passwords: PasswordHasher::new(config.auth.bcrypt_cost),
            tokens,
            db,
            library,
        }
    }
}
