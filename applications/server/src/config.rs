/// Server configuration
use crate::error::{Result, ServerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Upper bound for session durations: one year
pub const MAX_SESSION_MINUTES: u64 = 365 * 24 * 60;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_auth")]
    pub auth: AuthSettings,

    #[serde(default = "default_sessions")]
    pub sessions: SessionSettings,

    #[serde(default = "default_content")]
    pub content: ContentSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthSettings {
    #[serde(default)]
    pub jwt_secret: String,

    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionSettings {
    #[serde(default = "default_ttl_minutes")]
    pub ttl_minutes: u64,

    #[serde(default = "default_sweep_interval_minutes")]
    pub sweep_interval_minutes: u64,
}

impl SessionSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_minutes.saturating_mul(60))
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_minutes.saturating_mul(60))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContentSettings {
    #[serde(default = "default_backend_timeout_secs")]
    pub backend_timeout_secs: u64,

    /// Content sources, consulted in this order
    #[serde(default)]
    pub backends: Vec<BackendSettings>,
}

impl ContentSettings {
    pub fn backend_timeout(&self) -> Duration {
        Duration::from_secs(self.backend_timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BackendSettings {
    /// Catalog directories under a local root
    File { path: PathBuf },
    /// Another server speaking the same content routes
    Relay {
        path: String,
        #[serde(default)]
        auth: String,
    },
}

impl ServerConfig {
    /// Load configuration from file and environment
    ///
    /// `path` defaults to `config.toml` in the working directory; a missing
    /// file is not an error. Environment variables prefixed `ANNIL_` override
    /// file values, with `__` separating nested keys (`ANNIL_AUTH__JWT_SECRET`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        let config_path = path.map_or_else(|| PathBuf::from("config.toml"), Path::to_path_buf);
        if config_path.exists() {
            settings = settings.add_source(config::File::from(config_path));
        } else if path.is_some() {
            return Err(ServerError::Config(format!(
                "Config file not found: {}",
                config_path.display()
            )));
        }

        settings = settings.add_source(
            config::Environment::with_prefix("ANNIL")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.is_empty() {
            return Err(ServerError::Config(
                "JWT secret is required (set ANNIL_AUTH__JWT_SECRET)".to_string(),
            ));
        }

        if self.content.backends.is_empty() {
            return Err(ServerError::Config(
                "At least one content backend must be configured".to_string(),
            ));
        }

        if !(4..=31).contains(&self.auth.bcrypt_cost) {
            return Err(ServerError::Config(format!(
                "bcrypt cost must be between 4 and 31, got {}",
                self.auth.bcrypt_cost
            )));
        }

        for (name, minutes) in [
            ("ttl", self.sessions.ttl_minutes),
            ("sweep interval", self.sessions.sweep_interval_minutes),
        ] {
            if !(1..=MAX_SESSION_MINUTES).contains(&minutes) {
                return Err(ServerError::Config(format!(
                    "Session {name} must be between 1 and {MAX_SESSION_MINUTES} minutes, got {minutes}"
                )));
            }
        }

        Ok(())
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
    }
}

fn default_database_url() -> String {
    "sqlite://./data/annil.db".to_string()
}

fn default_auth() -> AuthSettings {
    AuthSettings {
        jwt_secret: String::new(),
        bcrypt_cost: default_bcrypt_cost(),
    }
}

fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

fn default_sessions() -> SessionSettings {
    SessionSettings {
        ttl_minutes: default_ttl_minutes(),
        sweep_interval_minutes: default_sweep_interval_minutes(),
    }
}

fn default_ttl_minutes() -> u64 {
    60
}

fn default_sweep_interval_minutes() -> u64 {
    60
}

fn default_content() -> ContentSettings {
    ContentSettings {
        backend_timeout_secs: default_backend_timeout_secs(),
        backends: Vec::new(),
    }
}

fn default_backend_timeout_secs() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            storage: default_storage(),
            auth: default_auth(),
            sessions: default_sessions(),
            content: default_content(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.sessions.ttl(), Duration::from_secs(3600));
        assert_eq!(config.content.backend_timeout(), Duration::from_secs(30));
        assert!(config.content.backends.is_empty());
    }

    #[test]
    fn test_validate_requires_secret_and_backend() {
        let mut config = ServerConfig::default();
        assert!(matches!(config.validate(), Err(ServerError::Config(_))));

        config.auth.jwt_secret = "secret".to_string();
        assert!(matches!(config.validate(), Err(ServerError::Config(_))));

        config.content.backends.push(BackendSettings::File {
            path: PathBuf::from("/srv/music"),
        });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_bounds_session_durations() {
        let mut config = ServerConfig::default();
        config.auth.jwt_secret = "secret".to_string();
        config.content.backends.push(BackendSettings::File {
            path: PathBuf::from("/srv/music"),
        });

        for minutes in [0, MAX_SESSION_MINUTES + 1, u64::MAX] {
            config.sessions.ttl_minutes = minutes;
            assert!(
                matches!(config.validate(), Err(ServerError::Config(_))),
                "ttl {minutes} should be rejected"
            );
        }
        config.sessions.ttl_minutes = MAX_SESSION_MINUTES;
        assert!(config.validate().is_ok());

        config.sessions.sweep_interval_minutes = u64::MAX;
        assert!(matches!(config.validate(), Err(ServerError::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[auth]
jwt_secret = "s3cret"

[content]
backend_timeout_secs = 5

[[content.backends]]
type = "file"
path = "/srv/music"

[[content.backends]]
type = "relay"
path = "https://peer.example.com"
auth = "peer-token"
"#
        )
        .unwrap();

        let config = ServerConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.auth.jwt_secret, "s3cret");
        assert_eq!(config.content.backend_timeout_secs, 5);
        assert_eq!(
            config.content.backends,
            vec![
                BackendSettings::File {
                    path: PathBuf::from("/srv/music")
                },
                BackendSettings::Relay {
                    path: "https://peer.example.com".to_string(),
                    auth: "peer-token".to_string(),
                },
            ]
        );
        assert_eq!(config.sessions.ttl_minutes, 60);
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let result = ServerConfig::load(Some(Path::new("/nonexistent/annil.toml")));
        assert!(matches!(result, Err(ServerError::Config(_))));
    }
}
