/// Core traits for Annil
use crate::error::Result;
use crate::types::{AudioType, TrackNumber};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::io::AsyncRead;

/// Byte stream handed out by a backend.
///
/// The consumer owns the stream and closes it by dropping it.
pub type ContentStream = Box<dyn AsyncRead + Send + Unpin>;

/// A source of catalogs, covers, and tracks.
///
/// Implemented by the file and relay backends and by the multiplexer that
/// aggregates them.
#[async_trait]
pub trait Backend: Send + Sync {
    /// List catalog identifiers.
    ///
    /// Best-effort: an unreadable source yields an empty list instead of an error.
    async fn list_catalogs(&self) -> Vec<String>;

    /// Open the cover image of `catalog`
    ///
    /// # Errors
    /// Returns `NotFound` if the cover does not exist, `BackendUnavailable`
    /// if the source could not be reached
    async fn get_cover(&self, catalog: &str) -> Result<ContentStream>;

    /// Open track `track` of `catalog`
    ///
    /// # Errors
    /// Returns `NotFound` if the track does not exist, `BackendUnavailable`
    /// if the source could not be reached
    async fn get_audio(&self, catalog: &str, track: TrackNumber)
        -> Result<(AudioType, ContentStream)>;
}

/// Read-only account queries needed to validate credentials.
///
/// Token verification and session checks consult this instead of owning
/// account state.
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    /// Whether an account named `username` exists
    async fn account_exists(&self, username: &str) -> Result<bool>;

    /// When `username` registered, or `None` if there is no such account
    async fn registration_time(&self, username: &str) -> Result<Option<DateTime<Utc>>>;

    /// Whether `username` may currently create share tokens
    async fn share_capability(&self, username: &str) -> Result<bool>;
}
