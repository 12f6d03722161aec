/// Multiplexer - fans requests out over an ordered list of backends
use annil_core::{AnnilError, AudioType, Backend, ContentStream, Result, TrackNumber};
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Per-backend deadline used unless `with_timeout` says otherwise
pub const DEFAULT_BACKEND_TIMEOUT: Duration = Duration::from_secs(30);

/// Aggregates several backends behind one `Backend`.
///
/// Listings are the deduplicated union of every backend's listing. Covers and
/// tracks come from the first backend, in configured order, that produces
/// them. Backends are tried one after another, each bounded by the timeout.
///
/// When every backend fails the error is always `NotFound`: a missing
/// resource and an unreachable source look the same to the caller.
pub struct Multiplexer {
    backends: Vec<Box<dyn Backend>>,
    timeout: Duration,
}

impl Multiplexer {
    pub fn new(backends: Vec<Box<dyn Backend>>) -> Self {
        Self {
            backends,
            timeout: DEFAULT_BACKEND_TIMEOUT,
        }
    }

    /// Bound every individual backend call by `timeout`
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    /// Run `call` against each backend in order until one succeeds
    async fn first_success<'a, T, F, Fut>(&'a self, what: &str, call: F) -> Result<T>
    where
        F: Fn(&'a dyn Backend) -> Fut,
        Fut: Future<Output = Result<T>> + 'a,
    {
        for (index, backend) in self.backends.iter().enumerate() {
            match tokio::time::timeout(self.timeout, call(backend.as_ref())).await {
                Ok(Ok(value)) => return Ok(value),
                Ok(Err(e)) => debug!(backend = index, error = %e, "Backend miss for {what}"),
                Err(_) => warn!(backend = index, timeout = ?self.timeout, "Backend timed out for {what}"),
            }
        }
        Err(AnnilError::not_found("Resource", what))
    }
}

#[async_trait]
impl Backend for Multiplexer {
    async fn list_catalogs(&self) -> Vec<String> {
        let mut catalogs = BTreeSet::new();
        for (index, backend) in self.backends.iter().enumerate() {
            match tokio::time::timeout(self.timeout, backend.list_catalogs()).await {
                Ok(listing) => catalogs.extend(listing),
                Err(_) => warn!(backend = index, timeout = ?self.timeout, "Backend timed out listing catalogs"),
            }
        }
        catalogs.into_iter().collect()
    }

    async fn get_cover(&self, catalog: &str) -> Result<ContentStream> {
        let what = format!("{catalog}/cover");
        self.first_success(&what, |backend| backend.get_cover(catalog))
            .await
    }

    async fn get_audio(
        &self,
        catalog: &str,
        track: TrackNumber,
    ) -> Result<(AudioType, ContentStream)> {
        let what = format!("{catalog}/{track}");
        self.first_success(&what, |backend| backend.get_audio(catalog, track))
            .await
    }
}
