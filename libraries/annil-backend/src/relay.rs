//! Relay backend - proxies another Annil peer over HTTP.

use annil_core::{AnnilError, AudioType, Backend, ContentStream, Result, TrackNumber};
use async_trait::async_trait;
use futures_util::TryStreamExt;
use reqwest::{header, Client, Response, StatusCode, Url};
use std::time::Duration;
use tokio_util::io::StreamReader;
use tracing::{debug, warn};

/// Backend that forwards requests to a remote peer.
///
/// Wire contract:
/// - `GET {base}/albums` returns a JSON array of catalog identifiers (no credential)
/// - `GET {base}/{catalog}/cover` returns the cover bytes
/// - `GET {base}/{catalog}/{track}` returns the track bytes, typed by `Content-Type`
///
/// Cover and track requests carry the configured credential in `Authorization`.
/// Any non-200 answer is treated as not found.
#[derive(Debug, Clone)]
pub struct RelayBackend {
    http: Client,
    base: Url,
    credential: String,
}

impl RelayBackend {
    /// Create a relay for the peer at `base_url`, authenticating with `credential`
    pub fn new(base_url: &str, credential: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("annil/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AnnilError::unavailable(format!("failed to build HTTP client: {e}")))?;

        Self::with_client(http, base_url, credential)
    }

    /// Create a relay that shares an existing HTTP client
    pub fn with_client(http: Client, base_url: &str, credential: impl Into<String>) -> Result<Self> {
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(AnnilError::invalid_input(format!(
                "relay URL must start with http:// or https://, got {base_url:?}"
            )));
        }

        // Url::join treats a base without a trailing slash as a file name.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base = Url::parse(&normalized)
            .map_err(|e| AnnilError::invalid_input(format!("invalid relay URL {base_url:?}: {e}")))?;

        Ok(Self {
            http,
            base,
            credential: credential.into(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| AnnilError::invalid_input(format!("relay URL {} cannot be a base", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn fetch(&self, url: Url, what: &str) -> Result<Response> {
        debug!(url = %url, "Relaying request");

        let response = self
            .http
            .get(url)
            .header(header::AUTHORIZATION, &self.credential)
            .send()
            .await
            .map_err(|e| AnnilError::unavailable(format!("relay {}: {e}", self.base)))?;

        if response.status() != StatusCode::OK {
            debug!(status = %response.status(), "Relay answered without content");
            return Err(AnnilError::not_found(what.to_string(), response.url().path()));
        }
        Ok(response)
    }
}

fn into_stream(response: Response) -> ContentStream {
    let body = response
        .bytes_stream()
        .map_err(std::io::Error::other);
    Box::new(StreamReader::new(Box::pin(body)))
}

#[async_trait]
impl Backend for RelayBackend {
    async fn list_catalogs(&self) -> Vec<String> {
        let url = match self.endpoint(&["albums"]) {
            Ok(url) => url,
            Err(e) => {
                warn!(error = %e, "Cannot build relay listing URL");
                return Vec::new();
            }
        };

        let response = match self.http.get(url).send().await {
            Ok(response) if response.status() == StatusCode::OK => response,
            Ok(response) => {
                warn!(relay = %self.base, status = %response.status(), "Relay refused catalog listing");
                return Vec::new();
            }
            Err(e) => {
                warn!(relay = %self.base, error = %e, "Relay unreachable for catalog listing");
                return Vec::new();
            }
        };

        match response.json::<Vec<String>>().await {
            Ok(catalogs) => catalogs,
            Err(e) => {
                warn!(relay = %self.base, error = %e, "Relay sent an unreadable catalog listing");
                Vec::new()
            }
        }
    }

    async fn get_cover(&self, catalog: &str) -> Result<ContentStream> {
        let url = self.endpoint(&[catalog, "cover"])?;
        let response = self.fetch(url, "Cover").await?;
        Ok(into_stream(response))
    }

    async fn get_audio(
        &self,
        catalog: &str,
        track: TrackNumber,
    ) -> Result<(AudioType, ContentStream)> {
        let track_segment = track.to_string();
        let url = self.endpoint(&[catalog, &track_segment])?;
        let response = self.fetch(url, "Track").await?;

        let audio_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map_or(AudioType::Unknown, AudioType::from_content_type);

        Ok((audio_type, into_stream(response)))
    }
}
