/// Content library assembly
use crate::config::{BackendSettings, ContentSettings};
use crate::error::{Result, ServerError};
use annil_backend::{FileBackend, Multiplexer, RelayBackend};
use annil_core::Backend;

/// Build the configured backends, in order, behind a multiplexer
pub async fn build_library(settings: &ContentSettings) -> Result<Multiplexer> {
    let mut backends: Vec<Box<dyn Backend>> = Vec::with_capacity(settings.backends.len());

    for backend in &settings.backends {
        match backend {
            BackendSettings::File { path } => {
                let file = FileBackend::new(path.clone()).await.map_err(|e| {
                    ServerError::Config(format!("file backend {}: {e}", path.display()))
                })?;
                tracing::info!(path = %path.display(), "File backend ready");
                backends.push(Box::new(file));
            }
            BackendSettings::Relay { path, auth } => {
                let relay = RelayBackend::new(path, auth.clone())
                    .map_err(|e| ServerError::Config(format!("relay backend {path}: {e}")))?;
                tracing::info!(url = %relay.base_url(), "Relay backend ready");
                backends.push(Box::new(relay));
            }
        }
    }

    Ok(Multiplexer::new(backends).with_timeout(settings.backend_timeout()))
}
