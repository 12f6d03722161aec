/// File backend - serves catalogs from directories on local disk
use annil_core::{AnnilError, AudioType, Backend, ContentStream, Result, TrackNumber};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};

/// Name of the cover image inside a catalog directory
pub const COVER_FILE_NAME: &str = "cover.jpg";

/// Backend rooted at a local directory.
///
/// Layout:
///
/// ```text
/// <root>/<catalog>/cover.jpg
/// <root>/<catalog>/07 - Some Song.flac
/// ```
///
/// A track is found by the two-digit, zero-padded prefix of its file name.
#[derive(Debug, Clone)]
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    /// Create a backend rooted at `root`, which must be an existing directory
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let metadata = fs::metadata(&root).await?;
        if !metadata.is_dir() {
            return Err(AnnilError::invalid_input(format!(
                "{} is not a directory",
                root.display()
            )));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File name prefix identifying `track` ("07" for track 7, "123" for 123)
    pub fn track_prefix(track: TrackNumber) -> String {
        format!("{track:02}")
    }

    /// Resolve a catalog directory, refusing anything that could leave the root
    fn catalog_dir(&self, catalog: &str) -> Result<PathBuf> {
        if catalog.is_empty()
            || catalog == "."
            || catalog == ".."
            || catalog.contains(['/', '\\', '\0'])
        {
            return Err(AnnilError::invalid_input(format!(
                "invalid catalog name {catalog:?}"
            )));
        }
        Ok(self.root.join(catalog))
    }

    /// Pick the file for `track` among `names`.
    ///
    /// Names are visited in sorted order and the last one carrying the
    /// prefix wins, so "07 - b.flac" beats "07 - a.mp3".
    fn select_track<'a>(names: &'a mut [String], track: TrackNumber) -> Option<&'a str> {
        let prefix = Self::track_prefix(track);
        names.sort();
        let names: &'a [String] = names;
        names
            .iter()
            .rev()
            .find(|name| name.starts_with(&prefix))
            .map(String::as_str)
    }
}

fn io_to_annil(err: std::io::Error, entity: &str, id: &str) -> AnnilError {
    if err.kind() == ErrorKind::NotFound {
        AnnilError::not_found(entity, id)
    } else {
        AnnilError::unavailable(format!("{entity} {id}: {err}"))
    }
}

#[async_trait]
impl Backend for FileBackend {
    async fn list_catalogs(&self) -> Vec<String> {
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(root = %self.root.display(), error = %e, "Failed to read library root");
                return Vec::new();
            }
        };

        let mut catalogs = Vec::new();
        loop {
            match entries.next_entry().await {
                Ok(Some(entry)) => {
                    // Follows symlinks, as track and cover lookups do
                    let is_dir = fs::metadata(entry.path())
                        .await
                        .map(|m| m.is_dir())
                        .unwrap_or(false);
                    if !is_dir {
                        continue;
                    }
                    if let Ok(name) = entry.file_name().into_string() {
                        catalogs.push(name);
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(root = %self.root.display(), error = %e, "Library listing cut short");
                    break;
                }
            }
        }
        catalogs
    }

    async fn get_cover(&self, catalog: &str) -> Result<ContentStream> {
        let path = self.catalog_dir(catalog)?.join(COVER_FILE_NAME);
        let file = File::open(&path)
            .await
            .map_err(|e| io_to_annil(e, "Cover", catalog))?;
        Ok(Box::new(file))
    }

    async fn get_audio(
        &self,
        catalog: &str,
        track: TrackNumber,
    ) -> Result<(AudioType, ContentStream)> {
        let dir = self.catalog_dir(catalog)?;
        let mut entries = fs::read_dir(&dir)
            .await
            .map_err(|e| io_to_annil(e, "Catalog", catalog))?;

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| io_to_annil(e, "Catalog", catalog))?
        {
            if entry.file_type().await.map(|t| t.is_dir()).unwrap_or(true) {
                continue;
            }
            if let Ok(name) = entry.file_name().into_string() {
                names.push(name);
            }
        }

        let resource = format!("{catalog}/{track}");
        let name = Self::select_track(&mut names, track)
            .ok_or_else(|| AnnilError::not_found("Track", &resource))?;

        let audio_type = AudioType::from_path(name);
        let file = File::open(dir.join(name))
            .await
            .map_err(|e| io_to_annil(e, "Track", &resource))?;

        tracing::debug!(catalog = %catalog, track, file = %name, ?audio_type, "Resolved track");
        Ok((audio_type, Box::new(file)))
    }
}
