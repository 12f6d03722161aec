/// Audio container types served by backends
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Audio type of a resolved track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioType {
    Flac,
    Mp3,
    Unknown,
}

impl AudioType {
    /// Infer the audio type from a file name's extension.
    ///
    /// A missing or unrecognised extension yields `Unknown`, never an error.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some("flac") => Self::Flac,
            Some("mp3") => Self::Mp3,
            _ => Self::Unknown,
        }
    }

    /// Infer the audio type from a `Content-Type` header value
    pub fn from_content_type(value: &str) -> Self {
        match value.trim() {
            "audio/flac" => Self::Flac,
            "audio/mp3" => Self::Mp3,
            _ => Self::Unknown,
        }
    }

    /// `Content-Type` to advertise for this type, if any
    pub fn content_type(self) -> Option<&'static str> {
        match self {
            Self::Flac => Some("audio/flac"),
            Self::Mp3 => Some("audio/mp3"),
            Self::Unknown => None,
        }
    }
}
