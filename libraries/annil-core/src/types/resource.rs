/// Addressable content in the library
use crate::error::{AnnilError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Track numbers are small integers, 0 through 255
pub type TrackNumber = u8;

/// A catalog plus an optional track.
///
/// A resource without a track refers to the catalog's cover.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogResource {
    pub catalog: String,
    pub track: Option<TrackNumber>,
}

impl CatalogResource {
    /// The cover of `catalog`
    pub fn cover(catalog: impl Into<String>) -> Self {
        Self {
            catalog: catalog.into(),
            track: None,
        }
    }

    /// Track `track` of `catalog`
    pub fn track(catalog: impl Into<String>, track: TrackNumber) -> Self {
        Self {
            catalog: catalog.into(),
            track: Some(track),
        }
    }

    pub fn is_cover(&self) -> bool {
        self.track.is_none()
    }

    /// Parse a track segment as it appears in a request path
    pub fn parse_track(raw: &str) -> Result<TrackNumber> {
        raw.parse::<TrackNumber>().map_err(|_| {
            AnnilError::invalid_input(format!("track must be an integer in 0..=255, got {raw:?}"))
        })
    }
}

impl fmt::Display for CatalogResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.track {
            Some(track) => write!(f, "{}/{}", self.catalog, track),
            None => write!(f, "{}/cover", self.catalog),
        }
    }
}
