/// Share token scope
use super::resource::{CatalogResource, TrackNumber};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Catalogs and tracks a share token grants access to.
///
/// Serialized as a JSON object mapping each catalog to an array of track
/// numbers. A catalog mapped to an empty array grants the cover only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShareScope(BTreeMap<String, BTreeSet<TrackNumber>>);

impl ShareScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant the cover of `catalog` (and nothing else, unless tracks are added)
    pub fn grant_cover(&mut self, catalog: impl Into<String>) -> &mut Self {
        self.0.entry(catalog.into()).or_default();
        self
    }

    /// Grant one track of `catalog`; this implies its cover
    pub fn grant_track(&mut self, catalog: impl Into<String>, track: TrackNumber) -> &mut Self {
        self.0.entry(catalog.into()).or_default().insert(track);
        self
    }

    pub fn contains_catalog(&self, catalog: &str) -> bool {
        self.0.contains_key(catalog)
    }

    pub fn tracks(&self, catalog: &str) -> Option<&BTreeSet<TrackNumber>> {
        self.0.get(catalog)
    }

    /// Whether `resource` falls inside this scope.
    ///
    /// Covers need catalog membership only; tracks must be listed explicitly.
    pub fn permits(&self, resource: &CatalogResource) -> bool {
        match (self.0.get(&resource.catalog), resource.track) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(tracks), Some(track)) => tracks.contains(&track),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn catalogs(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl FromIterator<(String, Vec<TrackNumber>)> for ShareScope {
    fn from_iter<I: IntoIterator<Item = (String, Vec<TrackNumber>)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(catalog, tracks)| (catalog, tracks.into_iter().collect()))
                .collect(),
        )
    }
}
