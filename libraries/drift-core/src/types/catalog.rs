/// Track catalog types
use super::ids::TrackId;
use serde::{Deserialize, Serialize};

/// Wire format of the catalog service: `{ "tracks": ["a.mp3", ...] }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackListing {
    /// File names available for playback
    pub tracks: Vec<String>,
}

impl TrackListing {
    /// Build a catalog keeping only names with the given audio extension
    pub fn into_catalog(self, extension: &str) -> Catalog {
        Catalog::from_ids(
            self.tracks
                .into_iter()
                .map(TrackId::from)
                .filter(|id| id.has_extension(extension)),
        )
    }
}

/// Immutable set of playable tracks
///
/// Populated once per session start. Ordering carries no meaning; tracks
/// are kept sorted and deduplicated so that index-based picks are
/// reproducible for a given seed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    tracks: Vec<TrackId>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a catalog from track IDs (duplicates are dropped)
    pub fn from_ids(ids: impl IntoIterator<Item = TrackId>) -> Self {
        let mut tracks: Vec<TrackId> = ids.into_iter().collect();
        tracks.sort();
        tracks.dedup();
        Self { tracks }
    }

    /// Create a catalog from plain names
    pub fn from_names<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self::from_ids(names.into_iter().map(|name| TrackId::new(name)))
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the catalog has no tracks
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Check membership
    pub fn contains(&self, id: &TrackId) -> bool {
        self.tracks.binary_search(id).is_ok()
    }

    /// Track at `index` in catalog order
    pub fn get(&self, index: usize) -> Option<&TrackId> {
        self.tracks.get(index)
    }

    /// All tracks as a slice
    pub fn as_slice(&self) -> &[TrackId] {
        &self.tracks
    }

    /// Iterate over tracks
    pub fn iter(&self) -> impl Iterator<Item = &TrackId> {
        self.tracks.iter()
    }

    /// Convert back to the wire format
    pub fn to_listing(&self) -> TrackListing {
        TrackListing {
            tracks: self.tracks.iter().map(|t| t.as_str().to_string()).collect(),
        }
    }
}
