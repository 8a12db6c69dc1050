/// ID types for Drift entities
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};
use std::fmt;

// Characters that cannot appear raw in a single URL path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Track identifier
///
/// Opaque name of a playable file, unique within a catalog and stable for
/// the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    /// Create a new track ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Media URL for this track under `prefix` (e.g. `/music/a.mp3`)
    ///
    /// The name is percent-encoded as one path segment.
    pub fn media_url(&self, prefix: &str) -> String {
        format!(
            "{}/{}",
            prefix.trim_end_matches('/'),
            utf8_percent_encode(&self.0, PATH_SEGMENT)
        )
    }

    /// Whether the name ends in `.{extension}` (case-insensitive)
    pub fn has_extension(&self, extension: &str) -> bool {
        let extension = extension.trim_start_matches('.');
        self.0
            .rsplit_once('.')
            .is_some_and(|(stem, ext)| !stem.is_empty() && ext.eq_ignore_ascii_case(extension))
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TrackId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for TrackId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_url_joins_prefix() {
        let id = TrackId::new("song.mp3");
        assert_eq!(id.media_url("/music"), "/music/song.mp3");
        assert_eq!(id.media_url("/music/"), "/music/song.mp3");
    }

    #[test]
    fn media_url_escapes_reserved_characters() {
        let id = TrackId::new("track #1?.mp3");
        assert_eq!(id.media_url("/music"), "/music/track%20%231%3F.mp3");

        assert_eq!(TrackId::new("a/b%.mp3").media_url("/music"), "/music/a%2Fb%25.mp3");
        assert_eq!(TrackId::new("café.mp3").media_url("/music"), "/music/caf%C3%A9.mp3");
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        assert!(TrackId::new("a.MP3").has_extension("mp3"));
        assert!(TrackId::new("a.mp3").has_extension(".mp3"));
        assert!(!TrackId::new("a.ogg").has_extension("mp3"));
        assert!(!TrackId::new("mp3").has_extension("mp3"));
        assert!(!TrackId::new(".mp3").has_extension("mp3"));
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = TrackId::new("a.mp3");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"a.mp3\"");
    }
}
