use std::fmt;

use serde::Deserialize;

/// Identifier of a track within one list.
///
/// Catalog entries and online results carry numeric ids; uploads get a
/// synthesized text id. Ids are only unique within the list they live in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(untagged)]
pub enum TrackId {
    Numeric(u64),
    Text(String),
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackId::Numeric(n) => write!(f, "{n}"),
            TrackId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for TrackId {
    fn from(n: u64) -> Self {
        TrackId::Numeric(n)
    }
}

impl From<String> for TrackId {
    fn from(s: String) -> Self {
        TrackId::Text(s)
    }
}

impl From<&str> for TrackId {
    fn from(s: &str) -> Self {
        TrackId::Text(s.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub duration_label: Option<String>,
    #[serde(default)]
    pub image_url: String,
    pub audio_url: String,
}

impl Track {
    /// "Artist - Title", or just the title when the artist is blank.
    pub fn display(&self) -> String {
        let artist = self.artist.trim();
        if artist.is_empty() {
            self.title.clone()
        } else {
            format!("{} - {}", artist, self.title)
        }
    }
}
