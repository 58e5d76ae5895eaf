//! Online song lookup against the iTunes Search API.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::config::SearchSettings;
use crate::library::{Track, TrackId};

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Request(String),
    #[error("failed to read search response: {0}")]
    Read(#[from] std::io::Error),
    #[error("malformed search response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// The remote half of a search.
pub trait RemoteLookup: Send + Sync {
    fn lookup(&self, term: &str, limit: usize) -> Result<Vec<Track>, SearchError>;
}

#[derive(Debug, Deserialize)]
struct ItunesResponse {
    results: Vec<ItunesResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItunesResult {
    track_id: Option<u64>,
    track_name: Option<String>,
    artist_name: Option<String>,
    primary_genre_name: Option<String>,
    #[serde(rename = "artworkUrl100")]
    artwork_url: Option<String>,
    preview_url: Option<String>,
}

impl ItunesResult {
    /// Results without an id or a preview clip cannot be played and are dropped.
    fn into_track(self) -> Option<Track> {
        Some(Track {
            id: TrackId::Numeric(self.track_id?),
            title: self.track_name.unwrap_or_default(),
            artist: self.artist_name.unwrap_or_default(),
            genre: self.primary_genre_name.unwrap_or_default(),
            duration_label: None,
            image_url: self.artwork_url.unwrap_or_default(),
            audio_url: self.preview_url?,
        })
    }
}

/// Parse a search response body into tracks, keeping the service's order.
pub fn parse_results(body: &str) -> Result<Vec<Track>, SearchError> {
    let response: ItunesResponse = serde_json::from_str(body)?;
    Ok(response
        .results
        .into_iter()
        .filter_map(ItunesResult::into_track)
        .collect())
}

pub struct ItunesLookup {
    agent: ureq::Agent,
    endpoint: String,
    country: Option<String>,
}

impl ItunesLookup {
    pub fn new(settings: &SearchSettings) -> Self {
        let mut builder = ureq::AgentBuilder::new();
        if let Some(secs) = settings.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Self {
            agent: builder.build(),
            endpoint: settings.endpoint.trim().to_string(),
            country: settings.country.clone(),
        }
    }

    /// Build the song-search url for `term`.
    pub fn lookup_url(&self, term: &str, limit: usize) -> String {
        let mut url = format!(
            "{}?term={}&entity=song&limit={}",
            self.endpoint,
            urlencoding::encode(term),
            limit
        );
        if let Some(country) = self.country.as_deref().filter(|c| !c.trim().is_empty()) {
            url.push_str("&country=");
            url.push_str(&urlencoding::encode(country.trim()));
        }
        url
    }
}

impl RemoteLookup for ItunesLookup {
    fn lookup(&self, term: &str, limit: usize) -> Result<Vec<Track>, SearchError> {
        let url = self.lookup_url(term, limit);
        debug!(%url, "online lookup");
        let body = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| SearchError::Request(e.to_string()))?
            .into_string()?;
        parse_results(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
        "resultCount": 3,
        "results": [
            {
                "wrapperType": "track",
                "trackId": 1440857781,
                "trackName": "Sunrise",
                "artistName": "Norah Jones",
                "primaryGenreName": "Jazz",
                "artworkUrl100": "https://is1.example/100x100bb.jpg",
                "previewUrl": "https://audio.example/preview.m4a"
            },
            {
                "trackId": 2,
                "trackName": "No Preview",
                "artistName": "Nobody"
            },
            {
                "trackId": 3,
                "trackName": "Sparse",
                "previewUrl": "https://audio.example/3.m4a"
            }
        ]
    }"#;

    #[test]
    fn parse_maps_fields_and_skips_unplayable_results() {
        let tracks = parse_results(BODY).unwrap();
        assert_eq!(tracks.len(), 2);

        let t = &tracks[0];
        assert_eq!(t.id, TrackId::Numeric(1440857781));
        assert_eq!(t.title, "Sunrise");
        assert_eq!(t.artist, "Norah Jones");
        assert_eq!(t.genre, "Jazz");
        assert_eq!(t.image_url, "https://is1.example/100x100bb.jpg");
        assert_eq!(t.audio_url, "https://audio.example/preview.m4a");

        assert_eq!(tracks[1].id, TrackId::Numeric(3));
        assert_eq!(tracks[1].artist, "");
    }

    #[test]
    fn parse_rejects_malformed_bodies() {
        assert!(matches!(
            parse_results("<html>oops</html>"),
            Err(SearchError::Malformed(_))
        ));
        assert!(matches!(
            parse_results(r#"{"resultCount": 0}"#),
            Err(SearchError::Malformed(_))
        ));
    }

    #[test]
    fn lookup_url_encodes_term_and_limit() {
        let lookup = ItunesLookup::new(&SearchSettings::default());
        assert_eq!(
            lookup.lookup_url("a r rahman & co", 10),
            "https://itunes.apple.com/search?term=a%20r%20rahman%20%26%20co&entity=song&limit=10"
        );
    }

    #[test]
    fn lookup_url_appends_country_when_configured() {
        let settings = SearchSettings {
            country: Some("IN".into()),
            ..SearchSettings::default()
        };
        let lookup = ItunesLookup::new(&settings);
        assert!(lookup.lookup_url("x", 5).ends_with("&limit=5&country=IN"));
    }
}
