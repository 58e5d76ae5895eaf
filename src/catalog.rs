//! The fixed catalog shown on the home view.

use crate::config::CatalogSettings;
use crate::library::{Track, TrackId};

/// Tracks built into the player.
pub fn builtin() -> Vec<Track> {
    vec![Track {
        id: TrackId::Numeric(1),
        title: "Thuli Thuli BGM".to_string(),
        artist: "Yuvan Shankar Raja".to_string(),
        genre: "Love BGM".to_string(),
        duration_label: Some("2:45".to_string()),
        image_url: "https://m.media-amazon.com/images/M/MV5BZmM3NDRlNjgtN2VlNy00OGQyLWI1NGItMjk2ZjM1YmQ2ZTdmXkEyXkFqcGc@._V1_.jpg".to_string(),
        audio_url: "https://pagalworld.com.se/files/download/id/1464".to_string(),
    }]
}

/// The catalog for this session: the configured tracks, or the built-in ones
/// when none are configured.
pub fn load(settings: &CatalogSettings) -> Vec<Track> {
    if settings.tracks.is_empty() {
        builtin()
    } else {
        settings.tracks.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_settings_fall_back_to_builtin() {
        let catalog = load(&CatalogSettings::default());
        assert_eq!(catalog, builtin());
        assert!(!catalog.is_empty());
    }

    #[test]
    fn configured_tracks_replace_builtin() {
        let track = Track {
            id: TrackId::Numeric(99),
            title: "Mine".into(),
            artist: "Me".into(),
            genre: String::new(),
            duration_label: None,
            image_url: String::new(),
            audio_url: "/music/mine.mp3".into(),
        };
        let settings = CatalogSettings {
            tracks: vec![track.clone()],
            ..CatalogSettings::default()
        };
        assert_eq!(load(&settings), vec![track]);
    }
}
