use std::path::PathBuf;

use serde::Deserialize;

use crate::library::Track;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/encore/config.toml` or `~/.config/encore/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `ENCORE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub audio: AudioSettings,
    pub ui: UiSettings,
    pub controls: ControlsSettings,
    pub search: SearchSettings,
    pub library: LibrarySettings,
    pub logging: LoggingSettings,
    pub catalog: CatalogSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Volume applied at startup, in `[0, 1]`.
    pub initial_volume: f32,
    /// Volume change per up/down key press.
    pub volume_step: f32,
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
    /// How often the audio thread reports playback position (milliseconds).
    pub tick_ms: u64,
    /// Upper bound on the size of a remote audio file held in memory.
    pub max_stream_bytes: u64,
    /// Timeout for fetching remote audio (seconds). 0 disables it.
    pub stream_timeout_secs: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            initial_volume: 0.7,
            volume_step: 0.1,
            quit_fade_out_ms: 500,
            tick_ms: 250,
            max_stream_bytes: 64 * 1024 * 1024,
            stream_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// How many recent searches the sidebar lists, oldest first with the newest last.
    pub recent_searches_shown: usize,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ encore ~ ".to_string(),
            recent_searches_shown: 8,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to scrub when pressing `H` / `L`.
    pub scrub_seconds: u64,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self { scrub_seconds: 5 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Search endpoint speaking the iTunes Search API.
    pub endpoint: String,
    /// Maximum number of online results per query.
    pub limit: usize,
    /// Optional storefront country code (e.g. "US").
    pub country: Option<String>,
    /// Optional request timeout (seconds). No timeout when unset.
    pub timeout_secs: Option<u64>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://itunes.apple.com/search".to_string(),
            limit: 10,
            country: None,
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks when expanding an uploaded directory.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
    /// Image shown for uploaded tracks.
    pub placeholder_image: String,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec![
                "mp3".into(),
                "flac".into(),
                "wav".into(),
                "ogg".into(),
                "m4a".into(),
                "aac".into(),
            ],
            follow_links: true,
            include_hidden: false,
            recursive: true,
            max_depth: None,
            placeholder_image: "https://via.placeholder.com/100".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Write a log file at all.
    pub enabled: bool,
    /// Log directory. Defaults to `$XDG_STATE_HOME/encore` or `~/.local/state/encore`.
    pub directory: Option<PathBuf>,
    /// `tracing` filter directives, overridden by `RUST_LOG`.
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            directory: None,
            filter: "encore=info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Heading of the home view.
    pub title: String,
    /// Replaces the built-in catalog when non-empty.
    pub tracks: Vec<Track>,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            title: "Famous Tamil Love BGMs".to_string(),
            tracks: Vec::new(),
        }
    }
}
