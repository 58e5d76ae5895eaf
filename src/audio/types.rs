//! Audio-related small types and the media handle seam.
//!
//! The playback controller only talks to a `MediaHandle`. The production
//! handle is `AudioPlayer`, which forwards `AudioCmd`s to the audio thread and
//! receives `MediaEvent`s back.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Where the bytes of a track come from once its `audio_url` is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    /// A file on disk (uploads, `file://` urls, plain paths).
    Local(PathBuf),
    /// An `http(s)` url, fetched into memory before decoding.
    Remote(String),
}

/// Identifies one `load` on a media handle. Events are tagged with the token
/// of the source they belong to; the controller's time-update subscription is
/// the token of the source it loaded last.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SourceToken(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// Periodic clock update while playing, and once after every seek.
    /// `duration` is `None` while the length of the source is unknown.
    TimeUpdate {
        token: SourceToken,
        current_time: f64,
        duration: Option<f64>,
    },
    /// The source played through to its natural end.
    Ended { token: SourceToken },
    /// A play request could not be honored.
    PlayRejected { token: SourceToken, reason: String },
}

impl MediaEvent {
    pub fn token(&self) -> SourceToken {
        match self {
            MediaEvent::TimeUpdate { token, .. }
            | MediaEvent::Ended { token }
            | MediaEvent::PlayRejected { token, .. } => *token,
        }
    }
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("no audio output device available")]
    NoOutputDevice,
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },
    #[error("{url} is larger than the {limit} byte stream limit")]
    TooLarge { url: String, limit: u64 },
    #[error("unsupported or corrupt audio: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),
    #[error("object url {0} has been revoked")]
    Revoked(String),
    #[error("no source loaded")]
    NothingLoaded,
}

/// The single playback resource. Only the playback controller drives it.
///
/// `play` is asynchronous: a refusal arrives later as
/// `MediaEvent::PlayRejected`.
pub trait MediaHandle {
    /// Retarget the handle to `source` and return the token of the new load.
    fn load(&mut self, source: MediaSource) -> SourceToken;
    fn play(&mut self);
    fn pause(&mut self);
    /// Move the playback position, in seconds.
    fn seek(&mut self, position: f64);
    fn set_volume(&mut self, volume: f32);
    /// Take every event reported since the last call.
    fn drain_events(&mut self) -> Vec<MediaEvent>;
    /// Release the handle, fading out over `fade_out`.
    fn shutdown(&mut self, _fade_out: Duration) {}
}

#[derive(Debug)]
pub enum AudioCmd {
    /// Replace the current source.
    Load {
        token: SourceToken,
        source: MediaSource,
    },
    /// Start or resume the current source.
    Play,
    Pause,
    /// Seek to an absolute position in seconds.
    Seek(f64),
    SetVolume(f32),
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}
