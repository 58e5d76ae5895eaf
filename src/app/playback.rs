//! Playback controller: what is playing, from which list, and how far along.
//!
//! The controller is the only code that drives the `MediaHandle`. Feedback
//! from the handle arrives as `MediaEvent`s; only events carrying the token of
//! the most recent load (the current subscription) are applied.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::audio::{MediaEvent, MediaHandle, MediaSource, SourceToken};

/// The four lists a track can be played from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ListTag {
    Catalog,
    Library,
    Search,
    Playlist,
}

/// The currently selected track, by list and position.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PlaybackPointer {
    pub list: ListTag,
    pub index: usize,
}

impl PlaybackPointer {
    pub fn new(list: ListTag, index: usize) -> Self {
        Self { list, index }
    }

    /// The following position in a list of `len` tracks, wrapping to the start.
    pub fn next(self, len: usize) -> Self {
        debug_assert!(len > 0);
        Self {
            index: (self.index + 1) % len,
            ..self
        }
    }

    /// The preceding position in a list of `len` tracks, wrapping to the end.
    pub fn previous(self, len: usize) -> Self {
        debug_assert!(len > 0);
        Self {
            index: (self.index + len - 1) % len,
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackStatus {
    pub is_playing: bool,
    pub volume: f32,
    pub current_time: f64,
    pub duration: f64,
    /// Position as a percentage of `duration`, in `[0, 100]`.
    pub progress: f64,
}

impl PlaybackStatus {
    fn new(volume: f32) -> Self {
        Self {
            is_playing: false,
            volume,
            current_time: 0.0,
            duration: 0.0,
            progress: 0.0,
        }
    }

    fn reset_clock(&mut self) {
        self.current_time = 0.0;
        self.duration = 0.0;
        self.progress = 0.0;
    }

    fn apply_time_update(&mut self, current_time: f64, duration: Option<f64>) {
        let duration = duration.filter(|d| d.is_finite() && *d > 0.0).unwrap_or(0.0);
        self.current_time = current_time;
        self.duration = duration;
        self.progress = if duration > 0.0 {
            (current_time / duration * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };
    }
}

pub struct PlaybackController {
    media: Box<dyn MediaHandle>,
    pointer: Option<PlaybackPointer>,
    status: PlaybackStatus,
    subscription: Option<SourceToken>,
}

impl PlaybackController {
    pub fn new(mut media: Box<dyn MediaHandle>, volume: f32) -> Self {
        media.set_volume(volume);
        Self {
            media,
            pointer: None,
            status: PlaybackStatus::new(volume),
            subscription: None,
        }
    }

    pub fn pointer(&self) -> Option<PlaybackPointer> {
        self.pointer
    }

    pub fn status(&self) -> &PlaybackStatus {
        &self.status
    }

    pub fn has_track(&self) -> bool {
        self.pointer.is_some()
    }

    /// Point at `pointer`, load `source` and start playing it.
    pub fn select(&mut self, pointer: PlaybackPointer, source: MediaSource) {
        debug!(?pointer, ?source, "select track");
        self.unsubscribe();
        let token = self.media.load(source);
        self.subscription = Some(token);
        self.pointer = Some(pointer);
        self.status.reset_clock();
        self.status.is_playing = true;
        self.media.play();
    }

    /// Point at a track that cannot be loaded. The pointer moves so next and
    /// previous keep walking the list, but nothing plays.
    pub fn reject(&mut self, pointer: PlaybackPointer, reason: &str) {
        warn!(?pointer, %reason, "playback refused, showing as paused");
        self.unsubscribe();
        self.pointer = Some(pointer);
        self.status.reset_clock();
        self.status.is_playing = false;
        self.media.pause();
    }

    pub fn toggle_play_pause(&mut self) {
        // A rejected pointer has no source behind it.
        if self.pointer.is_none() || self.subscription.is_none() {
            return;
        }
        self.status.is_playing = !self.status.is_playing;
        if self.status.is_playing {
            self.media.play();
        } else {
            self.media.pause();
        }
    }

    /// Jump to `percent` (0-100) of the current track.
    pub fn seek(&mut self, percent: f64) {
        if self.pointer.is_none() {
            return;
        }
        let position = percent / 100.0 * self.status.duration;
        self.media.seek(position);
        self.status.progress = percent;
    }

    /// Set the volume as given; the caller is trusted to stay within `[0, 1]`.
    pub fn set_volume(&mut self, volume: f32) {
        self.status.volume = volume;
        self.media.set_volume(volume);
    }

    /// Move the pointer within its list without touching the media.
    pub fn repoint(&mut self, index: usize) {
        if let Some(p) = self.pointer.as_mut() {
            p.index = index;
        }
    }

    /// Clear the pointer and silence the handle.
    pub fn stop(&mut self) {
        if self.pointer.take().is_some() {
            info!("playback stopped");
        }
        self.unsubscribe();
        self.status.is_playing = false;
        self.status.reset_clock();
        self.media.pause();
    }

    /// Drop the time-update subscription. Safe to call repeatedly.
    fn unsubscribe(&mut self) {
        self.subscription = None;
    }

    /// Apply pending media events. Returns true when the current source
    /// reached its natural end.
    pub fn sync(&mut self) -> bool {
        let mut ended = false;
        for event in self.media.drain_events() {
            if Some(event.token()) != self.subscription {
                debug!(?event, "ignoring event from a superseded source");
                continue;
            }
            match event {
                MediaEvent::TimeUpdate {
                    current_time,
                    duration,
                    ..
                } => self.status.apply_time_update(current_time, duration),
                MediaEvent::Ended { .. } => ended = true,
                MediaEvent::PlayRejected { reason, .. } => {
                    warn!(%reason, "playback refused, showing as paused");
                    self.status.is_playing = false;
                }
            }
        }
        ended
    }

    pub fn shutdown(&mut self, fade_out: Duration) {
        self.unsubscribe();
        self.media.shutdown(fade_out);
    }
}
