//! Application model: `App`, the views it shows and the keyboard focus.
//!
//! `App` owns the coordinator (track lists, searches, uploads) and the
//! playback controller, and keeps the playback pointer in step with every list
//! mutation.

use std::path::PathBuf;
use std::time::Duration;

use tracing::{info, warn};

use crate::audio::MediaHandle;
use crate::config::{LibrarySettings, Settings};
use crate::library::{Track, collect_audio_files};
use crate::search::{SearchOutcome, SearchTicket};

use super::coordinator::{Coordinator, PlaylistChange};
use super::playback::{ListTag, PlaybackController, PlaybackPointer, PlaybackStatus};

/// The pages of the player, in sidebar order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum View {
    Home,
    Library,
    Playlist,
    Search,
}

impl View {
    pub const ALL: [View; 4] = [View::Home, View::Library, View::Playlist, View::Search];

    /// The list this view shows.
    pub fn list(self) -> ListTag {
        match self {
            View::Home => ListTag::Catalog,
            View::Library => ListTag::Library,
            View::Playlist => ListTag::Playlist,
            View::Search => ListTag::Search,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            View::Home => "Home",
            View::Library => "Your Library",
            View::Playlist => "Playlist",
            View::Search => "Search Results",
        }
    }

    pub fn position(self) -> usize {
        match self {
            View::Home => 0,
            View::Library => 1,
            View::Playlist => 2,
            View::Search => 3,
        }
    }

    pub fn cycle(self) -> View {
        View::ALL[(self.position() + 1) % View::ALL.len()]
    }
}

/// Where key presses go.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Focus {
    Browse,
    SearchInput,
    UploadPrompt,
}

impl Focus {
    pub fn is_text_entry(self) -> bool {
        !matches!(self, Focus::Browse)
    }
}

/// Global transport keys.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Shortcut {
    TogglePlayPause,
    Next,
    Previous,
    VolumeUp,
    VolumeDown,
}

pub struct App {
    pub coordinator: Coordinator,
    pub player: PlaybackController,
    pub view: View,
    pub focus: Focus,
    pub search_input: String,
    pub upload_input: String,
    /// One-line feedback shown in the footer.
    pub notice: Option<String>,
    pub catalog_title: String,

    cursors: [usize; 4],
    recall: Option<usize>,
    volume_step: f32,
    library: LibrarySettings,
}

impl App {
    pub fn new(catalog: Vec<Track>, media: Box<dyn MediaHandle>, settings: &Settings) -> Self {
        Self {
            coordinator: Coordinator::new(catalog),
            player: PlaybackController::new(media, settings.audio.initial_volume),
            view: View::Home,
            focus: Focus::Browse,
            search_input: String::new(),
            upload_input: String::new(),
            notice: None,
            catalog_title: settings.catalog.title.clone(),
            cursors: [0; 4],
            recall: None,
            volume_step: settings.audio.volume_step,
            library: settings.library.clone(),
        }
    }

    pub fn status(&self) -> &PlaybackStatus {
        self.player.status()
    }

    /// The track under the playback pointer.
    pub fn current_track(&self) -> Option<&Track> {
        let p = self.player.pointer()?;
        self.coordinator.list(p.list).get(p.index)
    }

    /// Same id as the current track. Ids are only unique per list, so a
    /// catalog row can match a playing search result.
    pub fn is_current(&self, track: &Track) -> bool {
        self.current_track().is_some_and(|c| c.id == track.id)
    }

    pub fn visible_tracks(&self) -> &[Track] {
        self.coordinator.list(self.view.list())
    }

    /// Cursor position in the active view.
    pub fn selected(&self) -> usize {
        self.cursors[self.view.position()]
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.visible_tracks().get(self.selected())
    }

    pub fn set_view(&mut self, view: View) {
        self.view = view;
        self.clamp_cursor(view);
    }

    pub fn cycle_view(&mut self) {
        self.set_view(self.view.cycle());
    }

    /// Move the cursor down, wrapping at the end.
    pub fn cursor_down(&mut self) {
        let len = self.visible_tracks().len();
        if len > 0 {
            let slot = &mut self.cursors[self.view.position()];
            *slot = (*slot + 1) % len;
        }
    }

    /// Move the cursor up, wrapping at the start.
    pub fn cursor_up(&mut self) {
        let len = self.visible_tracks().len();
        if len > 0 {
            let slot = &mut self.cursors[self.view.position()];
            *slot = (*slot + len - 1) % len;
        }
    }

    pub fn cursor_top(&mut self) {
        self.cursors[self.view.position()] = 0;
    }

    pub fn cursor_bottom(&mut self) {
        let len = self.visible_tracks().len();
        self.cursors[self.view.position()] = len.saturating_sub(1);
    }

    fn clamp_cursor(&mut self, view: View) {
        let len = self.coordinator.list(view.list()).len();
        let slot = &mut self.cursors[view.position()];
        if *slot >= len {
            *slot = len.saturating_sub(1);
        }
    }

    // Transport

    /// Start playing `list[index]`. A track that cannot be resolved still
    /// becomes current, shown as paused.
    pub fn select_track(&mut self, list: ListTag, index: usize) {
        let Some(track) = self.coordinator.list(list).get(index) else {
            return;
        };
        let pointer = PlaybackPointer::new(list, index);
        match self.coordinator.resolve(track) {
            Ok(source) => {
                info!(id = %track.id, title = %track.title, "playing");
                self.player.select(pointer, source);
            }
            Err(e) => {
                warn!(id = %track.id, error = %e, "track cannot be played");
                self.notice = Some(format!("Cannot play {}: {e}", track.title));
                self.player.reject(pointer, &e.to_string());
            }
        }
    }

    /// Enter on a row: toggle if it is the current track, otherwise play it.
    pub fn activate_selected(&mut self) {
        let Some(track) = self.selected_track() else {
            return;
        };
        if self.is_current(track) {
            self.player.toggle_play_pause();
        } else {
            self.select_track(self.view.list(), self.selected());
        }
    }

    pub fn toggle_play_pause(&mut self) {
        self.player.toggle_play_pause();
    }

    pub fn next(&mut self) {
        self.step(PlaybackPointer::next);
    }

    pub fn previous(&mut self) {
        self.step(PlaybackPointer::previous);
    }

    fn step(&mut self, advance: fn(PlaybackPointer, usize) -> PlaybackPointer) {
        let Some(pointer) = self.player.pointer() else {
            return;
        };
        let len = self.coordinator.list(pointer.list).len();
        if len == 0 {
            return;
        }
        let target = advance(pointer, len);
        self.select_track(target.list, target.index);
    }

    pub fn seek(&mut self, percent: f64) {
        self.player.seek(percent);
    }

    /// Jump `seconds` forward (or back when negative) within the current track.
    pub fn scrub(&mut self, seconds: f64) {
        let (current, duration) = {
            let status = self.player.status();
            (status.current_time, status.duration)
        };
        if !self.player.has_track() || duration <= 0.0 {
            return;
        }
        let target = (current + seconds).clamp(0.0, duration);
        self.seek(target / duration * 100.0);
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.player.set_volume(volume);
    }

    /// Keyboard volume change, clamped to `[0, 1]`.
    fn nudge_volume(&mut self, delta: f32) {
        let volume = (self.status().volume + delta).clamp(0.0, 1.0);
        self.set_volume(volume);
    }

    /// Apply a transport shortcut. Ignored while typing or with nothing
    /// selected; returns whether it was applied.
    pub fn apply_shortcut(&mut self, shortcut: Shortcut) -> bool {
        if self.focus.is_text_entry() || !self.player.has_track() {
            return false;
        }
        match shortcut {
            Shortcut::TogglePlayPause => self.toggle_play_pause(),
            Shortcut::Next => self.next(),
            Shortcut::Previous => self.previous(),
            Shortcut::VolumeUp => self.nudge_volume(self.volume_step),
            Shortcut::VolumeDown => self.nudge_volume(-self.volume_step),
        }
        true
    }

    /// Pull media events into the model; advances when a track ends.
    pub fn sync_media(&mut self) {
        if self.player.sync() {
            info!("track ended");
            self.next();
        }
    }

    pub fn shutdown(&mut self, fade_out: Duration) {
        self.player.shutdown(fade_out);
    }

    // Lists

    pub fn toggle_playlist(&mut self, track: &Track) {
        if let PlaylistChange::Removed(i) = self.coordinator.toggle_playlist(track) {
            self.removed_from(ListTag::Playlist, i);
        }
        self.clamp_cursor(View::Playlist);
    }

    pub fn toggle_playlist_selected(&mut self) {
        if let Some(track) = self.selected_track().cloned() {
            self.toggle_playlist(&track);
        }
    }

    /// Remove the library entry under the cursor. Only acts in the library view.
    pub fn remove_selected_from_library(&mut self) {
        if self.view != View::Library {
            return;
        }
        let index = self.selected();
        let Some(removal) = self.coordinator.remove_from_library(index) else {
            return;
        };
        self.removed_from(ListTag::Library, index);
        if let Some(i) = removal.playlist_index {
            self.removed_from(ListTag::Playlist, i);
        }
        self.clamp_cursor(View::Library);
        self.clamp_cursor(View::Playlist);
        self.notice = Some(format!("Removed {}", removal.track.title));
    }

    /// Keep the pointer valid after `list[index]` was removed.
    fn removed_from(&mut self, list: ListTag, index: usize) {
        let Some(pointer) = self.player.pointer() else {
            return;
        };
        if pointer.list != list {
            return;
        }
        if index < pointer.index {
            self.player.repoint(pointer.index - 1);
        } else if index == pointer.index {
            self.player.stop();
        }
    }

    // Search

    /// Drop the footer notice once the user moves on.
    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn focus_search(&mut self) {
        self.focus = Focus::SearchInput;
        self.recall = None;
    }

    /// Run the query in the search box. The returned ticket must be handed to
    /// the search worker.
    pub fn submit_search(&mut self) -> Option<SearchTicket> {
        let ticket = self.coordinator.begin_search(&self.search_input)?;
        self.focus = Focus::Browse;
        self.recall = None;
        self.notice = Some(format!("Searching for \"{}\"...", ticket.query));
        Some(ticket)
    }

    /// Apply a finished search and show its results.
    pub fn finish_search(&mut self, outcome: SearchOutcome) {
        let remote_failed = outcome.remote.is_err();
        let playing = match self.player.pointer() {
            Some(p) if p.list == ListTag::Search => self.current_track().map(|t| t.id.clone()),
            _ => None,
        };
        if !self.coordinator.finish_search(outcome) {
            return;
        }
        if let Some(id) = playing {
            match self.coordinator.search_results().iter().position(|t| t.id == id) {
                Some(i) => self.player.repoint(i),
                None => self.player.stop(),
            }
        }
        let found = self.coordinator.search_results().len();
        self.notice = Some(if remote_failed {
            format!("{found} results (online search unavailable)")
        } else {
            format!("{found} results")
        });
        self.cursors[View::Search.position()] = 0;
        self.set_view(View::Search);
    }

    /// Step through recent searches into the search box; `older` walks back.
    pub fn recall_recent(&mut self, older: bool) {
        let recent = self.coordinator.recent_searches();
        if recent.is_empty() {
            return;
        }
        let last = recent.len() - 1;
        let next = match (self.recall, older) {
            (None, true) => last,
            (None, false) => return,
            (Some(i), true) => i.saturating_sub(1),
            (Some(i), false) if i >= last => {
                self.recall = None;
                self.search_input.clear();
                return;
            }
            (Some(i), false) => i + 1,
        };
        self.recall = Some(next);
        self.search_input = recent[next].clone();
    }

    pub fn clear_recent_searches(&mut self) {
        self.coordinator.clear_recent_searches();
        self.recall = None;
    }

    // Upload

    pub fn focus_upload(&mut self) {
        self.focus = Focus::UploadPrompt;
        self.upload_input.clear();
    }

    /// Add files and directories to the library. Returns how many tracks were added.
    pub fn upload(&mut self, paths: &[PathBuf]) -> usize {
        let batch = collect_audio_files(paths, &self.library);
        if batch.is_empty() {
            return 0;
        }
        self.coordinator
            .upload(&batch, &self.library.placeholder_image)
    }

    /// Upload whatever path was typed into the prompt.
    pub fn confirm_upload(&mut self) {
        self.focus = Focus::Browse;
        let raw = std::mem::take(&mut self.upload_input);
        let path = expand_path(&raw);
        if path.as_os_str().is_empty() {
            return;
        }
        let added = self.upload(std::slice::from_ref(&path));
        self.notice = Some(if added == 0 {
            format!("No audio files found at {}", path.display())
        } else {
            format!("Added {added} tracks to your library")
        });
    }

    // Text entry

    pub fn cancel_input(&mut self) {
        self.focus = Focus::Browse;
        self.recall = None;
    }

    pub fn push_char(&mut self, c: char) {
        match self.focus {
            Focus::SearchInput => {
                self.search_input.push(c);
                self.recall = None;
            }
            Focus::UploadPrompt => self.upload_input.push(c),
            Focus::Browse => {}
        }
    }

    pub fn pop_char(&mut self) {
        match self.focus {
            Focus::SearchInput => {
                self.search_input.pop();
                self.recall = None;
            }
            Focus::UploadPrompt => {
                self.upload_input.pop();
            }
            Focus::Browse => {}
        }
    }
}

/// Trim a typed path, drop surrounding quotes and expand a leading `~/`.
pub(crate) fn expand_path(raw: &str) -> PathBuf {
    let trimmed = raw.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| trimmed.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')))
        .unwrap_or(trimmed);
    match (unquoted.strip_prefix("~/"), std::env::var_os("HOME")) {
        (Some(rest), Some(home)) => PathBuf::from(home).join(rest),
        _ => PathBuf::from(unquoted),
    }
}
