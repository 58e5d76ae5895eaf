//! The track lists and the searches that fill them.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::audio::{MediaError, MediaSource};
use crate::library::{ObjectUrls, Track, TrackId, tracks_from_files};
use crate::search::{SearchOutcome, SearchTicket, local_matches};

use super::playback::ListTag;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlaylistChange {
    Added,
    /// The entry that used to sit at this index was removed.
    Removed(usize),
}

/// A library entry dropped by `remove_from_library`.
#[derive(Debug)]
pub struct Removal {
    pub track: Track,
    /// Index of the playlist entry that went with it, if there was one.
    pub playlist_index: Option<usize>,
}

/// Local half of the newest search, held until its online half arrives.
#[derive(Debug)]
struct PendingSearch {
    seq: u64,
    local: Vec<Track>,
}

#[derive(Debug, Default)]
pub struct Coordinator {
    catalog: Vec<Track>,
    library: Vec<Track>,
    search_results: Vec<Track>,
    playlist: Vec<Track>,
    recent_searches: Vec<String>,
    last_seq: u64,
    pending: Option<PendingSearch>,
    urls: ObjectUrls,
}

impl Coordinator {
    pub fn new(catalog: Vec<Track>) -> Self {
        Self {
            catalog,
            ..Self::default()
        }
    }

    pub fn list(&self, tag: ListTag) -> &[Track] {
        match tag {
            ListTag::Catalog => &self.catalog,
            ListTag::Library => &self.library,
            ListTag::Search => &self.search_results,
            ListTag::Playlist => &self.playlist,
        }
    }

    pub fn search_results(&self) -> &[Track] {
        &self.search_results
    }

    pub fn recent_searches(&self) -> &[String] {
        &self.recent_searches
    }

    /// True while the newest search is still waiting for its online half.
    pub fn is_searching(&self) -> bool {
        self.pending.is_some()
    }

    pub fn in_playlist(&self, id: &TrackId) -> bool {
        self.playlist.iter().any(|t| &t.id == id)
    }

    /// Remove the playlist entry with `track`'s id, or append `track`.
    pub fn toggle_playlist(&mut self, track: &Track) -> PlaylistChange {
        match self.playlist.iter().position(|t| t.id == track.id) {
            Some(i) => {
                self.playlist.remove(i);
                debug!(id = %track.id, "removed from playlist");
                PlaylistChange::Removed(i)
            }
            None => {
                self.playlist.push(track.clone());
                debug!(id = %track.id, "added to playlist");
                PlaylistChange::Added
            }
        }
    }

    /// Start a search for `query`.
    ///
    /// Blank queries change nothing and return `None`. Otherwise the query is
    /// remembered, the library is filtered right away and a ticket for the
    /// online half is returned. Any earlier search still in flight is
    /// superseded.
    pub fn begin_search(&mut self, query: &str) -> Option<SearchTicket> {
        if query.trim().is_empty() {
            return None;
        }
        if !self.recent_searches.iter().any(|q| q == query) {
            self.recent_searches.push(query.to_string());
        }
        self.last_seq += 1;
        let local = local_matches(&self.library, query);
        info!(seq = self.last_seq, %query, local = local.len(), "search started");
        self.pending = Some(PendingSearch {
            seq: self.last_seq,
            local,
        });
        Some(SearchTicket {
            seq: self.last_seq,
            query: query.to_string(),
        })
    }

    /// Apply the online half of a search. Returns false when `outcome`
    /// belongs to a superseded search and was discarded.
    pub fn finish_search(&mut self, outcome: SearchOutcome) -> bool {
        let pending = match self.pending.take() {
            Some(p) if p.seq == outcome.seq => p,
            other => {
                debug!(seq = outcome.seq, latest = self.last_seq, "discarding stale search");
                self.pending = other;
                return false;
            }
        };
        let remote = outcome.remote.unwrap_or_else(|e| {
            warn!(query = %outcome.query, error = %e, "online search failed, showing local matches only");
            Vec::new()
        });
        let mut results = pending.local;
        results.extend(remote);
        info!(seq = outcome.seq, results = results.len(), "search finished");
        self.search_results = results;
        true
    }

    pub fn clear_recent_searches(&mut self) {
        self.recent_searches.clear();
    }

    /// Add one picked batch of files to the library. Returns how many were added.
    pub fn upload(&mut self, batch: &[PathBuf], placeholder_image: &str) -> usize {
        let tracks = tracks_from_files(batch, &mut self.urls, placeholder_image);
        let added = tracks.len();
        self.library.extend(tracks);
        info!(added, library = self.library.len(), "files uploaded");
        added
    }

    /// Drop a library entry, release its object url and take its playlist
    /// entry with it.
    pub fn remove_from_library(&mut self, index: usize) -> Option<Removal> {
        if index >= self.library.len() {
            return None;
        }
        let track = self.library.remove(index);
        if !self.urls.revoke(&track.audio_url) {
            debug!(url = %track.audio_url, "library entry had no live object url");
        }
        let playlist_index = self.playlist.iter().position(|t| t.id == track.id);
        if let Some(i) = playlist_index {
            self.playlist.remove(i);
        }
        info!(id = %track.id, "removed from library");
        Some(Removal {
            track,
            playlist_index,
        })
    }

    /// Where the media handle should read `track` from.
    pub fn resolve(&self, track: &Track) -> Result<MediaSource, MediaError> {
        self.urls.resolve(&track.audio_url)
    }

    #[cfg(test)]
    pub fn live_object_urls(&self) -> usize {
        self.urls.len()
    }
}
