//! Session-scoped references to uploaded files.
//!
//! An upload is not addressed by its path directly: it gets a `blob:` url
//! that stays valid until the library entry owning it is removed (or the
//! process exits).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::audio::{MediaError, MediaSource};

const SCHEME: &str = "blob:encore/";

#[derive(Debug, Default)]
pub struct ObjectUrls {
    next: u64,
    entries: HashMap<String, PathBuf>,
}

impl ObjectUrls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `path` and return a fresh url for it.
    pub fn create(&mut self, path: &Path) -> String {
        self.next += 1;
        let url = format!("{SCHEME}{}", self.next);
        self.entries.insert(url.clone(), path.to_path_buf());
        url
    }

    /// Release `url`. Returns false if it was not live.
    pub fn revoke(&mut self, url: &str) -> bool {
        self.entries.remove(url).is_some()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Map a track's `audio_url` to the source the media handle should open.
    ///
    /// `blob:` urls must still be registered; `http(s)` urls are remote;
    /// `file://` urls and anything else are treated as local paths.
    pub fn resolve(&self, url: &str) -> Result<MediaSource, MediaError> {
        if url.starts_with("blob:") {
            return self
                .entries
                .get(url)
                .map(|p| MediaSource::Local(p.clone()))
                .ok_or_else(|| MediaError::Revoked(url.to_string()));
        }
        if url.starts_with("http://") || url.starts_with("https://") {
            return Ok(MediaSource::Remote(url.to_string()));
        }
        let path = url.strip_prefix("file://").unwrap_or(url);
        Ok(MediaSource::Local(PathBuf::from(path)))
    }
}
