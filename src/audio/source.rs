//! Opening `MediaSource`s into decodable `rodio` sources.
//!
//! Both local files and remote previews are read fully into memory first, so
//! the decoder always works on a seekable `Cursor`.

use std::io::{Cursor, Read};
use std::time::Duration;

use rodio::{Decoder, Source};
use tracing::debug;

use super::types::{MediaError, MediaSource};

pub(super) type DecodedSource = Decoder<Cursor<Vec<u8>>>;

/// Read the raw bytes behind `source`.
pub(super) fn read_bytes(
    source: &MediaSource,
    http: &ureq::Agent,
    max_bytes: u64,
) -> Result<Vec<u8>, MediaError> {
    match source {
        MediaSource::Local(path) => std::fs::read(path).map_err(|e| MediaError::Read {
            path: path.clone(),
            source: e,
        }),
        MediaSource::Remote(url) => {
            let response = http.get(url).call().map_err(|e| MediaError::Fetch {
                url: url.clone(),
                reason: e.to_string(),
            })?;

            // Read one byte past the limit so an oversized body is detectable.
            let mut bytes = Vec::new();
            response
                .into_reader()
                .take(max_bytes.saturating_add(1))
                .read_to_end(&mut bytes)
                .map_err(|e| MediaError::Fetch {
                    url: url.clone(),
                    reason: e.to_string(),
                })?;
            if bytes.len() as u64 > max_bytes {
                return Err(MediaError::TooLarge {
                    url: url.clone(),
                    limit: max_bytes,
                });
            }
            debug!(url = %url, bytes = bytes.len(), "fetched remote audio");
            Ok(bytes)
        }
    }
}

/// Decode `bytes` and report the total duration when the container knows it.
pub(super) fn decode(bytes: Vec<u8>) -> Result<(DecodedSource, Option<Duration>), MediaError> {
    let decoder = Decoder::new(Cursor::new(bytes))?;
    let duration = decoder.total_duration();
    Ok((decoder, duration))
}

/// Open `source` end to end.
pub(super) fn open(
    source: &MediaSource,
    http: &ureq::Agent,
    max_bytes: u64,
) -> Result<(DecodedSource, Option<Duration>), MediaError> {
    let bytes = read_bytes(source, http, max_bytes)?;
    decode(bytes)
}
