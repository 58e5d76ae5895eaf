//! Tracks, uploads and the session object urls behind them.

mod model;
mod object_url;
mod scan;
mod upload;

pub use model::{Track, TrackId};
pub use object_url::ObjectUrls;
pub use scan::collect_audio_files;
pub use upload::tracks_from_files;
