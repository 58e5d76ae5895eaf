//! Application state: the track lists, the playback controller and the
//! `App` model that ties them to views and keyboard focus.

mod coordinator;
mod model;
mod playback;

pub use coordinator::{Coordinator, PlaylistChange, Removal};
pub use model::*;
pub use playback::{ListTag, PlaybackController, PlaybackPointer, PlaybackStatus};
