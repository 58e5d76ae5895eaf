//! Audio output: the `MediaHandle` seam and its rodio-backed implementation.
//!
//! `AudioPlayer` owns a dedicated thread holding the output stream and the
//! current sink. Commands go in over a channel, `MediaEvent`s come back.

mod player;
mod source;
mod thread;
mod types;

pub use player::AudioPlayer;
pub use types::*;
