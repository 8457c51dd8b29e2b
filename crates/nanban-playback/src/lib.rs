//! Nanban Playback crate - timed presentation of a gloss sequence.
//!
//! Each token runs through Attack (highlighted) -> Release -> Gap before the
//! cursor advances; after the last token the run passes through Done and
//! returns to Idle. A new play request supersedes the running schedule.

pub mod scheduler;
pub mod state;

pub use scheduler::{PlaybackEvent, PlaybackScheduler};
pub use state::{PlaybackPhase, PlaybackState, PlaybackTiming};
