//! Nanban core crate - shared error taxonomy, configuration, timer abstraction
//! and the value types exchanged between the translation, recognition and
//! playback crates.

pub mod clock;
pub mod config;
pub mod error;
pub mod types;

pub use clock::{Clock, TokioClock};
pub use config::NanbanConfig;
pub use error::{NanbanError, Result};
pub use types::*;
