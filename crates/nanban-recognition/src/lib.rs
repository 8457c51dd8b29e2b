//! Nanban Recognition crate - speech and sign recognition sessions.
//!
//! A [`RecognitionSession`] owns at most one in-flight recognition attempt.
//! The actual recognizer sits behind the [`RecognitionModel`] capability
//! trait; this crate ships randomized placeholder models for speech and sign
//! with injectable random sources, plus the keypoint record a real perception
//! pipeline must produce.

pub mod error;
pub mod keypoints;
pub mod model;
pub mod session;
pub mod sign;
pub mod speech;

pub use error::RecognitionError;
pub use keypoints::{
    CaptureFrame, HandKeypoints, Keypoints, Landmark, PerceptionSource, PlaceholderPerception,
    PoseLandmark,
};
pub use model::{rank_candidates, RecognitionModel, RecognitionOutput};
pub use session::RecognitionSession;
pub use sign::{PlaceholderSignModel, SIGN_LABELS};
pub use speech::{AudioFeatures, PlaceholderSpeechModel, SPEECH_UTTERANCES};

/// Speech session backed by the placeholder speech model.
pub type SpeechSession = RecognitionSession<PlaceholderSpeechModel>;

/// Sign session backed by the placeholder sign model.
pub type SignSession = RecognitionSession<PlaceholderSignModel>;
