//! Error types for recognition models and perception sources.

use nanban_core::error::NanbanError;

/// Failures inside a single recognition or perception step.
///
/// Sessions never surface these to callers: a failed attempt is logged and
/// reported as an absent result.
#[derive(Debug, thiserror::Error)]
pub enum RecognitionError {
    #[error("Recognition model failed: {0}")]
    ModelFailure(String),
    #[error("Invalid recognition input: {0}")]
    InvalidInput(String),
    #[error("Keypoint extraction failed: {0}")]
    Perception(String),
}

impl From<RecognitionError> for NanbanError {
    fn from(err: RecognitionError) -> Self {
        match err {
            RecognitionError::Perception(msg) => NanbanError::Perception(msg),
            other => NanbanError::Recognition(other.to_string()),
        }
    }
}
