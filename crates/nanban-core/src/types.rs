//! Value types exchanged between the Nanban crates.

use serde::{Deserialize, Serialize};

/// One labeled, confidence-scored recognition hypothesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionResult {
    /// Sign label in gloss notation, e.g. `THANK-YOU`.
    pub label: String,
    /// Model confidence in `[0.0, 1.0]`.
    pub confidence: f32,
}

impl RecognitionResult {
    /// Create a candidate, clamping the confidence into `[0.0, 1.0]`.
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    /// Confidence as a whole percentage, as shown next to a candidate.
    pub fn percent(&self) -> u32 {
        (self.confidence * 100.0).round() as u32
    }
}

/// Render a gloss sequence the way it is displayed, e.g. `HOW - YOU`.
pub fn format_gloss(tokens: &[String]) -> String {
    tokens.join(" - ")
}
