//! Placeholder sign recognizer.
//!
//! Stands in for a gesture classifier: after a random processing time it
//! draws 1 to `max_candidates` distinct labels from a fixed pool and gives
//! each a confidence in `[0.6, 1.0)`. Ranking happens in the session.

use std::ops::RangeInclusive;
use std::sync::Mutex;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use nanban_core::config::RecognitionConfig;
use nanban_core::types::RecognitionResult;

use crate::error::RecognitionError;
use crate::keypoints::Keypoints;
use crate::model::RecognitionModel;

/// Sign labels the placeholder sign model can "see".
pub const SIGN_LABELS: &[&str] = &[
    "HELLO",
    "THANK-YOU",
    "PLEASE",
    "HELP",
    "YES",
    "NO",
    "GOOD",
    "BAD",
    "HOW",
    "WHAT",
    "WHERE",
    "WHEN",
    "WHO",
    "I",
    "YOU",
    "ME",
    "WE",
    "THEY",
    "NAME",
    "WORK",
    "HOME",
    "FAMILY",
    "FRIEND",
    "LOVE",
    "HAPPY",
    "SAD",
    "SORRY",
    "EXCUSE-ME",
    "WELCOME",
    "GOODBYE",
    "SEE-YOU-LATER",
];

const MIN_CONFIDENCE: f32 = 0.6;
const MAX_CONFIDENCE: f32 = 1.0;

/// Randomized stand-in for a gesture classifier.
#[derive(Debug)]
pub struct PlaceholderSignModel<R = StdRng> {
    rng: Mutex<R>,
    latency_ms: RangeInclusive<u64>,
    max_candidates: usize,
}

impl PlaceholderSignModel<StdRng> {
    /// Placeholder seeded from the OS: 500-2000 ms, up to 3 candidates.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    pub fn from_config(config: &RecognitionConfig) -> Self {
        Self::new()
            .with_latency_range(
                Duration::from_millis(config.sign_latency_min_ms),
                Duration::from_millis(config.sign_latency_max_ms),
            )
            .with_max_candidates(config.max_candidates)
    }
}

impl Default for PlaceholderSignModel<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng + Send> PlaceholderSignModel<R> {
    /// Placeholder drawing labels, confidences and latency from `rng`.
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng: Mutex::new(rng),
            latency_ms: 500..=2000,
            max_candidates: 3,
        }
    }

    /// Bounds of the simulated processing time; reversed bounds are swapped.
    pub fn with_latency_range(mut self, min: Duration, max: Duration) -> Self {
        let (min, max) = (min.as_millis() as u64, max.as_millis() as u64);
        self.latency_ms = min.min(max)..=min.max(max);
        self
    }

    /// Cap on candidates per attempt, kept within `1..=SIGN_LABELS.len()`.
    pub fn with_max_candidates(mut self, max_candidates: usize) -> Self {
        self.max_candidates = max_candidates.clamp(1, SIGN_LABELS.len());
        self
    }

    fn lock_rng(&self) -> std::sync::MutexGuard<'_, R> {
        self.rng.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Draw distinct labels in production order (unranked).
    fn draw_candidates(&self) -> Vec<RecognitionResult> {
        let mut rng = self.lock_rng();
        let count = rng.random_range(1..=self.max_candidates);
        let picks = rand::seq::index::sample(&mut *rng, SIGN_LABELS.len(), count);
        picks
            .iter()
            .map(|i| {
                let confidence = rng.random_range(MIN_CONFIDENCE..MAX_CONFIDENCE);
                RecognitionResult::new(SIGN_LABELS[i], confidence)
            })
            .collect()
    }
}

impl<R: Rng + Send> RecognitionModel for PlaceholderSignModel<R> {
    type Input = Keypoints;
    type Output = Vec<RecognitionResult>;
    const KIND: &'static str = "sign";

    fn latency(&self) -> Duration {
        let millis = self.lock_rng().random_range(self.latency_ms.clone());
        Duration::from_millis(millis)
    }

    async fn recognize(
        &self,
        input: &Keypoints,
    ) -> Result<Vec<RecognitionResult>, RecognitionError> {
        if !input.is_well_formed() {
            return Err(RecognitionError::InvalidInput(
                "keypoint record has unexpected landmark counts".to_string(),
            ));
        }

        let candidates = self.draw_candidates();
        tracing::debug!(
            candidates = candidates.len(),
            "Placeholder sign candidates generated"
        );
        Ok(candidates)
    }
}
