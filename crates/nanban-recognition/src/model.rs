//! Recognition capability trait and result post-processing.

use std::future::Future;
use std::time::Duration;

use nanban_core::types::RecognitionResult;

use crate::error::RecognitionError;

/// A recognizer that turns one captured input into a result.
///
/// Implementations wrap a real acoustic or gesture model, or a placeholder.
/// The session calls [`latency`](Self::latency) before each attempt and waits
/// that long on its clock (cancellably) before calling
/// [`recognize`](Self::recognize).
pub trait RecognitionModel: Send + Sync {
    /// Captured input, e.g. audio features or a keypoint record.
    type Input: Send + Sync;
    /// Result shape, e.g. a transcript or ranked sign candidates.
    type Output: RecognitionOutput;

    /// Short name used in log fields ("speech", "sign").
    const KIND: &'static str;

    /// Time the attempt takes before `recognize` runs. Defaults to none.
    fn latency(&self) -> Duration {
        Duration::ZERO
    }

    /// Run recognition on the input.
    fn recognize(
        &self,
        input: &Self::Input,
    ) -> impl Future<Output = Result<Self::Output, RecognitionError>> + Send;
}

/// Post-processing applied to every successful model output.
pub trait RecognitionOutput: Send + Sized {
    /// Normalize the output, or `None` if nothing usable was recognized.
    fn finalize(self) -> Option<Self>;
}

impl RecognitionOutput for String {
    fn finalize(self) -> Option<Self> {
        let trimmed = self.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

impl RecognitionOutput for Vec<RecognitionResult> {
    fn finalize(self) -> Option<Self> {
        let ranked = rank_candidates(self);
        if ranked.is_empty() {
            None
        } else {
            Some(ranked)
        }
    }
}

/// Sort candidates by descending confidence.
///
/// The sort is stable: candidates with equal confidence keep the order in
/// which the model produced them. Candidates with a NaN confidence are dropped.
pub fn rank_candidates(mut candidates: Vec<RecognitionResult>) -> Vec<RecognitionResult> {
    candidates.retain(|c| !c.confidence.is_nan());
    candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    candidates
}
