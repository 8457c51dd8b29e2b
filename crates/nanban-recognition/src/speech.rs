//! Placeholder speech recognizer.
//!
//! Stands in for a real acoustic model: after a fixed listening time it
//! returns one utterance drawn from a fixed pool. The random source is
//! injectable so tests can seed it.

use std::sync::Mutex;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use nanban_core::config::RecognitionConfig;

use crate::error::RecognitionError;
use crate::model::RecognitionModel;

/// Utterances the placeholder speech model can "hear".
pub const SPEECH_UTTERANCES: &[&str] = &[
    "Hello, how are you today?",
    "Thank you for your help",
    "What time is the meeting?",
    "I need assistance with this",
    "Good morning everyone",
    "Please repeat that sign",
    "Can you show me how to sign this?",
];

/// Audio captured for one speech attempt.
#[derive(Debug, Clone, Default)]
pub struct AudioFeatures {
    /// PCM samples in `[-1.0, 1.0]`.
    pub samples: Vec<f32>,
    /// Sample rate in Hz, typically 16000.
    pub sample_rate: u32,
}

impl AudioFeatures {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// `duration` worth of silence at 16 kHz, used when no microphone is attached.
    pub fn silence(duration: Duration) -> Self {
        let sample_rate = 16_000;
        let len = (duration.as_secs_f32() * sample_rate as f32) as usize;
        Self::new(vec![0.0; len], sample_rate)
    }

    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// Randomized stand-in for a speech-to-text model.
#[derive(Debug)]
pub struct PlaceholderSpeechModel<R = StdRng> {
    rng: Mutex<R>,
    latency: Duration,
}

impl PlaceholderSpeechModel<StdRng> {
    /// Placeholder seeded from the OS with the default 2 s listening time.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    pub fn from_config(config: &RecognitionConfig) -> Self {
        Self::new().with_latency(Duration::from_millis(config.speech_latency_ms))
    }
}

impl Default for PlaceholderSpeechModel<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng + Send> PlaceholderSpeechModel<R> {
    /// Placeholder drawing from the given random source.
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng: Mutex::new(rng),
            latency: Duration::from_millis(2000),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    fn pick_utterance(&self) -> Option<&'static str> {
        let mut rng = self.rng.lock().unwrap_or_else(|p| p.into_inner());
        SPEECH_UTTERANCES.choose(&mut *rng).copied()
    }
}

impl<R: Rng + Send> RecognitionModel for PlaceholderSpeechModel<R> {
    type Input = AudioFeatures;
    type Output = String;
    const KIND: &'static str = "speech";

    fn latency(&self) -> Duration {
        self.latency
    }

    async fn recognize(&self, input: &AudioFeatures) -> Result<String, RecognitionError> {
        if input.sample_rate == 0 {
            return Err(RecognitionError::InvalidInput(
                "sample rate must be greater than 0".to_string(),
            ));
        }

        let utterance = self
            .pick_utterance()
            .ok_or_else(|| RecognitionError::ModelFailure("empty utterance pool".to_string()))?;

        tracing::debug!(
            audio_secs = input.duration_secs(),
            "Placeholder speech transcription generated"
        );
        Ok(utterance.to_string())
    }
}
