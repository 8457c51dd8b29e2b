//! Speech and haptic output boundaries.
//!
//! Both are fire-and-forget: the caller never waits for or inspects the
//! outcome. The tracing implementations stand in for platform voices and
//! vibration motors.

use nanban_core::config::SpeechConfig;

/// Voice parameters for one utterance.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceOptions {
    /// BCP 47 language tag.
    pub language: String,
    pub pitch: f32,
    pub rate: f32,
}

impl From<&SpeechConfig> for VoiceOptions {
    fn from(config: &SpeechConfig) -> Self {
        Self {
            language: config.language.clone(),
            pitch: config.pitch,
            rate: config.rate,
        }
    }
}

/// Text-to-speech sink.
pub trait SpeechOutput: Send + Sync {
    fn speak(&self, text: &str, voice: &VoiceOptions);
}

/// Haptic feedback sink.
pub trait HapticFeedback: Send + Sync {
    fn pulse(&self);
}

/// Logs utterances instead of voicing them.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSpeechOutput;

impl SpeechOutput for TracingSpeechOutput {
    fn speak(&self, text: &str, voice: &VoiceOptions) {
        tracing::info!(
            language = %voice.language,
            pitch = voice.pitch,
            rate = voice.rate,
            "Speaking: {}",
            text
        );
    }
}

/// Logs haptic pulses.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingHaptics;

impl HapticFeedback for TracingHaptics {
    fn pulse(&self) {
        tracing::debug!("Haptic pulse");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_voice() {
        let voice = VoiceOptions::from(&SpeechConfig::default());
        assert_eq!(
            voice,
            VoiceOptions {
                language: "en-US".to_string(),
                pitch: 1.0,
                rate: 0.8,
            }
        );
    }

    #[test]
    fn test_voice_from_config() {
        let config = SpeechConfig {
            language: "en-GB".to_string(),
            pitch: 1.2,
            rate: 1.0,
            ..SpeechConfig::default()
        };
        let voice = VoiceOptions::from(&config);
        assert_eq!(voice.language, "en-GB");
        assert_eq!(voice.pitch, 1.2);
        assert_eq!(voice.rate, 1.0);
    }
}
