use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{NanbanError, Result};

/// Top-level configuration for the Nanban application.
///
/// Loaded from `~/.nanban/config.toml` by default. Every section is optional
/// in the file; missing sections and fields fall back to their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NanbanConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default)]
    pub recognition: RecognitionConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub feedback: FeedbackConfig,
}

impl NanbanConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: NanbanConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| NanbanError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Data directory holding the phrase store.
    pub data_dir: String,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: "~/.nanban/data".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Spoken output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Whether recognized text is spoken at all.
    pub enabled: bool,
    /// Speak the top sign candidate automatically after recognition.
    pub auto_speak: bool,
    /// BCP 47 language tag passed to the voice.
    pub language: String,
    pub pitch: f32,
    pub rate: f32,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            auto_speak: true,
            language: "en-US".to_string(),
            pitch: 1.0,
            rate: 0.8,
        }
    }
}

/// Recognition session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognitionConfig {
    /// Minimum top-candidate confidence for auto-speaking a sign.
    pub confidence_threshold: f32,
    /// Simulated listening time of the placeholder speech model.
    pub speech_latency_ms: u64,
    /// Lower bound of the placeholder sign model's processing time.
    pub sign_latency_min_ms: u64,
    /// Upper bound of the placeholder sign model's processing time.
    pub sign_latency_max_ms: u64,
    /// Maximum number of sign candidates per attempt.
    pub max_candidates: usize,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.7,
            speech_latency_ms: 2000,
            sign_latency_min_ms: 500,
            sign_latency_max_ms: 2000,
            max_candidates: 3,
        }
    }
}

/// Gloss playback timing, one set of holds per token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub attack_ms: u64,
    pub release_ms: u64,
    pub gap_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            attack_ms: 300,
            release_ms: 200,
            gap_ms: 500,
        }
    }
}

/// Haptic feedback settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    pub haptics_enabled: bool,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            haptics_enabled: true,
        }
    }
}
