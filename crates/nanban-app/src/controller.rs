//! Conversation controller wiring recognition, translation, the log and
//! the output boundaries together.

use std::time::Duration;

use nanban_conversation::{ConversationEntry, ConversationLog, EntryDraft};
use nanban_core::config::NanbanConfig;
use nanban_gloss::GlossTranslator;
use nanban_recognition::{
    AudioFeatures, CaptureFrame, PerceptionSource, PlaceholderPerception, PlaceholderSignModel,
    PlaceholderSpeechModel, SignSession, SpeechSession,
};

use crate::output::{HapticFeedback, SpeechOutput, VoiceOptions};

/// Audio handed to the speech session when no microphone is attached.
const SILENT_CAPTURE: Duration = Duration::from_millis(250);

/// Output-related settings taken from the config at construction.
#[derive(Debug, Clone)]
struct OutputSettings {
    speech_enabled: bool,
    auto_speak: bool,
    confidence_threshold: f32,
    haptics_enabled: bool,
}

impl From<&NanbanConfig> for OutputSettings {
    fn from(config: &NanbanConfig) -> Self {
        Self {
            speech_enabled: config.speech.enabled,
            auto_speak: config.speech.auto_speak,
            confidence_threshold: config.recognition.confidence_threshold,
            haptics_enabled: config.feedback.haptics_enabled,
        }
    }
}

/// Both conversation directions over one shared log.
pub struct Controller<S, H> {
    translator: GlossTranslator,
    speech: SpeechSession,
    sign: SignSession,
    perception: Box<dyn PerceptionSource>,
    log: ConversationLog,
    voice: VoiceOptions,
    settings: OutputSettings,
    speaker: S,
    haptics: H,
}

impl<S: SpeechOutput, H: HapticFeedback> Controller<S, H> {
    /// Controller with placeholder recognizers configured from `config`.
    pub fn from_config(config: &NanbanConfig, speaker: S, haptics: H) -> Self {
        Self {
            translator: GlossTranslator::new(),
            speech: SpeechSession::new(PlaceholderSpeechModel::from_config(&config.recognition)),
            sign: SignSession::new(PlaceholderSignModel::from_config(&config.recognition)),
            perception: Box::new(PlaceholderPerception::new()),
            log: ConversationLog::new(),
            voice: VoiceOptions::from(&config.speech),
            settings: OutputSettings::from(config),
            speaker,
            haptics,
        }
    }

    /// Replace the recognition sessions.
    #[cfg(test)]
    pub fn with_sessions(mut self, speech: SpeechSession, sign: SignSession) -> Self {
        self.speech = speech;
        self.sign = sign;
        self
    }

    #[cfg(test)]
    pub fn with_perception(mut self, perception: Box<dyn PerceptionSource>) -> Self {
        self.perception = perception;
        self
    }

    pub fn translator(&self) -> &GlossTranslator {
        &self.translator
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    /// Translate typed text and record it. Nothing is recorded for text
    /// without any gloss.
    pub fn translate(&mut self, text: &str) -> Option<&ConversationEntry> {
        let gloss = self.translator.convert(text);
        if gloss.is_empty() {
            return None;
        }
        Some(self.log.append(EntryDraft::speech(text.trim(), gloss)))
    }

    /// Listen once, translate what was heard, record it and speak it back.
    pub async fn listen(&mut self) -> Option<&ConversationEntry> {
        self.pulse();
        let audio = AudioFeatures::silence(SILENT_CAPTURE);
        let text = self.speech.start(&audio).await?;

        let gloss = self.translator.convert(&text);
        tracing::info!(text = %text, tokens = gloss.len(), "Speech translated");
        let id = self.log.append(EntryDraft::speech(text.clone(), gloss)).id;

        if self.settings.speech_enabled {
            self.speaker.speak(&text, &self.voice);
        }
        self.log.get(id)
    }

    /// Recognize signs in `frame`, record the ranked candidates and speak the
    /// top one when it is confident enough.
    pub async fn recognize_sign(&mut self, frame: &CaptureFrame) -> Option<&ConversationEntry> {
        self.pulse();
        let keypoints = match self.perception.extract_keypoints(frame) {
            Ok(keypoints) => keypoints,
            Err(e) => {
                tracing::warn!(error = %e, "Keypoint extraction failed");
                return None;
            }
        };

        let candidates = self.sign.start(&keypoints).await?;
        let draft = EntryDraft::sign(candidates)?;
        let top_confidence = draft
            .candidates
            .as_ref()
            .and_then(|c| c.first())
            .map_or(0.0, |c| c.confidence);
        let label = draft.text.clone();
        tracing::info!(label = %label, confidence = top_confidence, "Sign recognized");
        let id = self.log.append(draft).id;

        if self.should_auto_speak(top_confidence) {
            self.speaker.speak(&label, &self.voice);
        } else {
            tracing::debug!(confidence = top_confidence, "Auto-speak skipped");
        }
        self.log.get(id)
    }

    /// Speak arbitrary text, e.g. a saved phrase.
    pub fn speak(&self, text: &str) {
        if self.settings.speech_enabled {
            self.speaker.speak(text, &self.voice);
        }
    }

    fn should_auto_speak(&self, confidence: f32) -> bool {
        self.settings.speech_enabled
            && self.settings.auto_speak
            && confidence >= self.settings.confidence_threshold
    }

    fn pulse(&self) {
        if self.settings.haptics_enabled {
            self.haptics.pulse();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::{Arc, Mutex};

    use nanban_conversation::EntryKind;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[derive(Clone, Default)]
    struct RecordingSpeech(Arc<Mutex<Vec<String>>>);

    impl SpeechOutput for RecordingSpeech {
        fn speak(&self, text: &str, _voice: &VoiceOptions) {
            self.0.lock().unwrap().push(text.to_string());
        }
    }

    #[derive(Clone, Default)]
    struct CountingHaptics(Arc<Mutex<usize>>);

    impl HapticFeedback for CountingHaptics {
        fn pulse(&self) {
            *self.0.lock().unwrap() += 1;
        }
    }

    fn build(
        config: &NanbanConfig,
    ) -> (Controller<RecordingSpeech, CountingHaptics>, RecordingSpeech, CountingHaptics) {
        let speech = RecordingSpeech::default();
        let haptics = CountingHaptics::default();
        let speech_model = PlaceholderSpeechModel::with_rng(StdRng::seed_from_u64(1))
            .with_latency(Duration::from_millis(20));
        let sign_model = PlaceholderSignModel::with_rng(StdRng::seed_from_u64(2))
            .with_latency_range(Duration::from_millis(10), Duration::from_millis(30));
        let controller = Controller::from_config(config, speech.clone(), haptics.clone())
            .with_sessions(SpeechSession::new(speech_model), SignSession::new(sign_model))
            .with_perception(Box::new(PlaceholderPerception::with_rng(StdRng::seed_from_u64(3))));
        (controller, speech, haptics)
    }

    fn frame() -> CaptureFrame {
        CaptureFrame::new(640, 480, vec![0; 64])
    }

    #[test]
    fn test_translate_records_without_speaking() {
        let (mut controller, speech, haptics) = build(&NanbanConfig::default());
        let entry = controller.translate("  Thank you  ").unwrap();
        assert_eq!(entry.kind, EntryKind::Speech);
        assert_eq!(entry.text, "Thank you");
        assert_eq!(entry.gloss.as_deref(), Some(&["THANK-YOU".to_string()][..]));

        assert!(controller.translate("   ").is_none());
        assert_eq!(controller.log().len(), 1);
        assert!(speech.0.lock().unwrap().is_empty());
        assert_eq!(*haptics.0.lock().unwrap(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_listen_records_and_speaks() {
        let (mut controller, speech, haptics) = build(&NanbanConfig::default());

        let entry = controller.listen().await.unwrap().clone();
        assert_eq!(entry.kind, EntryKind::Speech);
        assert!(nanban_recognition::SPEECH_UTTERANCES.contains(&entry.text.as_str()));
        assert!(!entry.gloss.as_ref().unwrap().is_empty());

        assert_eq!(*speech.0.lock().unwrap(), vec![entry.text.clone()]);
        assert_eq!(*haptics.0.lock().unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sign_auto_speak_respects_threshold() {
        let mut config = NanbanConfig::default();
        config.recognition.confidence_threshold = 0.0;
        let (mut controller, speech, _) = build(&config);
        let entry = controller.recognize_sign(&frame()).await.unwrap().clone();
        assert_eq!(entry.kind, EntryKind::Sign);
        assert_eq!(entry.text, entry.candidates.as_ref().unwrap()[0].label);
        assert_eq!(*speech.0.lock().unwrap(), vec![entry.text]);

        // Placeholder confidences stay below 1.0.
        config.recognition.confidence_threshold = 1.0;
        let (mut controller, speech, _) = build(&config);
        assert!(controller.recognize_sign(&frame()).await.is_some());
        assert!(speech.0.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabled_outputs_stay_silent() {
        let mut config = NanbanConfig::default();
        config.speech.enabled = false;
        config.feedback.haptics_enabled = false;
        config.recognition.confidence_threshold = 0.0;
        let (mut controller, speech, haptics) = build(&config);

        controller.listen().await.unwrap();
        controller.recognize_sign(&frame()).await.unwrap();
        controller.speak("hello");

        assert!(speech.0.lock().unwrap().is_empty());
        assert_eq!(*haptics.0.lock().unwrap(), 0);
        assert_eq!(controller.log().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_perception_failure_records_nothing() {
        let (mut controller, _, haptics) = build(&NanbanConfig::default());
        assert!(controller.recognize_sign(&CaptureFrame::default()).await.is_none());
        assert!(controller.log().is_empty());
        assert_eq!(*haptics.0.lock().unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_both_directions_share_one_log() {
        let (mut controller, _, _) = build(&NanbanConfig::default());
        controller.listen().await.unwrap();
        controller.recognize_sign(&frame()).await.unwrap();
        controller.translate("goodbye").unwrap();

        let kinds: Vec<EntryKind> = controller.log().all().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EntryKind::Speech, EntryKind::Sign, EntryKind::Speech]);
        let ids: Vec<u64> = controller.log().all().iter().map(|e| e.id.0).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }
}
