//! Playback state machine.
//!
//! Transitions:
//! - Idle -> Attack (play request with a non-empty sequence)
//! - Attack -> Release
//! - Release -> Gap
//! - Gap -> Attack (next token, cursor advances)
//! - Gap -> Done (last token finished)
//! - Done -> Idle (cursor reset to 0)

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use nanban_core::config::PlaybackConfig;

/// Presentation phase of the current token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaybackPhase {
    /// Nothing is playing.
    Idle,
    /// The current token is highlighted.
    Attack,
    /// The highlight fades out.
    Release,
    /// Pause before the next token.
    Gap,
    /// The last token finished.
    Done,
}

impl fmt::Display for PlaybackPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackPhase::Idle => write!(f, "Idle"),
            PlaybackPhase::Attack => write!(f, "Attack"),
            PlaybackPhase::Release => write!(f, "Release"),
            PlaybackPhase::Gap => write!(f, "Gap"),
            PlaybackPhase::Done => write!(f, "Done"),
        }
    }
}

/// How long each timed phase is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackTiming {
    pub attack: Duration,
    pub release: Duration,
    pub gap: Duration,
}

impl Default for PlaybackTiming {
    fn default() -> Self {
        Self {
            attack: Duration::from_millis(300),
            release: Duration::from_millis(200),
            gap: Duration::from_millis(500),
        }
    }
}

impl From<&PlaybackConfig> for PlaybackTiming {
    fn from(config: &PlaybackConfig) -> Self {
        Self {
            attack: Duration::from_millis(config.attack_ms),
            release: Duration::from_millis(config.release_ms),
            gap: Duration::from_millis(config.gap_ms),
        }
    }
}

impl PlaybackTiming {
    /// Hold time of a phase; `None` for phases that are left immediately.
    pub fn hold(&self, phase: PlaybackPhase) -> Option<Duration> {
        match phase {
            PlaybackPhase::Attack => Some(self.attack),
            PlaybackPhase::Release => Some(self.release),
            PlaybackPhase::Gap => Some(self.gap),
            PlaybackPhase::Idle | PlaybackPhase::Done => None,
        }
    }

    /// Time one token occupies on screen.
    pub fn per_token(&self) -> Duration {
        self.attack + self.release + self.gap
    }

    /// Time a full run over `tokens` tokens takes. Saturates instead of
    /// wrapping for token counts beyond `u32::MAX`.
    pub fn total(&self, tokens: usize) -> Duration {
        let tokens = u32::try_from(tokens).unwrap_or(u32::MAX);
        self.per_token().saturating_mul(tokens)
    }
}

/// Token sequence, cursor and phase of one playback request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackState {
    tokens: Vec<String>,
    cursor: usize,
    phase: PlaybackPhase,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl PlaybackState {
    /// An idle state holding `tokens`, cursor at 0.
    pub fn new(tokens: Vec<String>) -> Self {
        Self {
            tokens,
            cursor: 0,
            phase: PlaybackPhase::Idle,
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    /// Token being presented, if a token is on screen.
    pub fn current_token(&self) -> Option<&str> {
        match self.phase {
            PlaybackPhase::Attack | PlaybackPhase::Release | PlaybackPhase::Gap => {
                self.tokens.get(self.cursor).map(String::as_str)
            }
            PlaybackPhase::Idle | PlaybackPhase::Done => None,
        }
    }

    /// Whether a run is in progress (any phase but Idle).
    pub fn is_running(&self) -> bool {
        self.phase != PlaybackPhase::Idle
    }

    /// Idle -> Attack on the first token. No-op (returns `false`) when the
    /// sequence is empty or a run is already in progress.
    pub fn play(&mut self) -> bool {
        if self.phase != PlaybackPhase::Idle || self.tokens.is_empty() {
            return false;
        }
        self.cursor = 0;
        self.phase = PlaybackPhase::Attack;
        true
    }

    /// Replace the sequence and start again from token 0, superseding any
    /// run in progress. An empty sequence leaves the state untouched.
    pub fn restart(&mut self, tokens: Vec<String>) -> bool {
        if tokens.is_empty() {
            return false;
        }
        *self = Self::new(tokens);
        self.play()
    }

    /// Leave the current phase. Idle stays Idle.
    pub fn advance(&mut self) -> PlaybackPhase {
        self.phase = match self.phase {
            PlaybackPhase::Idle => PlaybackPhase::Idle,
            PlaybackPhase::Attack => PlaybackPhase::Release,
            PlaybackPhase::Release => PlaybackPhase::Gap,
            PlaybackPhase::Gap if self.cursor + 1 < self.tokens.len() => {
                self.cursor += 1;
                PlaybackPhase::Attack
            }
            PlaybackPhase::Gap => PlaybackPhase::Done,
            PlaybackPhase::Done => {
                self.cursor = 0;
                PlaybackPhase::Idle
            }
        };
        self.phase
    }

    /// Abandon the run: back to Idle with the cursor at 0.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.phase = PlaybackPhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(items: &[&str]) -> Vec<String> {
        items.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(PlaybackPhase::Idle.to_string(), "Idle");
        assert_eq!(PlaybackPhase::Attack.to_string(), "Attack");
        assert_eq!(PlaybackPhase::Release.to_string(), "Release");
        assert_eq!(PlaybackPhase::Gap.to_string(), "Gap");
        assert_eq!(PlaybackPhase::Done.to_string(), "Done");
    }

    #[test]
    fn test_full_run_over_two_tokens() {
        let mut state = PlaybackState::new(tokens(&["A", "B"]));
        assert!(state.play());

        let mut visited = vec![(state.phase(), state.current_token().map(str::to_string))];
        while state.phase() != PlaybackPhase::Idle {
            state.advance();
            assert!(state.cursor() <= state.tokens().len());
            visited.push((state.phase(), state.current_token().map(str::to_string)));
        }

        let a = Some("A".to_string());
        let b = Some("B".to_string());
        assert_eq!(
            visited,
            vec![
                (PlaybackPhase::Attack, a.clone()),
                (PlaybackPhase::Release, a.clone()),
                (PlaybackPhase::Gap, a),
                (PlaybackPhase::Attack, b.clone()),
                (PlaybackPhase::Release, b.clone()),
                (PlaybackPhase::Gap, b),
                (PlaybackPhase::Done, None),
                (PlaybackPhase::Idle, None),
            ]
        );
        assert_eq!(state.cursor(), 0);
    }

    #[test]
    fn test_play_empty_sequence_is_noop() {
        let mut state = PlaybackState::new(Vec::new());
        assert!(!state.play());
        assert_eq!(state.phase(), PlaybackPhase::Idle);
        assert_eq!(state.advance(), PlaybackPhase::Idle);
    }

    #[test]
    fn test_play_while_running_is_rejected() {
        let mut state = PlaybackState::new(tokens(&["A"]));
        assert!(state.play());
        state.advance();
        assert!(!state.play());
        assert_eq!(state.phase(), PlaybackPhase::Release);
    }

    #[test]
    fn test_restart_mid_sequence_resets_cursor() {
        let mut state = PlaybackState::new(tokens(&["A", "B", "C"]));
        state.play();
        for _ in 0..4 {
            state.advance();
        }
        assert_eq!(state.cursor(), 1);
        assert_eq!(state.phase(), PlaybackPhase::Release);

        assert!(state.restart(tokens(&["X", "Y"])));
        assert_eq!(state.cursor(), 0);
        assert_eq!(state.phase(), PlaybackPhase::Attack);
        assert_eq!(state.current_token(), Some("X"));
        assert_eq!(state.tokens(), tokens(&["X", "Y"]).as_slice());
    }

    #[test]
    fn test_restart_with_empty_sequence_keeps_run() {
        let mut state = PlaybackState::new(tokens(&["A", "B"]));
        state.play();
        state.advance();
        let before = state.clone();
        assert!(!state.restart(Vec::new()));
        assert_eq!(state, before);
    }

    #[test]
    fn test_single_token_run() {
        let mut state = PlaybackState::new(tokens(&["HELLO"]));
        state.play();
        assert_eq!(state.advance(), PlaybackPhase::Release);
        assert_eq!(state.advance(), PlaybackPhase::Gap);
        assert_eq!(state.advance(), PlaybackPhase::Done);
        assert_eq!(state.cursor(), 0);
        assert_eq!(state.advance(), PlaybackPhase::Idle);
    }

    #[test]
    fn test_reset() {
        let mut state = PlaybackState::new(tokens(&["A", "B"]));
        state.play();
        for _ in 0..3 {
            state.advance();
        }
        state.reset();
        assert_eq!(state.phase(), PlaybackPhase::Idle);
        assert_eq!(state.cursor(), 0);
        assert!(!state.is_running());
    }

    #[test]
    fn test_timing_defaults_and_holds() {
        let timing = PlaybackTiming::default();
        assert_eq!(timing.hold(PlaybackPhase::Attack), Some(Duration::from_millis(300)));
        assert_eq!(timing.hold(PlaybackPhase::Release), Some(Duration::from_millis(200)));
        assert_eq!(timing.hold(PlaybackPhase::Gap), Some(Duration::from_millis(500)));
        assert_eq!(timing.hold(PlaybackPhase::Done), None);
        assert_eq!(timing.hold(PlaybackPhase::Idle), None);
        assert_eq!(timing.per_token(), Duration::from_secs(1));
        assert_eq!(timing.total(3), Duration::from_secs(3));
    }

    #[test]
    fn test_total_saturates_for_huge_counts() {
        let timing = PlaybackTiming::default();
        let ceiling = Duration::from_secs(u64::from(u32::MAX));
        assert_eq!(timing.total(u32::MAX as usize), ceiling);
        assert_eq!(timing.total(usize::MAX), ceiling);
    }

    #[test]
    fn test_timing_from_config() {
        let config = PlaybackConfig {
            attack_ms: 100,
            release_ms: 50,
            gap_ms: 25,
        };
        let timing = PlaybackTiming::from(&config);
        assert_eq!(timing.per_token(), Duration::from_millis(175));
    }
}
