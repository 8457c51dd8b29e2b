//! Timed driver for the playback state machine.
//!
//! Each play request gets a run number and one background task that sleeps
//! through the phase holds on the injected clock. A new request aborts the
//! previous task before starting over, and every state write checks the run
//! number, so a superseded schedule can neither sleep on nor publish.
//! Requires a tokio runtime.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use nanban_core::clock::{Clock, TokioClock};

use crate::state::{PlaybackPhase, PlaybackState, PlaybackTiming};

const EVENT_CAPACITY: usize = 64;

/// A phase change published by the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackEvent {
    /// Run number of the play request that produced the event.
    pub run: u64,
    pub phase: PlaybackPhase,
    pub cursor: usize,
    /// Token on screen during Attack, Release and Gap.
    pub token: Option<String>,
}

impl PlaybackEvent {
    fn from_state(run: u64, state: &PlaybackState) -> Self {
        Self {
            run,
            phase: state.phase(),
            cursor: state.cursor(),
            token: state.current_token().map(str::to_string),
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    state: PlaybackState,
    run: u64,
    task: Option<JoinHandle<()>>,
}

/// Plays gloss sequences token by token.
pub struct PlaybackScheduler<C: Clock = TokioClock> {
    clock: Arc<C>,
    timing: PlaybackTiming,
    inner: Arc<Mutex<Inner>>,
    events: broadcast::Sender<PlaybackEvent>,
}

impl<C: Clock> std::fmt::Debug for PlaybackScheduler<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = lock(&self.inner);
        f.debug_struct("PlaybackScheduler")
            .field("timing", &self.timing)
            .field("run", &inner.run)
            .field("state", &inner.state)
            .finish()
    }
}

impl Default for PlaybackScheduler<TokioClock> {
    fn default() -> Self {
        Self::new(PlaybackTiming::default())
    }
}

impl PlaybackScheduler<TokioClock> {
    /// Create an idle scheduler timed by the tokio clock.
    pub fn new(timing: PlaybackTiming) -> Self {
        Self::with_clock(timing, TokioClock)
    }
}

impl<C: Clock> PlaybackScheduler<C> {
    /// Create an idle scheduler timed by the given clock.
    pub fn with_clock(timing: PlaybackTiming, clock: C) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            clock: Arc::new(clock),
            timing,
            inner: Arc::new(Mutex::new(Inner::default())),
            events,
        }
    }

    pub fn timing(&self) -> PlaybackTiming {
        self.timing
    }

    /// Receive every phase change from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.events.subscribe()
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> PlaybackState {
        lock(&self.inner).state.clone()
    }

    pub fn is_playing(&self) -> bool {
        lock(&self.inner).state.is_running()
    }

    /// Start playing `tokens` from the first token.
    ///
    /// Supersedes a run in progress. An empty sequence is ignored and
    /// returns `false`.
    pub fn play(&self, tokens: Vec<String>) -> bool {
        if tokens.is_empty() {
            tracing::debug!("Ignoring play request for an empty gloss sequence");
            return false;
        }

        let mut inner = lock(&self.inner);
        if let Some(task) = inner.task.take() {
            task.abort();
            tracing::info!(run = inner.run, "Playback superseded");
        }

        inner.run += 1;
        let run = inner.run;
        inner.state.restart(tokens);
        tracing::info!(run, tokens = inner.state.tokens().len(), "Playback started");
        let _ = self
            .events
            .send(PlaybackEvent::from_state(run, &inner.state));

        inner.task = Some(tokio::spawn(drive(
            run,
            Arc::clone(&self.inner),
            Arc::clone(&self.clock),
            self.timing,
            self.events.clone(),
        )));
        true
    }

    /// Abandon the current run and return to Idle.
    pub fn stop(&self) {
        let mut inner = lock(&self.inner);
        let Some(task) = inner.task.take() else {
            return;
        };
        task.abort();
        inner.run += 1;
        inner.state.reset();
        tracing::info!(run = inner.run, "Playback stopped");
        let _ = self
            .events
            .send(PlaybackEvent::from_state(inner.run, &inner.state));
    }
}

impl<C: Clock> Drop for PlaybackScheduler<C> {
    fn drop(&mut self) {
        if let Some(task) = lock(&self.inner).task.take() {
            task.abort();
        }
    }
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Step one run through its phases until it returns to Idle or is superseded.
async fn drive<C: Clock>(
    run: u64,
    inner: Arc<Mutex<Inner>>,
    clock: Arc<C>,
    timing: PlaybackTiming,
    events: broadcast::Sender<PlaybackEvent>,
) {
    loop {
        let hold = {
            let guard = lock(&inner);
            if guard.run != run {
                return;
            }
            timing.hold(guard.state.phase())
        };

        if let Some(duration) = hold {
            clock.sleep(duration).await;
        }

        let finished = {
            let mut guard = lock(&inner);
            if guard.run != run {
                return;
            }
            let phase = guard.state.advance();
            tracing::debug!(run, phase = %phase, cursor = guard.state.cursor(), "Playback phase");
            let _ = events.send(PlaybackEvent::from_state(run, &guard.state));
            if phase == PlaybackPhase::Idle {
                guard.task = None;
                true
            } else {
                false
            }
        };

        if finished {
            tracing::info!(run, "Playback finished");
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use tokio::time::Instant;

    fn tokens(items: &[&str]) -> Vec<String> {
        items.iter().map(|t| t.to_string()).collect()
    }

    /// Collect events of `run` until it returns to Idle, with their offsets from `start`.
    async fn collect_run(
        rx: &mut broadcast::Receiver<PlaybackEvent>,
        run: u64,
        start: Instant,
    ) -> Vec<(PlaybackEvent, Duration)> {
        let mut seen = Vec::new();
        loop {
            let event = rx.recv().await.unwrap();
            assert_eq!(event.run, run, "event from a superseded run: {event:?}");
            let idle = event.phase == PlaybackPhase::Idle;
            seen.push((event, Instant::now() - start));
            if idle {
                return seen;
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_token_schedule() {
        let scheduler = PlaybackScheduler::default();
        let mut rx = scheduler.subscribe();
        let start = Instant::now();

        assert!(scheduler.play(tokens(&["A", "B"])));
        let seen = collect_run(&mut rx, 1, start).await;

        let summary: Vec<(PlaybackPhase, Option<&str>, u64)> = seen
            .iter()
            .map(|(e, at)| (e.phase, e.token.as_deref(), at.as_millis() as u64))
            .collect();
        assert_eq!(
            summary,
            vec![
                (PlaybackPhase::Attack, Some("A"), 0),
                (PlaybackPhase::Release, Some("A"), 300),
                (PlaybackPhase::Gap, Some("A"), 500),
                (PlaybackPhase::Attack, Some("B"), 1000),
                (PlaybackPhase::Release, Some("B"), 1300),
                (PlaybackPhase::Gap, Some("B"), 1500),
                (PlaybackPhase::Done, None, 2000),
                (PlaybackPhase::Idle, None, 2000),
            ]
        );
        for (event, _) in &seen {
            assert!(event.cursor < 2);
        }

        assert!(!scheduler.is_playing());
        assert_eq!(scheduler.snapshot().cursor(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_play_is_noop() {
        let scheduler = PlaybackScheduler::default();
        let mut rx = scheduler.subscribe();
        assert!(!scheduler.play(Vec::new()));
        assert!(!scheduler.is_playing());
        assert!(matches!(
            rx.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_mid_sequence_supersedes() {
        let scheduler = PlaybackScheduler::default();
        let mut rx = scheduler.subscribe();

        scheduler.play(tokens(&["A", "B", "C"]));
        tokio::time::sleep(Duration::from_millis(1100)).await;

        let mid = scheduler.snapshot();
        assert_eq!(mid.cursor(), 1);
        assert_eq!(mid.phase(), PlaybackPhase::Attack);

        // Drain what the first run published so far.
        while let Ok(event) = rx.try_recv() {
            assert_eq!(event.run, 1);
        }

        let restart = Instant::now();
        assert!(scheduler.play(tokens(&["X", "Y"])));
        let restarted = scheduler.snapshot();
        assert_eq!(restarted.cursor(), 0);
        assert_eq!(restarted.phase(), PlaybackPhase::Attack);
        assert_eq!(restarted.current_token(), Some("X"));

        let seen = collect_run(&mut rx, 2, restart).await;
        let labels: Vec<Option<&str>> = seen.iter().map(|(e, _)| e.token.as_deref()).collect();
        assert_eq!(
            labels,
            vec![
                Some("X"),
                Some("X"),
                Some("X"),
                Some("Y"),
                Some("Y"),
                Some("Y"),
                None,
                None
            ]
        );
        assert_eq!(seen.last().unwrap().1, Duration::from_millis(2000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_returns_to_idle_without_further_events() {
        let scheduler = PlaybackScheduler::default();
        let mut rx = scheduler.subscribe();

        scheduler.play(tokens(&["A", "B"]));
        tokio::time::sleep(Duration::from_millis(400)).await;
        scheduler.stop();

        assert!(!scheduler.is_playing());
        assert_eq!(scheduler.snapshot().cursor(), 0);

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        let last = events.last().unwrap();
        assert_eq!(last.phase, PlaybackPhase::Idle);
        assert_eq!(last.run, 2);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(matches!(
            rx.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_when_idle_is_noop() {
        let scheduler = PlaybackScheduler::default();
        let mut rx = scheduler.subscribe();
        scheduler.stop();
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_timing() {
        let scheduler = PlaybackScheduler::new(PlaybackTiming {
            attack: Duration::from_millis(10),
            release: Duration::from_millis(10),
            gap: Duration::from_millis(10),
        });
        let mut rx = scheduler.subscribe();
        let start = Instant::now();
        scheduler.play(tokens(&["A", "B", "C"]));
        let seen = collect_run(&mut rx, 1, start).await;
        assert_eq!(seen.len(), 3 * 3 + 2);
        assert_eq!(seen.last().unwrap().1, Duration::from_millis(90));
    }

    #[tokio::test(start_paused = true)]
    async fn test_can_replay_after_finishing() {
        let scheduler = PlaybackScheduler::default();
        let mut rx = scheduler.subscribe();

        scheduler.play(tokens(&["ONE"]));
        collect_run(&mut rx, 1, Instant::now()).await;

        scheduler.play(tokens(&["TWO"]));
        let seen = collect_run(&mut rx, 2, Instant::now()).await;
        assert_eq!(seen[0].0.token.as_deref(), Some("TWO"));
    }
}
