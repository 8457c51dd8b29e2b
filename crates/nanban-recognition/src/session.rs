//! Single-flight recognition session.
//!
//! A session owns at most one in-flight attempt:
//! - `start` while an attempt is active returns `None` immediately (busy,
//!   no queueing, no error);
//! - `stop` marks the session inactive, cancels a pending latency wait and
//!   invalidates the running attempt, whose result is discarded even if the
//!   model still finishes computing it;
//! - model failures are logged and reported as `None`.
//!
//! Distinct sessions share no state and may run concurrently.

use std::sync::{Mutex, MutexGuard};

use tokio::sync::Notify;

use nanban_core::clock::{Clock, TokioClock};

use crate::model::{RecognitionModel, RecognitionOutput};

#[derive(Debug, Default)]
struct SessionState {
    active: bool,
    /// Bumped on every `stop`; an attempt only delivers while its generation is current.
    generation: u64,
}

/// Owner of at-most-one in-flight recognition attempt.
pub struct RecognitionSession<M: RecognitionModel, C: Clock = TokioClock> {
    model: M,
    clock: C,
    state: Mutex<SessionState>,
    cancel: Notify,
}

impl<M: RecognitionModel, C: Clock> std::fmt::Debug for RecognitionSession<M, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecognitionSession")
            .field("kind", &M::KIND)
            .field("state", &*self.lock_state())
            .finish()
    }
}

impl<M: RecognitionModel> RecognitionSession<M, TokioClock> {
    /// Create an inactive session timed by the tokio clock.
    pub fn new(model: M) -> Self {
        Self::with_clock(model, TokioClock)
    }
}

impl<M: RecognitionModel, C: Clock> RecognitionSession<M, C> {
    /// Create an inactive session timed by the given clock.
    pub fn with_clock(model: M, clock: C) -> Self {
        Self {
            model,
            clock,
            state: Mutex::new(SessionState::default()),
            cancel: Notify::new(),
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Whether an attempt is currently in flight.
    pub fn is_active(&self) -> bool {
        self.lock_state().active
    }

    /// Run one recognition attempt.
    ///
    /// Returns `None` when the session is already busy, when the attempt is
    /// stopped, when the model fails, or when the model recognized nothing.
    pub async fn start(&self, input: &M::Input) -> Option<M::Output> {
        let Some(generation) = self.try_begin() else {
            tracing::debug!(kind = M::KIND, "Recognition session busy, start ignored");
            return None;
        };
        let _attempt = AttemptGuard {
            state: &self.state,
            generation,
        };
        let started = self.clock.now();
        tracing::info!(kind = M::KIND, generation, "Recognition attempt started");

        // Register for the wakeup before looking at the state again, so a stop
        // landing after `try_begin` is either seen here or wakes the wait.
        let cancelled = self.cancel.notified();
        tokio::pin!(cancelled);
        cancelled.as_mut().enable();
        if !self.is_current(generation) {
            tracing::info!(kind = M::KIND, generation, "Recognition stopped before waiting");
            return None;
        }

        let latency = self.model.latency();
        if !latency.is_zero() {
            tokio::select! {
                _ = self.clock.sleep(latency) => {}
                _ = &mut cancelled => {
                    tracing::info!(kind = M::KIND, generation, "Recognition stopped while waiting");
                    return None;
                }
            }
        }

        if !self.is_current(generation) {
            return None;
        }

        let outcome = self.model.recognize(input).await;

        if !self.is_current(generation) {
            tracing::debug!(
                kind = M::KIND,
                generation,
                "Discarding result of a stopped recognition attempt"
            );
            return None;
        }

        let elapsed_ms = (self.clock.now() - started).as_millis() as u64;
        match outcome {
            Ok(output) => {
                let output = output.finalize();
                tracing::info!(
                    kind = M::KIND,
                    elapsed_ms,
                    recognized = output.is_some(),
                    "Recognition attempt finished"
                );
                output
            }
            Err(e) => {
                tracing::warn!(
                    kind = M::KIND,
                    elapsed_ms,
                    error = %e,
                    "Recognition attempt failed"
                );
                None
            }
        }
    }

    /// Mark the session inactive and drop any forthcoming result.
    ///
    /// A pending latency wait is woken and abandoned. A model call already
    /// running is not aborted, but its result is never delivered.
    pub fn stop(&self) {
        let mut state = self.lock_state();
        if !state.active {
            return;
        }
        state.active = false;
        state.generation += 1;
        drop(state);

        self.cancel.notify_waiters();
        tracing::info!(kind = M::KIND, "Recognition session stopped");
    }

    fn try_begin(&self) -> Option<u64> {
        let mut state = self.lock_state();
        if state.active {
            return None;
        }
        state.active = true;
        Some(state.generation)
    }

    fn is_current(&self, generation: u64) -> bool {
        let state = self.lock_state();
        state.active && state.generation == generation
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        lock(&self.state)
    }
}

fn lock(state: &Mutex<SessionState>) -> MutexGuard<'_, SessionState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Returns the session to inactive when an attempt ends, including when the
/// caller drops the `start` future. A stopped attempt leaves the flag alone,
/// since a newer attempt may own it by then.
struct AttemptGuard<'a> {
    state: &'a Mutex<SessionState>,
    generation: u64,
}

impl Drop for AttemptGuard<'_> {
    fn drop(&mut self) {
        let mut state = lock(self.state);
        if state.generation == self.generation {
            state.active = false;
        }
    }
}
