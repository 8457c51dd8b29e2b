//! Timer abstraction shared by the recognition sessions and the playback
//! scheduler.
//!
//! Every delay in the core goes through a [`Clock`] so it can be cancelled by
//! dropping the returned future, and so tests can run against tokio's paused
//! (logical) time instead of waiting on the wall clock.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

/// Source of time and cancellable delays.
pub trait Clock: Send + Sync + 'static {
    /// Current instant on this clock.
    fn now(&self) -> Instant;

    /// Complete after `duration` has elapsed on this clock.
    ///
    /// Dropping the returned future cancels the wait; no callback outlives it.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Clock backed by the tokio timer wheel.
///
/// Under `#[tokio::test(start_paused = true)]` this behaves as a logical
/// clock that auto-advances whenever the runtime is idle.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_sleep_advances_logical_time() {
        let clock = TokioClock;
        let before = clock.now();
        clock.sleep(Duration::from_millis(1500)).await;
        assert_eq!(clock.now() - before, Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_sleep_is_cancelled() {
        let clock = TokioClock;
        let before = clock.now();
        let outcome = tokio::time::timeout(
            Duration::from_millis(100),
            clock.sleep(Duration::from_secs(10)),
        )
        .await;
        assert!(outcome.is_err());
        assert_eq!(clock.now() - before, Duration::from_millis(100));
    }
}
