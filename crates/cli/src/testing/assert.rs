// Path: crates/cli/src/testing/assert.rs

use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{interval_at, sleep_until, Instant, MissedTickBehavior};
use wasmlc_telemetry::poll_metrics;
use wasmlc_types::error::PollError;

/// The result of a poll whose condition was met.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Satisfied<T> {
    /// The value the condition produced.
    pub value: T,
    /// How many times the condition was evaluated, including the successful one.
    pub evaluations: u32,
    /// Time from the start of the poll to the successful evaluation.
    pub elapsed: Duration,
}

/// Evaluates an async condition on a fixed schedule until it holds or time runs out.
///
/// The first evaluation happens one `interval` after the poll starts, and
/// later ones on the grid `start + n * interval`. Ticks missed because the
/// condition was slow are skipped rather than bunched. A tick that lands
/// exactly on the deadline is still evaluated, so a condition that first holds
/// on its k-th evaluation is met iff `k * interval <= timeout`.
///
/// Each evaluation races the deadline and the shutdown signal, so a condition
/// that hangs cannot hold the poll open. Only the evaluation started on the
/// last tick may outlive the deadline, and by at most one interval.
#[derive(Debug)]
pub struct Poller {
    description: String,
    timeout: Duration,
    interval: Duration,
    shutdown: Option<watch::Receiver<bool>>,
}

impl Poller {
    /// Creates a poller. `description` only appears in logs and errors.
    pub fn new(description: impl Into<String>, timeout: Duration, interval: Duration) -> Self {
        Self {
            description: description.into(),
            timeout,
            interval,
            shutdown: None,
        }
    }

    /// Stops polling with [`PollError::Cancelled`] as soon as `shutdown` reads `true`.
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Polls `condition` until it yields `Some`, returns an error, the deadline
    /// passes, or shutdown is signalled.
    ///
    /// An error from `condition` ends the poll immediately and is returned
    /// unmodified inside [`PollError::Condition`]; it is never retried.
    pub async fn poll<F, Fut, T, E>(mut self, mut condition: F) -> Result<Satisfied<T>, PollError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Option<T>, E>>,
    {
        if self.timeout.is_zero() || self.interval.is_zero() || self.interval > self.timeout {
            return Err(PollError::InvalidSchedule {
                timeout: self.timeout,
                interval: self.interval,
            });
        }

        let start = Instant::now();
        let deadline_at = start + self.timeout;
        let deadline = sleep_until(deadline_at);
        tokio::pin!(deadline);
        let mut ticker = interval_at(start + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut evaluations = 0u32;

        loop {
            tokio::select! {
                biased;
                _ = shutdown_requested(&mut self.shutdown) => {
                    return Err(self.cancelled(start, evaluations));
                }
                _ = ticker.tick() => {
                    let tick_at = Instant::now();
                    // A tick missed by a slow condition fires late; never evaluate past the deadline.
                    if tick_at > deadline_at {
                        return Err(self.timed_out(start, evaluations));
                    }
                    evaluations += 1;
                    poll_metrics().inc_poll_evaluations();
                    // Evaluations stop at the deadline; one started on the last tick gets a full interval.
                    let cutoff = deadline_at.max(tick_at + self.interval);
                    let evaluation = tokio::select! {
                        biased;
                        _ = shutdown_requested(&mut self.shutdown) => {
                            return Err(self.cancelled(start, evaluations));
                        }
                        result = condition() => result,
                        _ = sleep_until(cutoff) => {
                            return Err(self.timed_out(start, evaluations));
                        }
                    };
                    match evaluation {
                        Ok(Some(value)) => {
                            poll_metrics().inc_poll_outcome("met");
                            let elapsed = start.elapsed();
                            tracing::debug!(
                                target: "poll",
                                description = %self.description,
                                evaluations,
                                elapsed_ms = elapsed.as_millis() as u64,
                                "Condition met"
                            );
                            return Ok(Satisfied { value, evaluations, elapsed });
                        }
                        Ok(None) => {
                            log::trace!(
                                "Condition '{}' not met after {} evaluations",
                                self.description,
                                evaluations
                            );
                        }
                        Err(e) => {
                            poll_metrics().inc_poll_outcome("error");
                            return Err(PollError::Condition(e));
                        }
                    }
                }
                _ = &mut deadline => {
                    return Err(self.timed_out(start, evaluations));
                }
            }
        }
    }

    fn cancelled<E>(self, start: Instant, evaluations: u32) -> PollError<E> {
        poll_metrics().inc_poll_outcome("cancelled");
        tracing::warn!(
            target: "poll",
            description = %self.description,
            evaluations,
            "Polling cancelled"
        );
        PollError::Cancelled {
            description: self.description,
            elapsed: start.elapsed(),
        }
    }

    fn timed_out<E>(self, start: Instant, evaluations: u32) -> PollError<E> {
        poll_metrics().inc_poll_outcome("timeout");
        let elapsed = start.elapsed();
        tracing::warn!(
            target: "poll",
            description = %self.description,
            evaluations,
            elapsed_ms = elapsed.as_millis() as u64,
            "Timed out waiting for condition"
        );
        PollError::Timeout {
            description: self.description,
            elapsed,
            evaluations,
        }
    }
}

/// Resolves once the shutdown flag reads `true`. Never resolves without a
/// receiver, or after the sender is dropped while the flag is still `false`.
async fn shutdown_requested(shutdown: &mut Option<watch::Receiver<bool>>) {
    let Some(rx) = shutdown else {
        return std::future::pending().await;
    };
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            return std::future::pending().await;
        }
    }
}

// --- Polling Helpers ---

/// Generic polling function that waits for an async condition to produce a value.
pub async fn wait_for<F, Fut, T, E>(
    description: &str,
    interval: Duration,
    timeout: Duration,
    condition: F,
) -> Result<T, PollError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, E>>,
{
    Poller::new(description, timeout, interval)
        .poll(condition)
        .await
        .map(|satisfied| satisfied.value)
}

/// Waits until an async predicate returns `true`.
pub async fn wait_for_condition<F, Fut, E>(
    timeout: Duration,
    interval: Duration,
    mut predicate: F,
) -> Result<(), PollError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, E>>,
{
    Poller::new("condition", timeout, interval)
        .poll(|| {
            let evaluation = predicate();
            async move { evaluation.await.map(|met| met.then_some(())) }
        })
        .await
        .map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_first_evaluation_waits_one_interval() {
        let start = Instant::now();
        let satisfied = Poller::new("immediate", Duration::from_secs(10), Duration::from_secs(2))
            .poll(|| async { Ok::<_, ()>(Some(())) })
            .await
            .unwrap();
        assert_eq!(satisfied.evaluations, 1);
        assert_eq!(start.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_schedule_never_evaluates() {
        let calls = AtomicU32::new(0);
        for (timeout, interval) in [(0, 1), (1, 0), (1, 2)] {
            let err = wait_for_condition(
                Duration::from_secs(timeout),
                Duration::from_secs(interval),
                || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, ()>(true)
                },
            )
            .await
            .unwrap_err();
            assert!(matches!(err, PollError::InvalidSchedule { .. }));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_condition_skips_missed_ticks() {
        let calls = AtomicU32::new(0);
        let err = Poller::new("slow", Duration::from_secs(10), Duration::from_secs(1))
            .poll(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(2500)).await;
                Ok::<Option<()>, ()>(None)
            })
            .await
            .unwrap_err();
        // One missed tick fires as soon as the previous evaluation returns: 1s, 3.5s, 6s, 8.5s.
        match err {
            PollError::Timeout { evaluations, .. } => assert_eq!(evaluations, 4),
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }
}
