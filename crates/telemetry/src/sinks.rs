// Path: crates/telemetry/src/sinks.rs
//! Defines abstract traits for metrics reporting, decoupling the driver from the backend.

use once_cell::sync::OnceCell;

// --- Static Sink Access ---

/// A no-op sink for use in tests or when telemetry is disabled.
#[derive(Debug, Clone, Copy)]
pub struct NopSink;

/// A lazily-initialized static reference to the global `MetricsSink` implementation.
pub static SINK: OnceCell<&'static dyn MetricsSink> = OnceCell::new();
static NOP_SINK: NopSink = NopSink;

/// Returns a static reference to the configured poll metrics sink.
/// If no sink has been initialized, it returns a no-op sink.
pub fn poll_metrics() -> &'static dyn PollMetricsSink {
    match SINK.get() {
        Some(sink) => sink.as_poll(),
        None => &NOP_SINK,
    }
}

/// Returns a static reference to the configured lifecycle metrics sink.
/// If no sink has been initialized, it returns a no-op sink.
pub fn lifecycle_metrics() -> &'static dyn LifecycleMetricsSink {
    match SINK.get() {
        Some(sink) => sink.as_lifecycle(),
        None => &NOP_SINK,
    }
}

/// Returns a static reference to the configured error metrics sink.
/// If no sink has been initialized, it returns a no-op sink.
pub fn error_metrics() -> &'static dyn ErrorMetricsSink {
    match SINK.get() {
        Some(sink) => sink.as_error(),
        None => &NOP_SINK,
    }
}

// --- Trait Definitions ---

/// A sink for metrics related to the condition poller.
pub trait PollMetricsSink: Send + Sync + std::fmt::Debug {
    /// Increments the counter of predicate evaluations.
    fn inc_poll_evaluations(&self);
    /// Increments a counter of finished polls, labeled by outcome
    /// (`met`, `timeout`, `cancelled`, `error`).
    fn inc_poll_outcome(&self, outcome: &'static str);
}
impl PollMetricsSink for NopSink {
    fn inc_poll_evaluations(&self) {}
    fn inc_poll_outcome(&self, _outcome: &'static str) {}
}

/// A sink for metrics related to whole upgrade scenarios.
pub trait LifecycleMetricsSink: Send + Sync + std::fmt::Debug {
    /// Observes how long a lifecycle stage took, labeled by stage.
    fn observe_stage_duration(&self, stage: &'static str, duration_secs: f64);
    /// Increments a counter of finished scenarios, labeled by the failing stage or `passed`.
    fn inc_scenario_outcome(&self, outcome: &str);
}
impl LifecycleMetricsSink for NopSink {
    fn observe_stage_duration(&self, _stage: &'static str, _duration_secs: f64) {}
    fn inc_scenario_outcome(&self, _outcome: &str) {}
}

/// A sink for recording structured error metrics.
pub trait ErrorMetricsSink: Send + Sync + std::fmt::Debug {
    /// Increments a counter for a specific error, categorized by its kind and code.
    fn inc_error(&self, kind: &'static str, code: &'static str);
}
impl ErrorMetricsSink for NopSink {
    fn inc_error(&self, _kind: &'static str, _code: &'static str) {}
}

/// A unified sink that implements all domain-specific traits, providing a single
/// point of implementation for metrics backends like Prometheus.
pub trait MetricsSink: PollMetricsSink + LifecycleMetricsSink + ErrorMetricsSink {
    /// Views this sink as a poll metrics sink.
    fn as_poll(&self) -> &dyn PollMetricsSink;
    /// Views this sink as a lifecycle metrics sink.
    fn as_lifecycle(&self) -> &dyn LifecycleMetricsSink;
    /// Views this sink as an error metrics sink.
    fn as_error(&self) -> &dyn ErrorMetricsSink;
}

// Blanket implementation to allow any type that implements all sub-traits
// to be used as a `MetricsSink`.
impl<T> MetricsSink for T
where
    T: PollMetricsSink + LifecycleMetricsSink + ErrorMetricsSink,
{
    fn as_poll(&self) -> &dyn PollMetricsSink {
        self
    }
    fn as_lifecycle(&self) -> &dyn LifecycleMetricsSink {
        self
    }
    fn as_error(&self) -> &dyn ErrorMetricsSink {
        self
    }
}
