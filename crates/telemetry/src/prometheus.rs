//! A concrete implementation of the metrics sinks using the Prometheus crate.

use crate::sinks::*;
use once_cell::sync::OnceCell;
use prometheus::{
    exponential_buckets, register_histogram_vec, register_int_counter, register_int_counter_vec,
    HistogramVec, IntCounter, IntCounterVec,
};

// --- Metric Statics ---
// The collectors are initialized exactly once by `install`.

static POLL_EVALUATIONS_TOTAL: OnceCell<IntCounter> = OnceCell::new();
static POLL_OUTCOMES_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();
static STAGE_DURATION_SECONDS: OnceCell<HistogramVec> = OnceCell::new();
static SCENARIO_OUTCOMES_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();
static ERRORS_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();

#[derive(Debug, Clone, Copy)]
pub struct PrometheusSink;

impl PollMetricsSink for PrometheusSink {
    fn inc_poll_evaluations(&self) {
        if let Some(m) = POLL_EVALUATIONS_TOTAL.get() {
            m.inc();
        }
    }
    fn inc_poll_outcome(&self, outcome: &'static str) {
        if let Some(m) = POLL_OUTCOMES_TOTAL.get() {
            m.with_label_values(&[outcome]).inc();
        }
    }
}

impl LifecycleMetricsSink for PrometheusSink {
    fn observe_stage_duration(&self, stage: &'static str, duration_secs: f64) {
        if let Some(m) = STAGE_DURATION_SECONDS.get() {
            m.with_label_values(&[stage]).observe(duration_secs);
        }
    }
    fn inc_scenario_outcome(&self, outcome: &str) {
        if let Some(m) = SCENARIO_OUTCOMES_TOTAL.get() {
            m.with_label_values(&[outcome]).inc();
        }
    }
}

impl ErrorMetricsSink for PrometheusSink {
    fn inc_error(&self, kind: &'static str, code: &'static str) {
        if let Some(m) = ERRORS_TOTAL.get() {
            m.with_label_values(&[kind, code]).inc();
        }
    }
}

/// Registers all Prometheus collectors and installs the sink globally.
///
/// Calling it a second time fails with a registration error from the default
/// registry and leaves the first installation in place.
pub fn install() -> Result<&'static dyn MetricsSink, prometheus::Error> {
    let evaluations = register_int_counter!(
        "wasmlc_poll_evaluations_total",
        "Total number of poll predicate evaluations."
    )?;
    let poll_outcomes = register_int_counter_vec!(
        "wasmlc_poll_outcomes_total",
        "Finished polls, by outcome.",
        &["outcome"]
    )?;
    let stage_duration = register_histogram_vec!(
        "wasmlc_stage_duration_seconds",
        "Duration of each upgrade lifecycle stage.",
        &["stage"],
        exponential_buckets(0.01, 2.0, 14)?
    )?;
    let scenario_outcomes = register_int_counter_vec!(
        "wasmlc_scenario_outcomes_total",
        "Finished upgrade scenarios, by outcome.",
        &["outcome"]
    )?;
    let errors = register_int_counter_vec!(
        "wasmlc_errors_total",
        "Total number of errors, categorized by kind and code.",
        &["kind", "code"]
    )?;

    // Registration above already rejects a second install, so these cannot be set twice.
    let _ = POLL_EVALUATIONS_TOTAL.set(evaluations);
    let _ = POLL_OUTCOMES_TOTAL.set(poll_outcomes);
    let _ = STAGE_DURATION_SECONDS.set(stage_duration);
    let _ = SCENARIO_OUTCOMES_TOTAL.set(scenario_outcomes);
    let _ = ERRORS_TOTAL.set(errors);

    static PROMETHEUS_SINK: PrometheusSink = PrometheusSink;
    let _ = SINK.set(&PROMETHEUS_SINK);
    Ok(&PROMETHEUS_SINK)
}
