// Path: crates/telemetry/src/time.rs
use crate::sinks::LifecycleMetricsSink;
use std::time::Instant;

/// Reports the time between its creation and its drop as the duration of `stage`.
pub struct StageTimer<'a> {
    sink: &'a dyn LifecycleMetricsSink,
    stage: &'static str,
    start: Instant,
}

impl<'a> StageTimer<'a> {
    pub fn new(sink: &'a dyn LifecycleMetricsSink, stage: &'static str) -> Self {
        Self {
            sink,
            stage,
            start: Instant::now(),
        }
    }
}

impl Drop for StageTimer<'_> {
    fn drop(&mut self) {
        self.sink
            .observe_stage_duration(self.stage, self.start.elapsed().as_secs_f64());
    }
}
