use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Counters for everything the engine has done since construction.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TickMetrics {
    pub ticks: u64,
    pub occupancy_drifts: u64,
    pub distribution_drifts: u64,
    pub alerts_generated: u64,
    pub connectivity_checks: u64,
    pub commands_applied: u64,
}

pub struct MetricsRecorder {
    inner: Mutex<TickMetrics>,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(TickMetrics::default()),
        }
    }

    pub fn record_tick(&self) {
        self.update(|m| m.ticks += 1);
    }

    pub fn record_pass(&self, pass: &str) {
        self.update(|m| match pass {
            "occupancy" => m.occupancy_drifts += 1,
            "distribution" => m.distribution_drifts += 1,
            "alerts" => m.alerts_generated += 1,
            _ => {}
        });
    }

    pub fn record_connectivity_check(&self) {
        self.update(|m| m.connectivity_checks += 1);
    }

    pub fn record_command(&self) {
        self.update(|m| m.commands_applied += 1);
    }

    pub fn snapshot(&self) -> TickMetrics {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            TickMetrics::default()
        }
    }

    fn update(&self, apply: impl FnOnce(&mut TickMetrics)) {
        if let Ok(mut metrics) = self.inner.lock() {
            apply(&mut metrics);
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_are_counted_by_name() {
        let recorder = MetricsRecorder::new();
        recorder.record_tick();
        recorder.record_pass("occupancy");
        recorder.record_pass("alerts");
        recorder.record_pass("unknown");
        let metrics = recorder.snapshot();
        assert_eq!(metrics.ticks, 1);
        assert_eq!(metrics.occupancy_drifts, 1);
        assert_eq!(metrics.alerts_generated, 1);
        assert_eq!(metrics.distribution_drifts, 0);
    }
}
