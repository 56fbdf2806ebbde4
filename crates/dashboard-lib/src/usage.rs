//! CPU and memory percentage computation from raw runtime counters

use crate::models::{RawCounters, ResourceUsage};

/// Round to 2 decimal places, halves toward positive infinity
pub fn round2(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// CPU usage between the two samples, in percent.
///
/// Returns 0 when there was no system-level activity between samples.
pub fn cpu_percent(counters: &RawCounters) -> f64 {
    let cpu_delta = counters.cpu_total_usage as f64 - counters.previous_cpu_total_usage as f64;
    let system_delta =
        counters.system_cpu_usage as f64 - counters.previous_system_cpu_usage as f64;

    let percent = (cpu_delta / system_delta) * counters.online_cpus as f64 * 100.0;
    round2(finite_or_zero(percent))
}

/// Memory usage relative to the container limit, in percent
pub fn memory_percent(counters: &RawCounters) -> f64 {
    let percent = (counters.memory_usage as f64 / counters.memory_limit as f64) * 100.0;
    round2(finite_or_zero(percent))
}

/// Compute normalized usage for one container
pub fn sample(counters: &RawCounters) -> ResourceUsage {
    ResourceUsage {
        cpu: cpu_percent(counters),
        memory: memory_percent(counters),
    }
}
