//! Observability for the dashboard
//!
//! Provides:
//! - Prometheus metrics (runtime latency, inventory sizes, savings, failures)
//! - Structured JSON logging of significant events with tracing

use prometheus::{
    register_gauge, register_histogram, register_int_counter, register_int_counter_vec,
    register_int_gauge, Gauge, Histogram, IntCounter, IntCounterVec, IntGauge,
};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Histogram buckets for runtime query latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

static GLOBAL_METRICS: OnceLock<DashboardMetricsInner> = OnceLock::new();

struct DashboardMetricsInner {
    runtime_query_latency_seconds: Histogram,
    containers_listed: IntGauge,
    idle_containers: IntGauge,
    potential_monthly_savings: Gauge,
    stats_failures: IntCounter,
    container_actions: IntCounterVec,
}

impl DashboardMetricsInner {
    fn new() -> Self {
        Self {
            runtime_query_latency_seconds: register_histogram!(
                "container_dashboard_runtime_query_latency_seconds",
                "Time spent enumerating containers and sampling their stats",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register runtime_query_latency_seconds"),

            containers_listed: register_int_gauge!(
                "container_dashboard_containers_listed",
                "Number of containers returned by the last inventory scan"
            )
            .expect("Failed to register containers_listed"),

            idle_containers: register_int_gauge!(
                "container_dashboard_idle_containers",
                "Number of running containers flagged for optimization"
            )
            .expect("Failed to register idle_containers"),

            potential_monthly_savings: register_gauge!(
                "container_dashboard_potential_monthly_savings_inr",
                "Monthly savings from stopping every suggested container"
            )
            .expect("Failed to register potential_monthly_savings"),

            stats_failures: register_int_counter!(
                "container_dashboard_stats_failures_total",
                "Containers skipped because their stats could not be read"
            )
            .expect("Failed to register stats_failures"),

            container_actions: register_int_counter_vec!(
                "container_dashboard_container_actions_total",
                "Start/stop requests by action and outcome",
                &["action", "outcome"]
            )
            .expect("Failed to register container_actions"),
        }
    }
}

/// Handle to the process-wide Prometheus metrics.
///
/// Clones share the same underlying metrics.
#[derive(Clone)]
pub struct DashboardMetrics {
    _private: (),
}

impl Default for DashboardMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardMetrics {
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(DashboardMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &DashboardMetricsInner {
        GLOBAL_METRICS.get_or_init(DashboardMetricsInner::new)
    }

    pub fn observe_runtime_latency(&self, duration_secs: f64) {
        self.inner()
            .runtime_query_latency_seconds
            .observe(duration_secs);
    }

    pub fn set_containers_listed(&self, count: i64) {
        self.inner().containers_listed.set(count);
    }

    pub fn set_idle_containers(&self, count: i64) {
        self.inner().idle_containers.set(count);
    }

    pub fn set_potential_monthly_savings(&self, amount: f64) {
        self.inner().potential_monthly_savings.set(amount);
    }

    pub fn inc_stats_failures(&self) {
        self.inner().stats_failures.inc();
    }

    pub fn inc_container_action(&self, action: &str, success: bool) {
        let outcome = if success { "success" } else { "failure" };
        self.inner()
            .container_actions
            .with_label_values(&[action, outcome])
            .inc();
    }
}

/// Structured logger for dashboard events
#[derive(Clone)]
pub struct StructuredLogger {
    host: String,
}

impl StructuredLogger {
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }

    pub fn log_startup(&self, version: &str, bind_addr: &str) {
        info!(
            event = "dashboard_started",
            host = %self.host,
            version = %version,
            bind_addr = %bind_addr,
            "Container dashboard started"
        );
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "dashboard_shutdown",
            host = %self.host,
            reason = %reason,
            "Container dashboard shutting down"
        );
    }

    pub fn log_container_action(&self, container_id: &str, action: &str, error: Option<&str>) {
        match error {
            None => info!(
                event = "container_action",
                host = %self.host,
                container_id = %container_id,
                action = %action,
                success = true,
                "Container action completed"
            ),
            Some(error) => warn!(
                event = "container_action",
                host = %self.host,
                container_id = %container_id,
                action = %action,
                success = false,
                error = %error,
                "Container action failed"
            ),
        }
    }

    pub fn log_container_skipped(&self, container_id: &str, error: &str) {
        warn!(
            event = "container_skipped",
            host = %self.host,
            container_id = %container_id,
            error = %error,
            "Skipping container, stats unavailable"
        );
    }

    pub fn log_suggestions(&self, count: usize, monthly_savings: f64, currency: &str) {
        info!(
            event = "suggestions_generated",
            host = %self.host,
            suggestions = count,
            monthly_savings = monthly_savings,
            currency = %currency,
            "Generated optimization suggestions"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_metrics_can_be_recorded() {
        // Metrics live in the global Prometheus registry, so handles are shared.
        let metrics = DashboardMetrics::new();
        let other = metrics.clone();

        metrics.observe_runtime_latency(0.02);
        metrics.set_containers_listed(3);
        metrics.set_idle_containers(1);
        metrics.set_potential_monthly_savings(2664.0);
        other.inc_stats_failures();
        other.inc_container_action("stop", true);
        other.inc_container_action("start", false);

        let families = prometheus::gather();
        assert!(families
            .iter()
            .any(|f| f.get_name() == "container_dashboard_containers_listed"));
    }

    #[test]
    fn test_structured_logger_creation() {
        let logger = StructuredLogger::new("test-host");
        assert_eq!(logger.host, "test-host");
    }
}
