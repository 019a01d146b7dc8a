use std::time::Duration;

use anyhow::Result;
use metrics::{counter, gauge, histogram};

/// Metrics collection for store operations and preference inference
#[derive(Debug, Clone, Copy)]
pub struct MetricsCollector {
    // Store metrics
    pub visits_recorded_total: &'static str,
    pub store_operations_total: &'static str,
    pub store_operation_duration: &'static str,
    pub visits_returned: &'static str,

    // Aggregation metrics
    pub preference_computations_total: &'static str,
    pub preference_computation_duration: &'static str,
    pub preference_categories: &'static str,

    // Export metrics
    pub export_operations_total: &'static str,
    pub export_duration: &'static str,

    // Error metrics
    pub errors_total: &'static str,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self {
            visits_recorded_total: "checkin_history_visits_recorded_total",
            store_operations_total: "checkin_history_store_operations_total",
            store_operation_duration: "checkin_history_store_operation_duration_seconds",
            visits_returned: "checkin_history_visits_returned",

            preference_computations_total: "checkin_history_preference_computations_total",
            preference_computation_duration: "checkin_history_preference_computation_duration_seconds",
            preference_categories: "checkin_history_preference_categories",

            export_operations_total: "checkin_history_export_operations_total",
            export_duration: "checkin_history_export_duration_seconds",

            errors_total: "checkin_history_errors_total",
        }
    }
}

impl MetricsCollector {
    /// Install the global recorder
    ///
    /// The no-op recorder keeps macro call sites cheap until an exporter
    /// is wired in by the embedding service.
    pub fn init() -> Result<()> {
        metrics::set_global_recorder(metrics::NoopRecorder)
            .map_err(|_| anyhow::anyhow!("Metrics recorder already installed"))?;
        Ok(())
    }

    /// Record a store operation
    pub fn record_store_operation(&self, operation: &'static str, duration: Duration, success: bool) {
        let status = if success { "success" } else { "error" };

        counter!(self.store_operations_total, "operation" => operation, "status" => status)
            .increment(1);
        histogram!(self.store_operation_duration, "operation" => operation)
            .record(duration.as_secs_f64());

        if !success {
            counter!(self.errors_total, "type" => "store", "operation" => operation).increment(1);
        }
    }

    /// Record an appended visit
    pub fn record_visit_recorded(&self) {
        counter!(self.visits_recorded_total).increment(1);
    }

    /// Record the size of a returned history
    pub fn record_history_size(&self, count: usize) {
        histogram!(self.visits_returned).record(count as f64);
    }

    /// Record a preference aggregation
    pub fn record_preference_computation(&self, categories: usize, duration: Duration) {
        counter!(self.preference_computations_total).increment(1);
        histogram!(self.preference_computation_duration).record(duration.as_secs_f64());
        gauge!(self.preference_categories).set(categories as f64);
    }

    /// Record an export operation
    pub fn record_export(&self, format: &'static str, duration: Duration) {
        counter!(self.export_operations_total, "format" => format).increment(1);
        histogram!(self.export_duration).record(duration.as_secs_f64());
    }

    /// Record an error
    pub fn record_error(&self, error_type: &'static str, operation: &'static str) {
        counter!(self.errors_total, "type" => error_type, "operation" => operation).increment(1);
    }
}

/// Timing wrapper that reports a store operation on completion
pub struct MetricsTimer {
    collector: MetricsCollector,
    operation: &'static str,
    start: std::time::Instant,
}

impl MetricsTimer {
    #[must_use]
    pub fn new(collector: MetricsCollector, operation: &'static str) -> Self {
        Self {
            collector,
            operation,
            start: std::time::Instant::now(),
        }
    }

    pub fn finish(self, success: bool) {
        let duration = self.start.elapsed();
        self.collector
            .record_store_operation(self.operation, duration, success);
    }
}
