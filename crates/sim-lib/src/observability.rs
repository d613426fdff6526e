//! Observability infrastructure for the load simulator
//!
//! Provides:
//! - Prometheus metrics (samples generated, emission outcomes, last value, tick latency)
//! - Structured JSON logging with tracing

use prometheus::{
    register_histogram, register_int_counter, register_int_gauge, Encoder, Histogram, IntCounter,
    IntGauge, TextEncoder,
};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Histogram buckets for the per-tick emission latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[0.001, 0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<SimulatorMetricsInner> = OnceLock::new();

struct SimulatorMetricsInner {
    samples_generated: IntCounter,
    emit_success: IntCounter,
    emit_failures: IntCounter,
    runs_interrupted: IntCounter,
    last_sample_value: IntGauge,
    emit_latency_seconds: Histogram,
}

impl SimulatorMetricsInner {
    fn new() -> Self {
        Self {
            samples_generated: register_int_counter!(
                "load_simulator_samples_generated_total",
                "Total number of synthetic utilization samples generated"
            )
            .expect("Failed to register samples_generated"),

            emit_success: register_int_counter!(
                "load_simulator_emit_success_total",
                "Total number of samples accepted by the metrics sink"
            )
            .expect("Failed to register emit_success"),

            emit_failures: register_int_counter!(
                "load_simulator_emit_failures_total",
                "Total number of samples the metrics sink failed to accept"
            )
            .expect("Failed to register emit_failures"),

            runs_interrupted: register_int_counter!(
                "load_simulator_runs_interrupted_total",
                "Total number of simulation runs stopped by an interrupt"
            )
            .expect("Failed to register runs_interrupted"),

            last_sample_value: register_int_gauge!(
                "load_simulator_last_sample_percent",
                "Value of the most recently generated sample"
            )
            .expect("Failed to register last_sample_value"),

            emit_latency_seconds: register_histogram!(
                "load_simulator_emit_latency_seconds",
                "Time spent handing one sample to the metrics sink",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register emit_latency_seconds"),
        }
    }
}

/// Simulator metrics for Prometheus exposition
///
/// Lightweight handle to the global metrics instance; clones share it.
#[derive(Clone)]
pub struct SimulatorMetrics {
    _private: (),
}

impl Default for SimulatorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatorMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(SimulatorMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &SimulatorMetricsInner {
        GLOBAL_METRICS.get_or_init(SimulatorMetricsInner::new)
    }

    /// Record a freshly generated sample
    pub fn record_sample(&self, value: u32) {
        self.inner().samples_generated.inc();
        self.inner().last_sample_value.set(i64::from(value));
    }

    pub fn inc_emit_success(&self) {
        self.inner().emit_success.inc();
    }

    pub fn inc_emit_failures(&self) {
        self.inner().emit_failures.inc();
    }

    pub fn inc_runs_interrupted(&self) {
        self.inner().runs_interrupted.inc();
    }

    pub fn observe_emit_latency(&self, duration_secs: f64) {
        self.inner().emit_latency_seconds.observe(duration_secs);
    }

    pub fn samples_generated(&self) -> u64 {
        self.inner().samples_generated.get()
    }

    pub fn emit_failures(&self) -> u64 {
        self.inner().emit_failures.get()
    }

    /// Render the default registry in the Prometheus text format
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();

        if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
            warn!(error = %e, "Failed to encode metrics");
            return String::new();
        }

        String::from_utf8_lossy(&buffer).into_owned()
    }
}

/// Structured logger for simulator events
///
/// Emits event-tagged records so log pipelines can filter on `event`.
#[derive(Clone)]
pub struct StructuredLogger {
    session: String,
}

impl StructuredLogger {
    pub fn new(session: impl Into<String>) -> Self {
        Self {
            session: session.into(),
        }
    }

    pub fn session(&self) -> &str {
        &self.session
    }

    pub fn log_startup(&self, version: &str, sink: &str) {
        info!(
            event = "simulation_started",
            session = %self.session,
            version = %version,
            sink = %sink,
            "Load simulator started"
        );
    }

    pub fn log_sample_emitted(&self, tick: u32, value: u32, sink: &str) {
        info!(
            event = "sample_emitted",
            session = %self.session,
            tick = tick,
            value = value,
            sink = %sink,
            "Sample forwarded to metrics sink"
        );
    }

    pub fn log_emit_failed(&self, tick: u32, value: u32, sink: &str, error: &str) {
        warn!(
            event = "emit_failed",
            session = %self.session,
            tick = tick,
            value = value,
            sink = %sink,
            error = %error,
            "Could not send metric, continuing"
        );
    }

    pub fn log_interrupted(&self, phase: &str, completed: u32) {
        info!(
            event = "simulation_interrupted",
            session = %self.session,
            phase = %phase,
            completed = completed,
            "Simulation interrupted by user"
        );
    }

    pub fn log_finished(&self, phase: &str, emitted: u32, failed: u32) {
        info!(
            event = "simulation_finished",
            session = %self.session,
            phase = %phase,
            emitted = emitted,
            failed = failed,
            "Simulation phase complete"
        );
    }
}
