//! Library for the synthetic load simulator
//!
//! This crate provides the core functionality for:
//! - Bounded pseudo-random utilization samples with a time-of-day peak window
//! - The cadence loop that reports samples to a metrics sink
//! - Metrics sinks (no-op and HTTP ingestion)
//! - The scripted demo scenarios (storage, invocations, cost table)
//! - Observability

pub mod clock;
pub mod generator;
pub mod models;
pub mod observability;
pub mod render;
pub mod reporter;
pub mod scenario;
pub mod shutdown;
pub mod sink;

pub use clock::{Clock, FixedClock, SystemClock};
pub use generator::{configure, ConfigError, GeneratorConfig, LoadGenerator, PeakWindow};
pub use models::*;
pub use observability::{SimulatorMetrics, StructuredLogger};
pub use reporter::{LoadReporter, LoadReporterBuilder, RunOutcome, RunSummary};
pub use shutdown::{shutdown_channel, ShutdownHandle, ShutdownSignal};
pub use sink::{Ack, EmitError, HttpMetricsSink, MetricsSink, NoopSink};
