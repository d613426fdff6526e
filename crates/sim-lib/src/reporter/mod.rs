//! Synthetic load reporter
//!
//! Runs the cadence loop: draw a sample, hand it to the sink, render a
//! progress line, then wait for the next tick. Sink failures are logged and
//! skipped; an interrupt stops the loop at the next suspension point.


use crate::clock::{Clock, SystemClock};
use crate::generator::{GeneratorConfig, LoadGenerator};
use crate::observability::{SimulatorMetrics, StructuredLogger};
use crate::render::tick_line;
use crate::shutdown::ShutdownSignal;
use crate::sink::MetricsSink;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Counts from one reporter run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Ticks whose sample reached the sink (accepted or not)
    pub ticks: u32,
    pub emitted: u32,
    pub failed: u32,
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed(RunSummary),
    Interrupted(RunSummary),
}

impl RunOutcome {
    pub fn summary(&self) -> RunSummary {
        match self {
            RunOutcome::Completed(s) | RunOutcome::Interrupted(s) => *s,
        }
    }

    pub fn is_interrupted(&self) -> bool {
        matches!(self, RunOutcome::Interrupted(_))
    }
}

/// Reporter that turns generated samples into sink emissions
pub struct LoadReporter {
    generator: LoadGenerator,
    clock: Arc<dyn Clock>,
    rng: StdRng,
    metrics: SimulatorMetrics,
    logger: StructuredLogger,
    output: Box<dyn Write + Send>,
    label: String,
}

impl LoadReporter {
    pub fn generator(&self) -> &LoadGenerator {
        &self.generator
    }

    /// Run `tick_count` ticks, `interval` apart
    ///
    /// There is no wait after the final tick.
    pub async fn run(
        &mut self,
        tick_count: u32,
        interval: Duration,
        sink: &dyn MetricsSink,
        shutdown: &mut ShutdownSignal,
    ) -> RunOutcome {
        info!(
            ticks = tick_count,
            interval_secs = interval.as_secs_f64(),
            sink = sink.name(),
            "Starting load reporter"
        );

        let mut summary = RunSummary::default();

        for tick in 1..=tick_count {
            if shutdown.is_triggered() {
                return self.interrupted(summary);
            }

            let sample = self.generator.sample(&mut self.rng, self.clock.now());
            self.metrics.record_sample(sample.value);

            let start = Instant::now();
            let result = tokio::select! {
                biased;
                _ = shutdown.triggered() => None,
                result = sink.emit(&sample) => Some(result),
            };
            self.metrics
                .observe_emit_latency(start.elapsed().as_secs_f64());

            // In-flight emission is dropped on interrupt
            let Some(result) = result else {
                return self.interrupted(summary);
            };

            summary.ticks += 1;
            match result {
                Ok(ack) => {
                    summary.emitted += 1;
                    self.metrics.inc_emit_success();
                    debug!(tick, request_id = ?ack.request_id, "Sample acknowledged");
                    self.logger
                        .log_sample_emitted(tick, sample.value, sink.name());
                }
                Err(e) => {
                    summary.failed += 1;
                    self.metrics.inc_emit_failures();
                    self.logger
                        .log_emit_failed(tick, sample.value, sink.name(), &e.to_string());
                }
            }

            let line = tick_line(tick, &self.label, sample.value);
            self.write_line(&line);

            if tick < tick_count && !shutdown.sleep(interval).await {
                return self.interrupted(summary);
            }
        }

        self.logger
            .log_finished("load", summary.emitted, summary.failed);
        RunOutcome::Completed(summary)
    }

    fn interrupted(&self, summary: RunSummary) -> RunOutcome {
        self.metrics.inc_runs_interrupted();
        self.logger.log_interrupted("load", summary.ticks);
        RunOutcome::Interrupted(summary)
    }

    fn write_line(&mut self, line: &str) {
        if let Err(e) = writeln!(self.output, "{}", line).and_then(|_| self.output.flush()) {
            debug!(error = %e, "Failed to write progress line");
        }
    }
}

/// Builder for creating a load reporter
pub struct LoadReporterBuilder {
    config: GeneratorConfig,
    clock: Option<Arc<dyn Clock>>,
    seed: Option<u64>,
    metrics: Option<SimulatorMetrics>,
    logger: Option<StructuredLogger>,
    output: Option<Box<dyn Write + Send>>,
    label: String,
}

impl LoadReporterBuilder {
    /// Create a new builder with the demo configuration
    pub fn new() -> Self {
        Self {
            config: GeneratorConfig::default(),
            clock: None,
            seed: None,
            metrics: None,
            logger: None,
            output: None,
            label: "CPU".to_string(),
        }
    }

    /// Set the generation parameters
    pub fn config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the time source (defaults to the system clock)
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Seed the random source; unseeded reporters draw from OS entropy
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn maybe_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn metrics(mut self, metrics: SimulatorMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn logger(mut self, logger: StructuredLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Where progress lines go (defaults to stdout)
    pub fn output(mut self, output: Box<dyn Write + Send>) -> Self {
        self.output = Some(output);
        self
    }

    /// Resource label shown on each progress line
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Build the reporter
    pub fn build(self) -> LoadReporter {
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        LoadReporter {
            generator: LoadGenerator::new(self.config),
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            rng,
            metrics: self.metrics.unwrap_or_default(),
            logger: self
                .logger
                .unwrap_or_else(|| StructuredLogger::new("default")),
            output: self
                .output
                .unwrap_or_else(|| Box::new(std::io::stdout())),
            label: self.label,
        }
    }
}

impl Default for LoadReporterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
