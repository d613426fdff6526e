//! Load simulator
//!
//! Prints simulated cloud-resource load and forwards synthetic utilization
//! samples to a metrics endpoint, producing demo dashboard data.

mod config;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use output::{LogFormat, OutputFormat};
use rand::rngs::StdRng;
use rand::SeedableRng;
use sim_lib::{
    scenario::{
        demo_cost_scenarios, demo_storage_operations, simulate_invocations,
        simulate_storage_operations, InvocationPlan, ScenarioOutcome,
    },
    shutdown_channel, HttpMetricsSink, LoadReporterBuilder, MetricsSink, NoopSink, RunOutcome,
    SimulatorMetrics, StructuredLogger,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SIMULATOR_VERSION: &str = env!("CARGO_PKG_VERSION");
const CONSOLE_WRITE: &str = "Failed to write console output";

/// Synthetic cloud load simulator
#[derive(Parser)]
#[command(name = "loadsim")]
#[command(author, version, about = "Synthetic cloud load simulator for demo dashboards", long_about = None)]
pub struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(long, env = "LOADSIM_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Number of load samples to report
    #[arg(long, global = true)]
    pub ticks: Option<u32>,

    /// Seconds between load samples
    #[arg(long, value_name = "SECS", global = true)]
    pub interval: Option<u64>,

    /// Lowest generated load, in percent
    #[arg(long, global = true)]
    pub min: Option<u32>,

    /// Highest generated load outside the peak window, in percent
    #[arg(long, global = true)]
    pub max: Option<u32>,

    /// First hour of the peak window
    #[arg(long, global = true)]
    pub peak_start: Option<u32>,

    /// Last hour of the peak window
    #[arg(long, global = true)]
    pub peak_end: Option<u32>,

    /// Load added during the peak window
    #[arg(long, global = true)]
    pub peak_bonus: Option<u32>,

    /// Hard cap on load during the peak window
    #[arg(long, global = true)]
    pub peak_ceiling: Option<u32>,

    /// Seed for reproducible runs
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Metrics ingestion endpoint
    #[arg(long, global = true)]
    pub sink_url: Option<String>,

    /// Metrics namespace
    #[arg(long, global = true)]
    pub namespace: Option<String>,

    /// Metric name for load samples
    #[arg(long, global = true)]
    pub metric_name: Option<String>,

    /// Sample dimension as Name=Value (repeatable)
    #[arg(long = "dimension", short = 'd', value_name = "NAME=VALUE", global = true)]
    pub dimensions: Vec<String>,

    /// Pause between simulated storage steps, in milliseconds
    #[arg(long, global = true)]
    pub storage_pause_ms: Option<u64>,

    /// Output format for the cost table
    #[arg(long, short, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Log output format (logs go to stderr)
    #[arg(long, default_value = "json", global = true)]
    pub log_format: LogFormat,

    /// Dump Prometheus metrics to stderr on exit
    #[arg(long, global = true)]
    pub print_metrics: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Clone, Copy)]
pub enum Commands {
    /// Run the complete demo (default)
    All,
    /// Report synthetic CPU load samples
    Load,
    /// Simulate object-storage operations
    Storage,
    /// Simulate function invocations
    Invocations,
    /// Show the cost-savings comparison
    Costs,
}

/// How the simulation ended
enum Completion {
    Finished,
    Interrupted,
}

impl From<&ScenarioOutcome> for Completion {
    fn from(outcome: &ScenarioOutcome) -> Self {
        if outcome.is_interrupted() {
            Completion::Interrupted
        } else {
            Completion::Finished
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let print_metrics = cli.print_metrics;
    let result = run(cli).await;

    if print_metrics {
        eprintln!("{}", SimulatorMetrics::new().render());
    }

    match result {
        Ok(Completion::Finished) => ExitCode::SUCCESS,
        Ok(Completion::Interrupted) => {
            let mut stdout = io::stdout();
            // Nothing left to report to if stdout is gone as well
            let _ = writeln!(stdout)
                .and_then(|_| output::print_warning(&mut stdout, "Simulation interrupted by user"));
            ExitCode::SUCCESS
        }
        Err(e) => {
            output::print_error(&format!("Error during simulation: {:#}", e));
            eprintln!("Hint: make sure the metrics endpoint, its credentials and the simulator configuration are set up");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

fn apply_overrides(config: &mut config::SimulatorConfig, cli: &Cli) {
    if let Some(v) = cli.ticks {
        config.ticks = v;
    }
    if let Some(v) = cli.interval {
        config.interval_secs = v;
    }
    if let Some(v) = cli.min {
        config.min_bound = v;
    }
    if let Some(v) = cli.max {
        config.max_bound = v;
    }
    if let Some(v) = cli.peak_start {
        config.peak_start = v;
    }
    if let Some(v) = cli.peak_end {
        config.peak_end = v;
    }
    if let Some(v) = cli.peak_bonus {
        config.peak_bonus = v;
    }
    if let Some(v) = cli.peak_ceiling {
        config.peak_ceiling = v;
    }
    if let Some(v) = cli.seed {
        config.seed = Some(v);
    }
    if let Some(v) = &cli.sink_url {
        config.sink_url = Some(v.clone());
    }
    if let Some(v) = &cli.namespace {
        config.namespace = v.clone();
    }
    if let Some(v) = &cli.metric_name {
        config.metric_name = v.clone();
    }
    if !cli.dimensions.is_empty() {
        config.dimensions = cli.dimensions.clone();
    }
    if let Some(v) = cli.storage_pause_ms {
        config.storage_pause_ms = v;
    }
}

async fn run(cli: Cli) -> Result<Completion> {
    // Listen before anything slow so an early Ctrl-C still exits cleanly
    let (shutdown_handle, mut shutdown) = shutdown_channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            shutdown_handle.trigger();
        }
    });

    let mut config = config::SimulatorConfig::load(cli.config.as_deref())?;
    apply_overrides(&mut config, &cli);

    // Validate before any output or tick
    let generator_config = config.generator_config()?;

    let sink: Box<dyn MetricsSink> = match &config.sink_url {
        Some(url) => Box::new(
            HttpMetricsSink::new(url, config.namespace.clone())
                .context("Failed to set up the metrics sink")?,
        ),
        None => Box::new(NoopSink),
    };

    let metrics = SimulatorMetrics::new();
    let logger = StructuredLogger::new(&config.session);
    logger.log_startup(SIMULATOR_VERSION, sink.name());
    info!(session = %config.session, ticks = config.ticks, "Simulator configured");

    if shutdown.is_triggered() {
        return Ok(Completion::Interrupted);
    }

    let command = cli.command.unwrap_or(Commands::All);
    let full_demo = matches!(command, Commands::All);
    let mut stdout = io::stdout();

    if full_demo {
        output::print_banner(&mut stdout).context(CONSOLE_WRITE)?;
    }

    if matches!(command, Commands::All | Commands::Load) {
        output::print_section(
            &mut stdout,
            "Starting compute load simulation...",
            "750 hours/month",
            &format!(
                "{}-{}% CPU (+{} during peak hours, capped at {}%)",
                generator_config.min_bound(),
                generator_config.max_bound(),
                generator_config.peak_bonus(),
                generator_config.peak_ceiling()
            ),
        )
        .context(CONSOLE_WRITE)?;
        if config.sink_url.is_none() {
            output::print_warning(
                &mut stdout,
                "No metrics endpoint configured, samples are not forwarded",
            )
            .context(CONSOLE_WRITE)?;
        }

        let mut reporter = LoadReporterBuilder::new()
            .config(generator_config)
            .maybe_seed(config.seed)
            .metrics(metrics.clone())
            .logger(logger.clone())
            .build();

        let outcome = reporter
            .run(config.ticks, config.interval(), sink.as_ref(), &mut shutdown)
            .await;
        if let RunOutcome::Interrupted(_) = outcome {
            return Ok(Completion::Interrupted);
        }
        output::print_success(&mut stdout, "Compute load simulation complete")
            .and_then(|_| writeln!(stdout))
            .context(CONSOLE_WRITE)?;
    }

    if matches!(command, Commands::All | Commands::Storage) {
        output::print_section(
            &mut stdout,
            "Simulating storage operations...",
            "5GB storage",
            "basic demo operations",
        )
        .context(CONSOLE_WRITE)?;
        let outcome = simulate_storage_operations(
            &demo_storage_operations(),
            config.storage_pause(),
            &mut stdout,
            &mut shutdown,
        )
        .await;
        if let Completion::Interrupted = log_scenario(&logger, "storage", &outcome) {
            return Ok(Completion::Interrupted);
        }
        output::print_success(&mut stdout, "Storage operations simulated")
            .and_then(|_| writeln!(stdout))
            .context(CONSOLE_WRITE)?;
    }

    if matches!(command, Commands::All | Commands::Invocations) {
        output::print_section(
            &mut stdout,
            "Simulating function invocations...",
            "1M requests/month",
            "a handful of demo invocations",
        )
        .context(CONSOLE_WRITE)?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
            None => StdRng::from_entropy(),
        };
        let outcome = simulate_invocations(
            &InvocationPlan::default(),
            &mut rng,
            &mut stdout,
            &mut shutdown,
        )
        .await;
        if let Completion::Interrupted = log_scenario(&logger, "invocations", &outcome) {
            return Ok(Completion::Interrupted);
        }
        output::print_success(&mut stdout, "Function invocations simulated")
            .and_then(|_| writeln!(stdout))
            .context(CONSOLE_WRITE)?;
    }

    if matches!(command, Commands::All | Commands::Costs) {
        if shutdown.is_triggered() {
            return Ok(Completion::Interrupted);
        }
        output::print_cost_table(&mut stdout, &demo_cost_scenarios(), cli.format)
            .context(CONSOLE_WRITE)?;
    }

    if full_demo {
        output::print_success(&mut stdout, "SIMULATION COMPLETED SUCCESSFULLY")
            .and_then(|_| {
                output::print_info(&mut stdout, "Sample data is ready for your metrics dashboard")
            })
            .context(CONSOLE_WRITE)?;
    }

    Ok(Completion::Finished)
}

fn log_scenario(logger: &StructuredLogger, phase: &str, outcome: &ScenarioOutcome) -> Completion {
    let steps = outcome.steps() as u32;
    match outcome {
        ScenarioOutcome::Interrupted { .. } => logger.log_interrupted(phase, steps),
        ScenarioOutcome::Completed { .. } => logger.log_finished(phase, steps, 0),
    }
    Completion::from(outcome)
}

