//! Simulator configuration
//!
//! Layered as: serde defaults, optional config file, `LOADSIM_*`
//! environment variables. Command-line flags are applied on top by `main`.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use sim_lib::{configure, sink::DEFAULT_NAMESPACE, Dimensions, GeneratorConfig, PeakWindow};
use std::path::Path;
use std::time::Duration;

/// Simulator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SimulatorConfig {
    /// Number of load samples to report
    #[serde(default = "default_ticks")]
    pub ticks: u32,

    /// Seconds between load samples
    #[serde(default = "default_interval")]
    pub interval_secs: u64,

    #[serde(default = "default_min_bound")]
    pub min_bound: u32,

    #[serde(default = "default_max_bound")]
    pub max_bound: u32,

    /// First hour of the peak window (inclusive)
    #[serde(default = "default_peak_start")]
    pub peak_start: u32,

    /// Last hour of the peak window (inclusive)
    #[serde(default = "default_peak_end")]
    pub peak_end: u32,

    #[serde(default = "default_peak_bonus")]
    pub peak_bonus: u32,

    #[serde(default = "default_peak_ceiling")]
    pub peak_ceiling: u32,

    #[serde(default = "default_metric_name")]
    pub metric_name: String,

    /// Metrics namespace used by the HTTP sink
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// `Name=Value` pairs; empty means the demo defaults
    #[serde(default)]
    pub dimensions: Vec<String>,

    /// Metrics ingestion endpoint; samples are dropped when unset
    #[serde(default)]
    pub sink_url: Option<String>,

    /// Fixed seed for reproducible runs
    #[serde(default)]
    pub seed: Option<u64>,

    /// Pause between simulated storage steps, in milliseconds
    #[serde(default = "default_storage_pause_ms")]
    pub storage_pause_ms: u64,

    /// Session name attached to structured log events
    #[serde(default = "default_session")]
    pub session: String,
}

fn default_ticks() -> u32 {
    5
}

fn default_interval() -> u64 {
    60
}

fn default_min_bound() -> u32 {
    35
}

fn default_max_bound() -> u32 {
    65
}

fn default_peak_start() -> u32 {
    9
}

fn default_peak_end() -> u32 {
    17
}

fn default_peak_bonus() -> u32 {
    10
}

fn default_peak_ceiling() -> u32 {
    70
}

fn default_metric_name() -> String {
    sim_lib::DEFAULT_METRIC_NAME.to_string()
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_storage_pause_ms() -> u64 {
    2000
}

fn default_session() -> String {
    std::env::var("HOSTNAME").unwrap_or_else(|_| "demo".to_string())
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            ticks: default_ticks(),
            interval_secs: default_interval(),
            min_bound: default_min_bound(),
            max_bound: default_max_bound(),
            peak_start: default_peak_start(),
            peak_end: default_peak_end(),
            peak_bonus: default_peak_bonus(),
            peak_ceiling: default_peak_ceiling(),
            metric_name: default_metric_name(),
            namespace: default_namespace(),
            dimensions: Vec::new(),
            sink_url: None,
            seed: None,
            storage_pause_ms: default_storage_pause_ms(),
            session: default_session(),
        }
    }
}

impl SimulatorConfig {
    /// Load configuration from an optional file and the environment
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("LOADSIM")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("dimensions"),
            )
            .build()
            .context("Failed to read configuration")?;

        config
            .try_deserialize()
            .context("Invalid configuration values")
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn storage_pause(&self) -> Duration {
        Duration::from_millis(self.storage_pause_ms)
    }

    /// Validate and convert into generator parameters
    pub fn generator_config(&self) -> Result<GeneratorConfig> {
        let dimensions = if self.dimensions.is_empty() {
            Dimensions::demo_defaults()
        } else {
            self.dimensions
                .iter()
                .map(String::as_str)
                .map(parse_dimension)
                .collect::<Result<Dimensions>>()?
        };

        let window = PeakWindow::new(self.peak_start, self.peak_end)?;
        let config = configure(
            self.min_bound,
            self.max_bound,
            window,
            self.peak_bonus,
            self.peak_ceiling,
            dimensions,
        )?;

        Ok(config.with_metric_name(&self.metric_name))
    }
}

/// Parse a `Name=Value` dimension
pub fn parse_dimension(raw: &str) -> Result<(String, String)> {
    let Some((name, value)) = raw.split_once('=') else {
        bail!("dimension '{}' must look like Name=Value", raw);
    };

    let name = name.trim();
    let value = value.trim();
    if name.is_empty() || value.is_empty() {
        bail!("dimension '{}' has an empty name or value", raw);
    }

    Ok((name.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_build_demo_generator() {
        let config = SimulatorConfig::default();
        let generator = config.generator_config().unwrap();

        assert_eq!(generator, GeneratorConfig::default());
        assert_eq!(config.interval(), Duration::from_secs(60));
        assert_eq!(config.ticks, 5);
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let config = SimulatorConfig {
            min_bound: 80,
            max_bound: 20,
            ..Default::default()
        };

        let err = config.generator_config().unwrap_err();
        assert!(err.to_string().contains("min_bound"));
    }

    #[test]
    fn test_custom_dimensions_keep_order() {
        let config = SimulatorConfig {
            dimensions: vec!["Env=staging".to_string(), "Team = finops".to_string()],
            ..Default::default()
        };

        let generator = config.generator_config().unwrap();
        let names: Vec<_> = generator.dimensions().iter().map(|d| d.name.clone()).collect();
        assert_eq!(names, vec!["Env", "Team"]);
        assert_eq!(generator.dimensions().get("Team"), Some("finops"));
    }

    #[test]
    fn test_parse_dimension_errors() {
        assert!(parse_dimension("novalue").is_err());
        assert!(parse_dimension("=x").is_err());
        assert!(parse_dimension("x=").is_err());
        assert_eq!(
            parse_dimension("a=b=c").unwrap(),
            ("a".to_string(), "b=c".to_string())
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "ticks = 3\ninterval_secs = 1\npeak_ceiling = 80\ndimensions = [\"Env=demo\"]"
        )
        .unwrap();

        let config = SimulatorConfig::load(Some(file.path())).unwrap();

        assert_eq!(config.ticks, 3);
        assert_eq!(config.interval_secs, 1);
        assert_eq!(config.peak_ceiling, 80);
        assert_eq!(config.min_bound, 35);
        assert_eq!(config.dimensions, vec!["Env=demo".to_string()]);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = SimulatorConfig::load(Some(Path::new("/nonexistent/loadsim.toml")));
        assert!(result.is_err());
    }
}
