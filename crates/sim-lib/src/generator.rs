//! Bounded synthetic load generation
//!
//! Each draw is independent: a uniform integer in `[min_bound, max_bound]`,
//! raised by `peak_bonus` and clamped to `peak_ceiling` when the sample
//! timestamp falls inside the peak window.

use crate::models::{Dimensions, UtilizationSample, DEFAULT_METRIC_NAME, PERCENT_UNIT};
use chrono::{DateTime, FixedOffset, Timelike};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper end of the percentage scale
pub const FULL_SCALE: u32 = 100;

/// Errors raised while validating generator parameters
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("min_bound ({min}) is greater than max_bound ({max})")]
    MinAboveMax { min: u32, max: u32 },

    #[error("peak_ceiling ({ceiling}) is below max_bound ({max})")]
    CeilingBelowMax { ceiling: u32, max: u32 },

    #[error("peak_ceiling ({0}) exceeds 100%")]
    CeilingAboveFullScale(u32),

    #[error("peak window hour {0} is outside 0..=23")]
    InvalidHour(u32),
}

/// Inclusive hour range during which generated values get a bonus
///
/// A window whose start is after its end wraps past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeakWindow {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl PeakWindow {
    pub fn new(start_hour: u32, end_hour: u32) -> Result<Self, ConfigError> {
        for hour in [start_hour, end_hour] {
            if hour > 23 {
                return Err(ConfigError::InvalidHour(hour));
            }
        }
        Ok(Self {
            start_hour,
            end_hour,
        })
    }

    /// Business hours, 09:00 through 17:59
    pub fn business_hours() -> Self {
        Self {
            start_hour: 9,
            end_hour: 17,
        }
    }

    pub fn contains(&self, hour: u32) -> bool {
        if self.start_hour <= self.end_hour {
            (self.start_hour..=self.end_hour).contains(&hour)
        } else {
            hour >= self.start_hour || hour <= self.end_hour
        }
    }
}

impl Default for PeakWindow {
    fn default() -> Self {
        Self::business_hours()
    }
}

/// Validated generation parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratorConfig {
    min_bound: u32,
    max_bound: u32,
    peak_window: PeakWindow,
    peak_bonus: u32,
    peak_ceiling: u32,
    metric_name: String,
    dimensions: Dimensions,
}

/// Validate generation parameters
pub fn configure(
    min_bound: u32,
    max_bound: u32,
    peak_window: PeakWindow,
    peak_bonus: u32,
    peak_ceiling: u32,
    dimensions: Dimensions,
) -> Result<GeneratorConfig, ConfigError> {
    if min_bound > max_bound {
        return Err(ConfigError::MinAboveMax {
            min: min_bound,
            max: max_bound,
        });
    }
    if peak_ceiling < max_bound {
        return Err(ConfigError::CeilingBelowMax {
            ceiling: peak_ceiling,
            max: max_bound,
        });
    }
    if peak_ceiling > FULL_SCALE {
        return Err(ConfigError::CeilingAboveFullScale(peak_ceiling));
    }
    // Re-check hours in case the window was built with a struct literal
    PeakWindow::new(peak_window.start_hour, peak_window.end_hour)?;

    Ok(GeneratorConfig {
        min_bound,
        max_bound,
        peak_window,
        peak_bonus,
        peak_ceiling,
        metric_name: DEFAULT_METRIC_NAME.to_string(),
        dimensions,
    })
}

impl GeneratorConfig {
    /// Report samples under a different metric name
    pub fn with_metric_name(mut self, name: impl Into<String>) -> Self {
        self.metric_name = name.into();
        self
    }

    pub fn min_bound(&self) -> u32 {
        self.min_bound
    }

    pub fn max_bound(&self) -> u32 {
        self.max_bound
    }

    pub fn peak_window(&self) -> PeakWindow {
        self.peak_window
    }

    pub fn peak_bonus(&self) -> u32 {
        self.peak_bonus
    }

    pub fn peak_ceiling(&self) -> u32 {
        self.peak_ceiling
    }

    pub fn metric_name(&self) -> &str {
        &self.metric_name
    }

    pub fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }
}

impl Default for GeneratorConfig {
    /// 35-65%, +10 during business hours, capped at 70%
    fn default() -> Self {
        Self {
            min_bound: 35,
            max_bound: 65,
            peak_window: PeakWindow::business_hours(),
            peak_bonus: 10,
            peak_ceiling: 70,
            metric_name: DEFAULT_METRIC_NAME.to_string(),
            dimensions: Dimensions::demo_defaults(),
        }
    }
}

/// Stateless sample generator
#[derive(Debug, Clone)]
pub struct LoadGenerator {
    config: GeneratorConfig,
}

impl LoadGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Apply the peak-window rule to a base draw
    pub fn adjust(&self, base: u32, timestamp: &DateTime<FixedOffset>) -> u32 {
        if self.config.peak_window.contains(timestamp.hour()) {
            base.saturating_add(self.config.peak_bonus)
                .min(self.config.peak_ceiling)
        } else {
            base
        }
    }

    /// Draw one sample for the given instant
    pub fn sample<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        timestamp: DateTime<FixedOffset>,
    ) -> UtilizationSample {
        let base = rng.gen_range(self.config.min_bound..=self.config.max_bound);
        let value = self.adjust(base, &timestamp);

        UtilizationSample {
            metric_name: self.config.metric_name.clone(),
            timestamp,
            value,
            unit: PERCENT_UNIT.to_string(),
            dimensions: self.config.dimensions.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, FixedClock};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn demo_config() -> GeneratorConfig {
        configure(
            35,
            65,
            PeakWindow::business_hours(),
            10,
            70,
            Dimensions::demo_defaults(),
        )
        .unwrap()
    }

    #[test]
    fn test_configure_rejects_inverted_bounds() {
        let err = configure(80, 20, PeakWindow::default(), 10, 90, Dimensions::new()).unwrap_err();
        assert_eq!(err, ConfigError::MinAboveMax { min: 80, max: 20 });
    }

    #[test]
    fn test_configure_rejects_low_ceiling() {
        let err = configure(35, 65, PeakWindow::default(), 10, 60, Dimensions::new()).unwrap_err();
        assert_eq!(err, ConfigError::CeilingBelowMax { ceiling: 60, max: 65 });
    }

    #[test]
    fn test_configure_rejects_ceiling_over_full_scale() {
        let err = configure(35, 65, PeakWindow::default(), 10, 120, Dimensions::new()).unwrap_err();
        assert_eq!(err, ConfigError::CeilingAboveFullScale(120));
    }

    #[test]
    fn test_configure_rejects_bad_hour() {
        let window = PeakWindow {
            start_hour: 9,
            end_hour: 24,
        };
        let err = configure(35, 65, window, 10, 70, Dimensions::new()).unwrap_err();
        assert_eq!(err, ConfigError::InvalidHour(24));
        assert!(PeakWindow::new(25, 3).is_err());
    }

    #[test]
    fn test_configure_accepts_equal_bounds() {
        let config = configure(50, 50, PeakWindow::default(), 0, 50, Dimensions::new()).unwrap();
        assert_eq!(config.min_bound(), 50);
        assert_eq!(config.max_bound(), 50);
    }

    #[test]
    fn test_default_config_matches_demo() {
        assert_eq!(GeneratorConfig::default(), demo_config());
    }

    #[test]
    fn test_peak_window_contains() {
        let window = PeakWindow::business_hours();
        assert!(!window.contains(8));
        assert!(window.contains(9));
        assert!(window.contains(17));
        assert!(!window.contains(18));
    }

    #[test]
    fn test_peak_window_wraps_midnight() {
        let window = PeakWindow::new(22, 4).unwrap();
        assert!(window.contains(23));
        assert!(window.contains(0));
        assert!(window.contains(4));
        assert!(!window.contains(5));
        assert!(!window.contains(21));
    }

    #[test]
    fn test_adjust_clamps_to_ceiling() {
        let generator = LoadGenerator::new(demo_config());
        let peak = FixedClock::at_hour(12).now();
        let off_peak = FixedClock::at_hour(3).now();

        assert_eq!(generator.adjust(65, &peak), 70);
        assert_eq!(generator.adjust(50, &peak), 60);
        assert_eq!(generator.adjust(65, &off_peak), 65);
    }

    #[test]
    fn test_adjust_does_not_overflow() {
        let config = configure(0, 10, PeakWindow::default(), u32::MAX, 100, Dimensions::new())
            .unwrap();
        let generator = LoadGenerator::new(config);
        let peak = FixedClock::at_hour(10).now();

        assert_eq!(generator.adjust(10, &peak), 100);
    }

    #[test]
    fn test_samples_stay_within_bounds() {
        let generator = LoadGenerator::new(demo_config());

        for hour in 0..24 {
            let now = FixedClock::at_hour(hour).now();
            let mut rng = StdRng::seed_from_u64(u64::from(hour));
            for _ in 0..500 {
                let sample = generator.sample(&mut rng, now);
                assert!(sample.value >= 35, "value {} below min", sample.value);
                assert!(sample.value <= 70, "value {} above ceiling", sample.value);
                if !(9..=17).contains(&hour) {
                    assert!(sample.value <= 65);
                }
            }
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let generator = LoadGenerator::new(demo_config());
        let now = FixedClock::at_hour(12).now();

        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        let first: Vec<u32> = (0..20).map(|_| generator.sample(&mut a, now).value).collect();
        let second: Vec<u32> = (0..20).map(|_| generator.sample(&mut b, now).value).collect();

        assert_eq!(first, second);
    }

    #[test]
    fn test_sample_carries_metadata() {
        let config = demo_config().with_metric_name("SimulatedMemoryLoad");
        let generator = LoadGenerator::new(config);
        let now = FixedClock::at_hour(2).now();
        let sample = generator.sample(&mut StdRng::seed_from_u64(1), now);

        assert_eq!(sample.metric_name, "SimulatedMemoryLoad");
        assert_eq!(sample.unit, "Percent");
        assert_eq!(sample.timestamp, now);
        assert_eq!(sample.dimensions.get("Simulation"), Some("FreeTierDemo"));
    }
}
