//! Static cost-savings comparison

use serde::{Deserialize, Serialize};

/// One service line of the savings table, monthly USD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostScenario {
    pub service: String,
    pub current: f64,
    pub optimized: f64,
    /// Advertised saving for this line, in percent
    pub saving_percent: u32,
}

impl CostScenario {
    fn new(service: &str, current: f64, optimized: f64, saving_percent: u32) -> Self {
        Self {
            service: service.to_string(),
            current,
            optimized,
            saving_percent,
        }
    }
}

pub fn demo_cost_scenarios() -> Vec<CostScenario> {
    vec![
        CostScenario::new("EC2 t2.micro", 8.50, 5.10, 40),
        CostScenario::new("S3 5GB", 0.12, 0.07, 42),
        CostScenario::new("Lambda 100K", 0.20, 0.10, 50),
        CostScenario::new("Data Transfer", 1.50, 0.75, 50),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostTotals {
    pub current: f64,
    pub optimized: f64,
    pub monthly_saving: f64,
    pub saving_percent: f64,
}

impl CostTotals {
    pub fn from_scenarios(scenarios: &[CostScenario]) -> Self {
        let current: f64 = scenarios.iter().map(|s| s.current).sum();
        let optimized: f64 = scenarios.iter().map(|s| s.optimized).sum();
        let monthly_saving = current - optimized;
        let saving_percent = if current > 0.0 {
            monthly_saving / current * 100.0
        } else {
            0.0
        };

        Self {
            current,
            optimized,
            monthly_saving,
            saving_percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_totals() {
        let totals = CostTotals::from_scenarios(&demo_cost_scenarios());

        assert!((totals.current - 10.32).abs() < 1e-9);
        assert!((totals.optimized - 6.02).abs() < 1e-9);
        assert!((totals.monthly_saving - 4.30).abs() < 1e-9);
        assert_eq!(format!("{:.1}", totals.saving_percent), "41.7");
    }

    #[test]
    fn test_empty_totals() {
        let totals = CostTotals::from_scenarios(&[]);
        assert_eq!(totals.current, 0.0);
        assert_eq!(totals.saving_percent, 0.0);
    }
}
