//! Core data models for the load simulator

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};

/// Default metric name samples are reported under
pub const DEFAULT_METRIC_NAME: &str = "SimulatedCPULoad";

/// Unit attached to every utilization sample
pub const PERCENT_UNIT: &str = "Percent";

/// A single label attached to a sample for routing in the metrics backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    pub name: String,
    pub value: String,
}

/// Ordered label -> value mapping
///
/// Insertion order is preserved; inserting an existing name replaces its
/// value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Dimensions(Vec<Dimension>);

impl Dimensions {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert or replace a dimension
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();

        match self.0.iter_mut().find(|d| d.name == name) {
            Some(existing) => existing.value = value,
            None => self.0.push(Dimension { name, value }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dimension> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Dimensions the demo reports with when none are configured
    pub fn demo_defaults() -> Self {
        let mut dims = Self::new();
        dims.insert("InstanceType", "t2.micro");
        dims.insert("Simulation", "FreeTierDemo");
        dims
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Dimensions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dims = Self::new();
        for (name, value) in iter {
            dims.insert(name, value);
        }
        dims
    }
}

/// Duplicate names collapse the same way `insert` does
impl<'de> Deserialize<'de> for Dimensions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let list = Vec::<Dimension>::deserialize(deserializer)?;
        Ok(list.into_iter().map(|d| (d.name, d.value)).collect())
    }
}

/// One synthetic utilization reading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UtilizationSample {
    pub metric_name: String,
    pub timestamp: DateTime<FixedOffset>,
    /// Integer percentage
    pub value: u32,
    pub unit: String,
    pub dimensions: Dimensions,
}
