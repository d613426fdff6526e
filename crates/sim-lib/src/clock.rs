//! Time sources for sample timestamps

use chrono::{DateTime, FixedOffset, Local, NaiveDate};

/// Source of wall-clock time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Local system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Clock frozen at a single instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    instant: DateTime<FixedOffset>,
}

impl FixedClock {
    pub fn new(instant: DateTime<FixedOffset>) -> Self {
        Self { instant }
    }

    /// Clock frozen at the given UTC hour of 2024-03-04
    ///
    /// # Panics
    ///
    /// Panics if `hour` is not a valid hour of the day (0..=23).
    pub fn at_hour(hour: u32) -> Self {
        let instant = NaiveDate::from_ymd_opt(2024, 3, 4)
            .and_then(|date| date.and_hms_opt(hour, 30, 0))
            .map(|naive| naive.and_utc().fixed_offset())
            .unwrap_or_else(|| panic!("hour of day must be 0..=23, got {hour}"));
        Self { instant }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.instant
    }
}
