//! Frequency labels and timestamp stepping.
//!
//! Maps the closed set of TSF frequency labels onto a clock or calendar
//! step. Calendar steps (month, quarter, year) add calendar months so that
//! month-length variation is respected; clock steps add fixed durations.

use crate::error::{Result, TsfError};
use chrono::{Duration, Months, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sampling cadence declared by `@frequency`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    FourSeconds,
    Minutely,
    TenMinutes,
    FifteenMinutes,
    HalfHourly,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

/// Whether a frequency keeps the time-of-day component of a start timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrequencyClass {
    SubDaily,
    DayOrCoarser,
}

/// Increment between consecutive timestamps of a series
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Clock(Duration),
    Calendar(Months),
}

impl Frequency {
    pub const ALL: [Frequency; 11] = [
        Frequency::FourSeconds,
        Frequency::Minutely,
        Frequency::TenMinutes,
        Frequency::FifteenMinutes,
        Frequency::HalfHourly,
        Frequency::Hourly,
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Monthly,
        Frequency::Quarterly,
        Frequency::Yearly,
    ];

    /// Resolve a label to its step and class
    pub fn lookup(label: &str) -> Result<(Step, FrequencyClass)> {
        let frequency: Frequency = label.parse()?;
        Ok((frequency.step(), frequency.class()))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Frequency::FourSeconds => "4_seconds",
            Frequency::Minutely => "minutely",
            Frequency::TenMinutes => "10_minutes",
            Frequency::FifteenMinutes => "15_minutes",
            Frequency::HalfHourly => "half_hourly",
            Frequency::Hourly => "hourly",
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Yearly => "yearly",
        }
    }

    pub fn step(&self) -> Step {
        match self {
            Frequency::FourSeconds => Step::Clock(Duration::seconds(4)),
            Frequency::Minutely => Step::Clock(Duration::minutes(1)),
            Frequency::TenMinutes => Step::Clock(Duration::minutes(10)),
            Frequency::FifteenMinutes => Step::Clock(Duration::minutes(15)),
            Frequency::HalfHourly => Step::Clock(Duration::minutes(30)),
            Frequency::Hourly => Step::Clock(Duration::hours(1)),
            Frequency::Daily => Step::Clock(Duration::days(1)),
            Frequency::Weekly => Step::Clock(Duration::weeks(1)),
            Frequency::Monthly => Step::Calendar(Months::new(1)),
            Frequency::Quarterly => Step::Calendar(Months::new(3)),
            Frequency::Yearly => Step::Calendar(Months::new(12)),
        }
    }

    pub fn class(&self) -> FrequencyClass {
        match self {
            Frequency::FourSeconds
            | Frequency::Minutely
            | Frequency::TenMinutes
            | Frequency::FifteenMinutes
            | Frequency::HalfHourly
            | Frequency::Hourly => FrequencyClass::SubDaily,
            _ => FrequencyClass::DayOrCoarser,
        }
    }

    /// Generate `count` timestamps starting at `start`
    ///
    /// Each element advances from the previous one, so calendar steps
    /// compound (Jan 31 -> Feb 28 -> Mar 28). Returns `None` if the sequence
    /// leaves the representable range.
    pub fn sequence(&self, start: NaiveDateTime, count: usize) -> Option<Vec<NaiveDateTime>> {
        let step = self.step();
        let mut timestamps = Vec::with_capacity(count);
        let mut current = start;
        for i in 0..count {
            if i > 0 {
                current = step.advance(current)?;
            }
            timestamps.push(current);
        }
        Some(timestamps)
    }
}

impl Step {
    /// Advance one step, or `None` on overflow
    pub fn advance(&self, from: NaiveDateTime) -> Option<NaiveDateTime> {
        match self {
            Step::Clock(duration) => from.checked_add_signed(*duration),
            Step::Calendar(months) => from.checked_add_months(*months),
        }
    }
}

impl FromStr for Frequency {
    type Err = TsfError;

    fn from_str(label: &str) -> Result<Self> {
        Frequency::ALL
            .into_iter()
            .find(|frequency| frequency.label() == label)
            .ok_or_else(|| TsfError::InvalidFrequency {
                label: label.to_string(),
            })
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
