//! Attribute materialization.
//!
//! Expands one series' raw attribute token into a column segment of the
//! series' length: a broadcast scalar for string and numeric attributes, or a
//! generated timestamp sequence for date attributes. Segments are appended to
//! one builder per schema entry, in schema order.

use crate::constants::{DATE_FORMAT, TIMESTAMP_FORMAT};
use crate::error::{Result, TsfError};
use crate::frequency::{Frequency, FrequencyClass};
use crate::models::{Attribute, AttributeType};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use polars::prelude::*;

/// Growing column for one declared attribute
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnBuilder {
    Text { name: String, values: Vec<String> },
    Numeric { name: String, values: Vec<f64> },
    Date { name: String, values: Vec<NaiveDateTime> },
}

impl ColumnBuilder {
    pub fn for_attribute(attribute: &Attribute) -> Self {
        let name = attribute.name.clone();
        match attribute.attribute_type {
            AttributeType::String => ColumnBuilder::Text {
                name,
                values: Vec::new(),
            },
            AttributeType::Numeric => ColumnBuilder::Numeric {
                name,
                values: Vec::new(),
            },
            AttributeType::Date => ColumnBuilder::Date {
                name,
                values: Vec::new(),
            },
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ColumnBuilder::Text { name, .. }
            | ColumnBuilder::Numeric { name, .. }
            | ColumnBuilder::Date { name, .. } => name,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnBuilder::Text { values, .. } => values.len(),
            ColumnBuilder::Numeric { values, .. } => values.len(),
            ColumnBuilder::Date { values, .. } => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Convert into a Polars column; dates become millisecond datetimes
    pub fn finish(self) -> Result<Column> {
        let series = match self {
            ColumnBuilder::Text { name, values } => Series::new(name.as_str().into(), values),
            ColumnBuilder::Numeric { name, values } => Series::new(name.as_str().into(), values),
            ColumnBuilder::Date { name, values } => {
                let millis: Vec<i64> = values
                    .iter()
                    .map(|dt| dt.and_utc().timestamp_millis())
                    .collect();
                Series::new(name.as_str().into(), millis)
                    .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?
            }
        };
        Ok(series.into())
    }
}

/// Expands raw attribute tokens into column segments.
///
/// The frequency label is resolved on first use by a date attribute, so a
/// dataset without date attributes never needs a valid `@frequency`.
#[derive(Debug)]
pub struct AttributeMaterializer {
    frequency_label: Option<String>,
    frequency: Option<Frequency>,
}

impl AttributeMaterializer {
    pub fn new(frequency_label: Option<String>) -> Self {
        Self {
            frequency_label,
            frequency: None,
        }
    }

    /// Append `count` entries derived from `raw` to `builder`
    pub fn materialize(
        &mut self,
        builder: &mut ColumnBuilder,
        raw: &str,
        count: usize,
        line_num: usize,
    ) -> Result<()> {
        match builder {
            ColumnBuilder::Text { values, .. } => {
                values.extend(std::iter::repeat_n(raw.to_string(), count));
            }
            ColumnBuilder::Numeric { name, values } => {
                let value = parse_numeric(raw).ok_or_else(|| TsfError::InvalidAttributeValues {
                    line: line_num,
                    field: name.clone(),
                    value: raw.to_string(),
                })?;
                values.extend(std::iter::repeat_n(value, count));
            }
            ColumnBuilder::Date { name, values } => {
                let frequency = self.resolve_frequency(name, line_num)?;
                let start = parse_start(raw.trim(), frequency.class()).map_err(|e| {
                    TsfError::InvalidTimestampFormat {
                        line: line_num,
                        attribute: name.clone(),
                        value: raw.to_string(),
                        reason: e.to_string(),
                    }
                })?;
                let timestamps = frequency.sequence(start, count).ok_or_else(|| {
                    TsfError::InvalidTimestampFormat {
                        line: line_num,
                        attribute: name.clone(),
                        value: raw.to_string(),
                        reason: format!("{} sequence of {} steps is out of range", frequency, count),
                    }
                })?;
                values.extend(timestamps);
            }
        }
        Ok(())
    }

    fn resolve_frequency(&mut self, attribute: &str, line_num: usize) -> Result<Frequency> {
        if let Some(frequency) = self.frequency {
            return Ok(frequency);
        }

        let label = self
            .frequency_label
            .as_deref()
            .ok_or_else(|| TsfError::MissingFrequency {
                line: line_num,
                attribute: attribute.to_string(),
            })?;
        let frequency: Frequency = label.parse()?;
        self.frequency = Some(frequency);
        Ok(frequency)
    }
}

fn parse_numeric(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Parse a start timestamp
///
/// Sub-daily frequencies need the full `YYYY-MM-DD HH-MM-SS` form. Coarser
/// frequencies also accept a bare date and drop the time-of-day.
fn parse_start(raw: &str, class: FrequencyClass) -> std::result::Result<NaiveDateTime, chrono::ParseError> {
    match class {
        FrequencyClass::SubDaily => NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT),
        FrequencyClass::DayOrCoarser => {
            let date = match NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT) {
                Ok(dt) => dt.date(),
                Err(_) => NaiveDate::parse_from_str(raw, DATE_FORMAT)?,
            };
            Ok(date.and_time(NaiveTime::MIN))
        }
    }
}
