//! Forecast train/test splitting.
//!
//! Groups the long-format table by a key attribute and splits each group's
//! values into a training prefix and a test tail of `@horizon` values,
//! carrying the group's first timestamp and the dataset frequency.

use crate::error::{Result, TsfError};
use crate::models::{AttributeType, Observation, TsfDataset};
use chrono::{DateTime, NaiveDateTime};
use polars::prelude::*;
use tracing::debug;

/// One keyed series split at the forecast horizon
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSplit {
    pub key: String,
    /// First timestamp of the group, when an index date attribute exists
    pub start: Option<NaiveDateTime>,
    pub frequency: Option<String>,
    pub train: Vec<Observation>,
    pub test: Vec<Observation>,
}

/// Split every series of `dataset`, grouped by `key`, in file order
pub fn train_test_split(dataset: &TsfDataset, key: &str) -> Result<Vec<SeriesSplit>> {
    if !dataset.schema.contains(key) {
        return Err(TsfError::InvalidKey {
            key: key.to_string(),
        });
    }
    let horizon = dataset.require_horizon()? as usize;

    // Only a date-typed index yields a start timestamp
    let index_column = dataset
        .index
        .index()
        .filter(|name| {
            dataset
                .schema
                .get(name)
                .is_some_and(|a| a.attribute_type == AttributeType::Date)
        })
        .or_else(|| dataset.schema.first_date_attribute().map(|a| a.name.as_str()));

    let groups = dataset.frame.partition_by_stable([key], true)?;
    let mut splits = Vec::with_capacity(groups.len());

    for group in groups {
        let key_value = group
            .column(key)?
            .cast(&DataType::String)?
            .str()?
            .get(0)
            .unwrap_or_default()
            .to_string();

        let values: Vec<Observation> = group
            .column(&dataset.value_column)?
            .f64()?
            .into_iter()
            .collect();

        if values.len() < horizon {
            return Err(TsfError::configuration(format!(
                "Series '{}' has {} values, fewer than the horizon of {}",
                key_value,
                values.len(),
                horizon
            )));
        }

        let start = match index_column {
            Some(name) => first_timestamp(&group, name)?,
            None => None,
        };

        let (train, test) = values.split_at(values.len() - horizon);
        splits.push(SeriesSplit {
            key: key_value,
            start,
            frequency: dataset.metadata.frequency.clone(),
            train: train.to_vec(),
            test: test.to_vec(),
        });
    }

    debug!(
        "Split {} series at horizon {} using key '{}'",
        splits.len(),
        horizon,
        key
    );
    Ok(splits)
}

fn first_timestamp(group: &DataFrame, column: &str) -> Result<Option<NaiveDateTime>> {
    let millis = group
        .column(column)?
        .cast(&DataType::Int64)?
        .i64()?
        .get(0);
    Ok(millis
        .and_then(DateTime::from_timestamp_millis)
        .map(|dt| dt.naive_utc()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DecodeOptions;
    use crate::decoder::decode_str;
    use crate::error::ErrorKind;
    use chrono::NaiveDate;

    const SAMPLE: &str = "\
@attribute series_name string
@attribute start_timestamp date
@frequency quarterly
@horizon 2
@data
Q1:2000-01-01 00-00-00:1,2,3,4,5
Q2:2010-07-01 00-00-00:?,7,8
";

    #[test]
    fn test_split_at_horizon() {
        let dataset = decode_str(SAMPLE, &DecodeOptions::default()).unwrap();
        let splits = train_test_split(&dataset, "series_name").unwrap();

        assert_eq!(splits.len(), 2);
        assert_eq!(splits[0].key, "Q1");
        assert_eq!(splits[0].train, vec![Some(1.0), Some(2.0), Some(3.0)]);
        assert_eq!(splits[0].test, vec![Some(4.0), Some(5.0)]);
        assert_eq!(
            splits[0].start,
            NaiveDate::from_ymd_opt(2000, 1, 1).unwrap().and_hms_opt(0, 0, 0)
        );
        assert_eq!(splits[0].frequency.as_deref(), Some("quarterly"));

        assert_eq!(splits[1].key, "Q2");
        assert_eq!(splits[1].train, vec![None]);
        assert_eq!(splits[1].test, vec![Some(7.0), Some(8.0)]);
        assert_eq!(
            splits[1].start,
            NaiveDate::from_ymd_opt(2010, 7, 1).unwrap().and_hms_opt(0, 0, 0)
        );
    }

    #[test]
    fn test_split_without_date_attribute() {
        let content = "@attribute id string\n@horizon 1\n@data\nA:1,2\n";
        let dataset = decode_str(content, &DecodeOptions::default()).unwrap();
        let splits = train_test_split(&dataset, "id").unwrap();
        assert_eq!(splits[0].start, None);
        assert_eq!(splits[0].frequency, None);
        assert_eq!(splits[0].test, vec![Some(2.0)]);
    }

    #[test]
    fn test_split_requires_horizon() {
        let content = "@attribute id string\n@data\nA:1,2\n";
        let dataset = decode_str(content, &DecodeOptions::default()).unwrap();
        let err = train_test_split(&dataset, "id").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_series_shorter_than_horizon() {
        let content = "@attribute id string\n@horizon 3\n@data\nA:1,2\n";
        let dataset = decode_str(content, &DecodeOptions::default()).unwrap();
        let err = train_test_split(&dataset, "id").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_split_unknown_key() {
        let dataset = decode_str(SAMPLE, &DecodeOptions::default()).unwrap();
        let err = train_test_split(&dataset, "station").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidKey);
    }
}
