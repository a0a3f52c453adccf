//! Long-format table assembly.
//!
//! Owns one column builder per declared attribute plus the value column,
//! folds each decoded series into them, and produces the final DataFrame
//! together with the key/index recommendation.

use crate::config::DecodeOptions;
use crate::error::{Result, TsfError};
use crate::header::TsfHeader;
use crate::materialize::{AttributeMaterializer, ColumnBuilder};
use crate::models::{IndexRecommendation, Observation, SeriesRecord, TsfDataset};
use polars::prelude::*;
use tracing::{debug, trace, warn};

/// Accumulates materialized columns across all series of one decode
#[derive(Debug)]
pub struct TableAssembler {
    builders: Vec<ColumnBuilder>,
    values: Vec<Observation>,
    value_column: String,
    materializer: AttributeMaterializer,
    series_count: usize,
}

impl TableAssembler {
    pub fn new(header: &TsfHeader, value_column: &str) -> Result<Self> {
        if header.schema.contains(value_column) {
            return Err(TsfError::configuration(format!(
                "Value column '{}' collides with a declared attribute",
                value_column
            )));
        }

        Ok(Self {
            builders: header.schema.iter().map(ColumnBuilder::for_attribute).collect(),
            values: Vec::new(),
            value_column: value_column.to_string(),
            materializer: AttributeMaterializer::new(header.metadata.frequency.clone()),
            series_count: 0,
        })
    }

    /// Fold one series into the table
    pub fn push_series(&mut self, record: SeriesRecord) -> Result<()> {
        let count = record.len();
        for (builder, raw) in self.builders.iter_mut().zip(&record.attribute_values) {
            self.materializer
                .materialize(builder, raw, count, record.line)?;
        }

        trace!(
            "Series at line {}: {} values ({} missing)",
            record.line,
            count,
            record.missing_count()
        );

        self.values.extend(record.values);
        self.series_count += 1;
        Ok(())
    }

    pub fn series_count(&self) -> usize {
        self.series_count
    }

    pub fn row_count(&self) -> usize {
        self.values.len()
    }

    /// Validate the requested key/index and build the output table
    pub fn finish(self, header: TsfHeader, options: &DecodeOptions) -> Result<TsfDataset> {
        let index = recommend_index(&header, options)?;

        let row_count = self.values.len();
        let mut columns = Vec::with_capacity(self.builders.len() + 1);
        for builder in self.builders {
            debug_assert_eq!(builder.len(), row_count, "column {}", builder.name());
            columns.push(builder.finish()?);
        }
        columns.push(Series::new(self.value_column.as_str().into(), self.values).into());

        let frame = DataFrame::new(columns)?;
        debug!(
            "Assembled table: {} series, {} rows, {} columns",
            self.series_count,
            frame.height(),
            frame.width()
        );

        Ok(TsfDataset {
            frame,
            schema: header.schema,
            metadata: header.metadata,
            index,
            value_column: self.value_column,
            series_count: self.series_count,
        })
    }
}

fn recommend_index(header: &TsfHeader, options: &DecodeOptions) -> Result<IndexRecommendation> {
    if let Some(key) = &options.key {
        if !header.schema.contains(key) {
            return Err(TsfError::InvalidKey { key: key.clone() });
        }
    }
    if let Some(index) = &options.index {
        if !header.schema.contains(index) {
            return Err(TsfError::InvalidIndex {
                index: index.clone(),
            });
        }
    }

    let index = options
        .index
        .clone()
        .or_else(|| header.default_index().map(str::to_string));

    Ok(match (options.key.clone(), index) {
        (None, index) => IndexRecommendation::Unkeyed { index },
        (Some(key), Some(index)) => IndexRecommendation::Keyed { key, index },
        (Some(key), None) => {
            warn!(
                "Key '{}' requested but no index attribute is available; returning unindexed table",
                key
            );
            IndexRecommendation::IndexUnavailable { key }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::{AttributeSchema, AttributeType, DatasetMetadata};

    fn header(attributes: &[(&str, AttributeType)], frequency: Option<&str>) -> TsfHeader {
        let mut schema = AttributeSchema::new();
        for (name, attribute_type) in attributes {
            schema.push(*name, *attribute_type);
        }
        TsfHeader {
            schema,
            metadata: DatasetMetadata {
                frequency: frequency.map(str::to_string),
                ..Default::default()
            },
            data_marker_line: 1,
        }
    }

    fn record(line: usize, attributes: &[&str], values: &[Observation]) -> SeriesRecord {
        SeriesRecord {
            line,
            attribute_values: attributes.iter().map(|s| s.to_string()).collect(),
            values: values.to_vec(),
        }
    }

    #[test]
    fn test_columns_follow_schema_order() {
        let header = header(
            &[
                ("series_name", AttributeType::String),
                ("state", AttributeType::Numeric),
                ("start_timestamp", AttributeType::Date),
            ],
            Some("daily"),
        );
        let mut assembler = TableAssembler::new(&header, "series_value").unwrap();
        assembler
            .push_series(record(2, &["T1", "3", "2020-01-01 00-00-00"], &[Some(1.0), None]))
            .unwrap();
        assembler
            .push_series(record(3, &["T2", "4", "2020-06-01 00-00-00"], &[Some(2.0)]))
            .unwrap();
        assert_eq!(assembler.row_count(), 3);

        let dataset = assembler.finish(header, &DecodeOptions::default()).unwrap();
        assert_eq!(
            dataset.frame.get_column_names_str(),
            vec!["series_name", "state", "start_timestamp", "series_value"]
        );
        assert_eq!(dataset.frame.height(), 3);
        assert_eq!(dataset.series_count, 2);
        assert_eq!(
            dataset.index,
            IndexRecommendation::Unkeyed {
                index: Some("start_timestamp".into())
            }
        );

        let values: Vec<Option<f64>> = dataset
            .frame
            .column("series_value")
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(values, vec![Some(1.0), None, Some(2.0)]);
    }

    #[test]
    fn test_value_column_collision() {
        let header = header(&[("series_value", AttributeType::String)], None);
        let err = TableAssembler::new(&header, "series_value").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_keyed_recommendation() {
        let header = header(
            &[
                ("series_name", AttributeType::String),
                ("start_timestamp", AttributeType::Date),
            ],
            Some("monthly"),
        );
        let options = DecodeOptions::default().with_key("series_name");
        assert_eq!(
            recommend_index(&header, &options).unwrap(),
            IndexRecommendation::Keyed {
                key: "series_name".into(),
                index: "start_timestamp".into()
            }
        );
    }

    #[test]
    fn test_explicit_index_overrides_default() {
        let header = header(
            &[
                ("series_name", AttributeType::String),
                ("start_timestamp", AttributeType::Date),
                ("end_timestamp", AttributeType::Date),
            ],
            Some("monthly"),
        );
        let options = DecodeOptions::default()
            .with_key("series_name")
            .with_index("end_timestamp");
        assert_eq!(
            recommend_index(&header, &options).unwrap().index(),
            Some("end_timestamp")
        );
    }

    #[test]
    fn test_index_unavailable_is_not_an_error() {
        let header = header(&[("series_name", AttributeType::String)], None);
        let options = DecodeOptions::default().with_key("series_name");
        assert_eq!(
            recommend_index(&header, &options).unwrap(),
            IndexRecommendation::IndexUnavailable {
                key: "series_name".into()
            }
        );
    }

    #[test]
    fn test_undeclared_key_and_index() {
        let header = header(&[("series_name", AttributeType::String)], None);

        let options = DecodeOptions::default().with_key("station");
        let err = recommend_index(&header, &options).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidKey);

        let options = DecodeOptions::default().with_index("timestamp");
        let err = recommend_index(&header, &options).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidIndex);
    }
}
