//! Core data structures and types for TSF decoding.
//!
//! Defines the attribute schema, dataset metadata, per-line series records,
//! the decoded dataset and processing statistics used throughout the library.

use crate::error::{Result, TsfError};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Declared type of a per-series attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeType {
    String,
    Numeric,
    Date,
}

impl AttributeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeType::String => "string",
            AttributeType::Numeric => "numeric",
            AttributeType::Date => "date",
        }
    }
}

impl FromStr for AttributeType {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "string" => Ok(AttributeType::String),
            "numeric" => Ok(AttributeType::Numeric),
            "date" => Ok(AttributeType::Date),
            _ => Err(()),
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `@attribute` declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub attribute_type: AttributeType,
}

/// Ordered attribute declarations; order is output column order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSchema {
    attributes: Vec<Attribute>,
}

impl AttributeSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a declaration; returns false if the name is already declared
    pub fn push(&mut self, name: impl Into<String>, attribute_type: AttributeType) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.attributes.push(Attribute {
            name,
            attribute_type,
        });
        true
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.attributes.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|a| a.name.as_str())
    }

    /// First attribute declared with the `date` type
    pub fn first_date_attribute(&self) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|a| a.attribute_type == AttributeType::Date)
    }
}

impl<'a> IntoIterator for &'a AttributeSchema {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.attributes.iter()
    }
}

/// Scalar dataset meta-data; `None` means the directive was absent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetMetadata {
    pub frequency: Option<String>,
    pub horizon: Option<u32>,
    pub contains_missing: Option<bool>,
    pub equal_length: Option<bool>,
}

/// Missing observations are `None`
pub type Observation = Option<f64>;

/// One decoded series line, prior to attribute materialization
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesRecord {
    /// 1-based line number in the source
    pub line: usize,
    pub attribute_values: Vec<String>,
    pub values: Vec<Observation>,
}

impl SeriesRecord {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }
}

/// Which columns a downstream keyed view should use
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexRecommendation {
    /// No key was requested; `index` is the requested or default date attribute
    Unkeyed { index: Option<String> },
    /// Key and index are both available
    Keyed { key: String, index: String },
    /// A key was requested but no index attribute exists; the flat table is
    /// still returned
    IndexUnavailable { key: String },
}

impl IndexRecommendation {
    pub fn key(&self) -> Option<&str> {
        match self {
            IndexRecommendation::Unkeyed { .. } => None,
            IndexRecommendation::Keyed { key, .. }
            | IndexRecommendation::IndexUnavailable { key } => Some(key.as_str()),
        }
    }

    pub fn index(&self) -> Option<&str> {
        match self {
            IndexRecommendation::Unkeyed { index } => index.as_deref(),
            IndexRecommendation::Keyed { index, .. } => Some(index.as_str()),
            IndexRecommendation::IndexUnavailable { .. } => None,
        }
    }
}

/// Result of decoding one TSF source
#[derive(Debug, Clone)]
pub struct TsfDataset {
    /// Long-format table: one row per observation
    pub frame: DataFrame,
    pub schema: AttributeSchema,
    pub metadata: DatasetMetadata,
    pub index: IndexRecommendation,
    pub value_column: String,
    pub series_count: usize,
}

impl TsfDataset {
    pub fn row_count(&self) -> usize {
        self.frame.height()
    }

    /// Split into `(table, frequency, horizon, contains_missing, equal_length)`
    pub fn into_parts(
        self,
    ) -> (
        DataFrame,
        Option<String>,
        Option<u32>,
        Option<bool>,
        Option<bool>,
    ) {
        let DatasetMetadata {
            frequency,
            horizon,
            contains_missing,
            equal_length,
        } = self.metadata;
        (
            self.frame,
            frequency,
            horizon,
            contains_missing,
            equal_length,
        )
    }

    /// Require a declared horizon
    pub fn require_horizon(&self) -> Result<u32> {
        self.metadata
            .horizon
            .ok_or_else(|| TsfError::configuration("Dataset declares no @horizon"))
    }
}

/// Batch processing statistics
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub files_processed: usize,
    pub files_skipped: usize,
    pub files_failed: usize,
    pub total_series: usize,
    pub total_rows: usize,
    pub output_path: PathBuf,
    pub processing_time_ms: u128,
}
