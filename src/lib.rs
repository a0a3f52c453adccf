//! TSF Processor Library
//!
//! A Rust library for decoding TSF (Time Series File) forecasting datasets
//! into long-format Polars tables: one row per observation, with per-series
//! attributes broadcast or expanded into timestamp sequences.
//!
//! This library provides tools for:
//! - Parsing the `@attribute` / `@frequency` / `@horizon` header section
//! - Decoding series lines with missing-value (`?`) handling
//! - Generating calendar-aware timestamp sequences per frequency
//! - Splitting decoded series into forecast training and test segments
//! - Batch conversion of TSF files to Parquet
//!
//! ```no_run
//! use tsf_processor::{decode_file, DecodeOptions};
//! use std::path::Path;
//!
//! let options = DecodeOptions::default().with_key("series_name");
//! let dataset = decode_file(Path::new("tourism_monthly_dataset.tsf"), &options)?;
//! println!("{} rows, horizon {:?}", dataset.row_count(), dataset.metadata.horizon);
//! # Ok::<(), tsf_processor::TsfError>(())
//! ```

pub mod assembler;
pub mod cli;
pub mod config;
pub mod constants;
pub mod decoder;
pub mod error;
pub mod forecast;
pub mod frequency;
pub mod header;
pub mod materialize;
pub mod models;
pub mod processor;
pub mod reader;
pub mod series;

pub use config::{CompressionAlgorithm, DecodeOptions, TsfConfig};
pub use decoder::{decode, decode_file, decode_str};
pub use error::{ErrorKind, Result, TsfError};
pub use forecast::{SeriesSplit, train_test_split};
pub use frequency::{Frequency, FrequencyClass, Step};
pub use models::{
    Attribute, AttributeSchema, AttributeType, DatasetMetadata, IndexRecommendation,
    ProcessingStats, SeriesRecord, TsfDataset,
};
