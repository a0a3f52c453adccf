//! Configuration management.
//!
//! Provides decode options (value column, key, index) and the batch
//! conversion settings used by the processor and the command line.

use crate::constants::DEFAULT_VALUE_COLUMN;
use crate::error::{Result, TsfError};
use polars::prelude::ParquetCompression;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Caller-supplied decode options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeOptions {
    /// Name of the observation value column
    pub value_column: String,

    /// Attribute identifying each series; never inferred
    pub key: Option<String>,

    /// Attribute to index by; defaults to the first date attribute
    pub index: Option<String>,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            value_column: DEFAULT_VALUE_COLUMN.to_string(),
            key: None,
            index: None,
        }
    }
}

impl DecodeOptions {
    pub fn with_value_column(mut self, name: impl Into<String>) -> Self {
        self.value_column = name.into();
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }
}

/// Supported compression algorithms for parquet files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompressionAlgorithm {
    /// Snappy compression - good balance of speed and compression
    Snappy,
    /// ZSTD compression - better compression ratio, slower
    Zstd,
    /// LZ4 compression - fastest, lower compression ratio
    Lz4,
    /// No compression
    Uncompressed,
}

impl CompressionAlgorithm {
    /// Convert to polars ParquetCompression type
    pub fn to_polars_compression(&self) -> ParquetCompression {
        match self {
            CompressionAlgorithm::Snappy => ParquetCompression::Snappy,
            CompressionAlgorithm::Zstd => ParquetCompression::Zstd(None),
            CompressionAlgorithm::Lz4 => ParquetCompression::Lz4Raw,
            CompressionAlgorithm::Uncompressed => ParquetCompression::Uncompressed,
        }
    }
}

impl FromStr for CompressionAlgorithm {
    type Err = TsfError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "snappy" => Ok(CompressionAlgorithm::Snappy),
            "zstd" => Ok(CompressionAlgorithm::Zstd),
            "lz4" => Ok(CompressionAlgorithm::Lz4),
            "none" | "uncompressed" => Ok(CompressionAlgorithm::Uncompressed),
            other => Err(TsfError::configuration(format!(
                "Unknown compression algorithm '{}' (expected snappy, zstd, lz4 or none)",
                other
            ))),
        }
    }
}

/// Global configuration for TSF conversion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TsfConfig {
    /// Options applied to every decoded file
    pub decode: DecodeOptions,

    /// Number of files decoded concurrently
    pub workers: usize,

    /// Parquet compression algorithm
    pub compression: CompressionAlgorithm,

    /// Overwrite outputs that already exist
    pub force_reprocess: bool,

    /// Decode and report without writing Parquet
    pub summary_only: bool,
}

impl Default for TsfConfig {
    fn default() -> Self {
        Self {
            decode: DecodeOptions::default(),
            workers: num_cpus::get(),
            compression: CompressionAlgorithm::Snappy,
            force_reprocess: false,
            summary_only: false,
        }
    }
}

impl TsfConfig {
    /// Create configuration with custom decode options
    pub fn with_decode_options(mut self, decode: DecodeOptions) -> Self {
        self.decode = decode;
        self
    }

    /// Create configuration with custom worker count
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set the parquet compression algorithm
    pub fn with_compression(mut self, compression: CompressionAlgorithm) -> Self {
        self.compression = compression;
        self
    }

    /// Enable force reprocessing
    pub fn with_force_reprocess(mut self) -> Self {
        self.force_reprocess = true;
        self
    }

    /// Enable summary only mode
    pub fn with_summary_only(mut self) -> Self {
        self.summary_only = true;
        self
    }

    /// Check settings that cannot be expressed in the types
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(TsfError::configuration("workers must be at least 1"));
        }
        if self.decode.value_column.trim().is_empty() {
            return Err(TsfError::configuration("value column name must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_defaults() {
        let options = DecodeOptions::default();
        assert_eq!(options.value_column, "series_value");
        assert_eq!(options.key, None);
        assert_eq!(options.index, None);
    }

    #[test]
    fn test_compression_parsing() {
        assert_eq!(
            "ZSTD".parse::<CompressionAlgorithm>().unwrap(),
            CompressionAlgorithm::Zstd
        );
        assert_eq!(
            "none".parse::<CompressionAlgorithm>().unwrap(),
            CompressionAlgorithm::Uncompressed
        );
        assert!("brotli".parse::<CompressionAlgorithm>().is_err());
        assert!(matches!(
            CompressionAlgorithm::Lz4.to_polars_compression(),
            ParquetCompression::Lz4Raw
        ));
    }

    #[test]
    fn test_config_validation() {
        let config = TsfConfig::default();
        assert!(config.workers >= 1);
        assert!(config.validate().is_ok());

        assert!(TsfConfig::default().with_workers(0).validate().is_err());

        let config = TsfConfig::default()
            .with_decode_options(DecodeOptions::default().with_value_column("  "));
        assert!(config.validate().is_err());
    }
}
