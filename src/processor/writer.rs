//! Parquet writing module for decoded TSF tables

use crate::config::CompressionAlgorithm;
use crate::error::{Result, TsfError};
use polars::prelude::{DataFrame, ParquetWriter as PolarsParquetWriter};
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Writes decoded tables to Parquet
#[derive(Debug, Clone)]
pub struct ParquetWriter {
    compression: CompressionAlgorithm,
}

impl ParquetWriter {
    pub fn new(compression: CompressionAlgorithm) -> Self {
        Self { compression }
    }

    /// Write `frame` to `output_path`, creating parent directories; returns bytes written
    pub fn write(&self, frame: &mut DataFrame, output_path: &Path) -> Result<u64> {
        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(output_path)?;
        PolarsParquetWriter::new(file)
            .with_compression(self.compression.to_polars_compression())
            .finish(frame)
            .map_err(|e| TsfError::ProcessingFailed {
                path: output_path.to_path_buf(),
                reason: format!("Failed to write parquet: {}", e),
            })?;

        let size = std::fs::metadata(output_path)?.len();
        debug!(
            "Wrote {} rows to {} ({} bytes, {:?})",
            frame.height(),
            output_path.display(),
            size,
            self.compression
        );
        Ok(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{NamedFrom, ParquetReader, SerReader, Series};
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("out").join("nested").join("table.parquet");

        let mut frame = DataFrame::new(vec![
            Series::new("series_name".into(), ["T1", "T1"]).into(),
            Series::new("series_value".into(), [1.0, 2.0]).into(),
        ])
        .unwrap();

        let writer = ParquetWriter::new(CompressionAlgorithm::Zstd);
        let size = writer.write(&mut frame, &output).unwrap();

        assert!(output.exists());
        assert!(size > 0);

        let file = File::open(&output).unwrap();
        let read_back = ParquetReader::new(file).finish().unwrap();
        assert_eq!(read_back.shape(), (2, 2));
    }
}
