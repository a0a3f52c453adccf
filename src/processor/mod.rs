//! Batch conversion engine.
//!
//! Discovers TSF files, decodes them concurrently on the blocking pool and
//! writes one Parquet file per input. A failing file is counted and logged;
//! it never aborts the rest of the batch.

pub mod discovery;
pub mod writer;

#[cfg(test)]
pub mod tests;

use self::{discovery::FileDiscovery, writer::ParquetWriter};

use crate::config::TsfConfig;
use crate::constants::PARQUET_EXTENSION;
use crate::decoder::decode_file;
use crate::error::{Result, TsfError};
use crate::models::{IndexRecommendation, ProcessingStats, TsfDataset};

use colored::*;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::task;
use tracing::{debug, error, info};

/// Outcome of converting one input file
#[derive(Debug)]
pub enum FileOutcome {
    Converted { series: usize, rows: usize },
    Skipped,
    Failed { path: PathBuf, error: TsfError },
}

/// Main processor for TSF batch conversion
#[derive(Debug)]
pub struct TsfProcessor {
    input_path: PathBuf,
    output_path: PathBuf,
    config: TsfConfig,
    file_discovery: FileDiscovery,
}

impl TsfProcessor {
    /// Create a new processor
    ///
    /// Without an explicit output, Parquet files go to a `parquet` directory
    /// next to the input.
    pub fn new(input_path: PathBuf, output_path: Option<PathBuf>) -> Result<Self> {
        if !input_path.exists() {
            return Err(TsfError::FileNotFound { path: input_path });
        }

        let output_path = output_path.unwrap_or_else(|| {
            let base = if input_path.is_file() {
                input_path.parent().unwrap_or_else(|| Path::new("."))
            } else {
                input_path.as_path()
            };
            base.join(PARQUET_EXTENSION)
        });

        Ok(Self {
            file_discovery: FileDiscovery::new(input_path.clone()),
            input_path,
            output_path,
            config: TsfConfig::default(),
        })
    }

    /// Configure the processor
    pub fn with_config(mut self, config: TsfConfig) -> Self {
        self.config = config;
        self
    }

    /// Destination for one input file
    ///
    /// Relative directory structure under the input root is preserved. A
    /// single-file input with an output ending in `.parquet` is written there.
    pub fn output_path_for(&self, input: &Path) -> PathBuf {
        let output_is_file = self
            .output_path
            .extension()
            .is_some_and(|ext| ext == PARQUET_EXTENSION);
        if self.input_path.is_file() && output_is_file {
            return self.output_path.clone();
        }

        let relative = input
            .strip_prefix(self.file_discovery.root())
            .unwrap_or(input);
        self.output_path
            .join(relative)
            .with_extension(PARQUET_EXTENSION)
    }

    /// Main processing entry point
    pub async fn process(&self) -> Result<ProcessingStats> {
        self.config.validate()?;
        let start_time = Instant::now();

        println!("{}", "Starting TSF conversion".bright_green().bold());
        println!("  {} {}", "Input:".bright_cyan(), self.input_path.display());
        if !self.config.summary_only {
            println!("  {} {}", "Output:".bright_cyan(), self.output_path.display());
        }

        let files = self.file_discovery.discover_tsf_files()?;
        println!(
            "  {} {} TSF files",
            "Found".bright_green(),
            files.len().to_string().bright_white().bold()
        );

        let mut stats = ProcessingStats {
            output_path: self.output_path.clone(),
            ..Default::default()
        };
        if files.is_empty() {
            stats.processing_time_ms = start_time.elapsed().as_millis();
            return Ok(stats);
        }

        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb.set_message("Decoding files");

        let concurrent_limit = self.config.workers.min(files.len());
        debug!("Converting {} files with {} workers", files.len(), concurrent_limit);

        let outcomes: Vec<FileOutcome> = stream::iter(files)
            .map(|file_path| {
                let pb = pb.clone();
                async move {
                    if let Some(file_name) = file_path.file_name() {
                        pb.set_message(format!("Decoding: {}", file_name.to_string_lossy()));
                    }
                    let outcome = self.convert_file(file_path).await;
                    pb.inc(1);
                    outcome
                }
            })
            .buffer_unordered(concurrent_limit)
            .collect()
            .await;

        pb.finish_and_clear();

        for outcome in outcomes {
            match outcome {
                FileOutcome::Converted { series, rows } => {
                    stats.files_processed += 1;
                    stats.total_series += series;
                    stats.total_rows += rows;
                }
                FileOutcome::Skipped => stats.files_skipped += 1,
                FileOutcome::Failed { path, error } => {
                    println!(
                        "  {} {}: {}",
                        "Failed".bright_red(),
                        path.display(),
                        error
                    );
                    stats.files_failed += 1;
                }
            }
        }

        stats.processing_time_ms = start_time.elapsed().as_millis();
        print_summary(&stats);
        Ok(stats)
    }

    /// Decode one file on the blocking pool and write its Parquet output
    async fn convert_file(&self, file_path: PathBuf) -> FileOutcome {
        let output_path = self.output_path_for(&file_path);
        if !self.config.summary_only && !self.config.force_reprocess && output_path.exists() {
            debug!("Skipping {}: output exists", file_path.display());
            return FileOutcome::Skipped;
        }

        let options = self.config.decode.clone();
        let summary_only = self.config.summary_only;
        let writer = ParquetWriter::new(self.config.compression);
        let task_path = file_path.clone();

        let result = task::spawn_blocking(move || -> Result<TsfDataset> {
            let mut dataset = decode_file(&task_path, &options)?;
            if !summary_only {
                writer.write(&mut dataset.frame, &output_path)?;
            }
            Ok(dataset)
        })
        .await;

        match result {
            Ok(Ok(dataset)) => {
                info!(
                    "Decoded {}: {} series, {} rows",
                    file_path.display(),
                    dataset.series_count,
                    dataset.row_count()
                );
                if summary_only {
                    print_dataset_report(&file_path, &dataset);
                }
                FileOutcome::Converted {
                    series: dataset.series_count,
                    rows: dataset.row_count(),
                }
            }
            Ok(Err(error)) => {
                error!("Failed to convert {}: {}", file_path.display(), error);
                FileOutcome::Failed {
                    path: file_path,
                    error,
                }
            }
            Err(join_error) => {
                error!("Conversion task for {} panicked: {}", file_path.display(), join_error);
                FileOutcome::Failed {
                    error: TsfError::ProcessingFailed {
                        path: file_path.clone(),
                        reason: join_error.to_string(),
                    },
                    path: file_path,
                }
            }
        }
    }
}

/// Print the decoded meta-data and table shape of one dataset
pub fn print_dataset_report(path: &Path, dataset: &TsfDataset) {
    let unspecified = || "unspecified".bright_black().to_string();
    let metadata = &dataset.metadata;

    println!("\n{}", path.display().to_string().bright_green().bold());
    println!(
        "  {} {}",
        "Attributes:".bright_cyan(),
        dataset
            .schema
            .iter()
            .map(|a| format!("{} ({})", a.name, a.attribute_type))
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!(
        "  {} {}",
        "Frequency:".bright_cyan(),
        metadata.frequency.clone().unwrap_or_else(unspecified)
    );
    println!(
        "  {} {}",
        "Horizon:".bright_cyan(),
        metadata
            .horizon
            .map(|h| h.to_string())
            .unwrap_or_else(unspecified)
    );
    println!(
        "  {} {}",
        "Missing values:".bright_cyan(),
        metadata
            .contains_missing
            .map(|m| m.to_string())
            .unwrap_or_else(unspecified)
    );
    println!(
        "  {} {}",
        "Equal length:".bright_cyan(),
        metadata
            .equal_length
            .map(|e| e.to_string())
            .unwrap_or_else(unspecified)
    );
    println!(
        "  {} {} series, {} rows x {} columns",
        "Table:".bright_cyan(),
        dataset.series_count.to_string().bright_white().bold(),
        dataset.row_count().to_string().bright_white().bold(),
        dataset.frame.width()
    );
    match &dataset.index {
        IndexRecommendation::Keyed { key, index } => {
            println!("  {} key={}, index={}", "Index:".bright_cyan(), key, index)
        }
        IndexRecommendation::Unkeyed { index: Some(index) } => {
            println!("  {} index={} (no key)", "Index:".bright_cyan(), index)
        }
        IndexRecommendation::Unkeyed { index: None } => {}
        IndexRecommendation::IndexUnavailable { key } => println!(
            "  {} key={} but no index attribute available",
            "Index:".bright_yellow(),
            key
        ),
    }
}

fn print_summary(stats: &ProcessingStats) {
    println!("\n{}", "Processing Summary".bright_green().bold());
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        stats.processing_time_ms.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Files processed:".bright_cyan(),
        stats.files_processed.to_string().bright_white()
    );
    if stats.files_skipped > 0 {
        println!(
            "  {} {}",
            "Files skipped:".bright_yellow(),
            stats.files_skipped.to_string().bright_yellow()
        );
    }
    if stats.files_failed > 0 {
        println!(
            "  {} {}",
            "Files failed:".bright_red(),
            stats.files_failed.to_string().bright_red().bold()
        );
    }
    println!(
        "  {} {}",
        "Total series:".bright_cyan(),
        stats.total_series.to_string().bright_white().bold()
    );
    println!(
        "  {} {}",
        "Total rows:".bright_cyan(),
        stats.total_rows.to_string().bright_white().bold()
    );
}
