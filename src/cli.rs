//! Command-line interface components.

use crate::config::{CompressionAlgorithm, DecodeOptions, TsfConfig};
use crate::constants::DEFAULT_VALUE_COLUMN;
use crate::models::ProcessingStats;
use crate::processor::TsfProcessor;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "tsf-processor")]
#[command(about = "Decode TSF time series datasets into long-format Parquet tables")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// TSF file, or directory searched recursively for *.tsf files
    #[arg(value_name = "INPUT")]
    pub input_path: PathBuf,

    /// Output directory, or a .parquet file when INPUT is a single file
    #[arg(short, long)]
    pub output_path: Option<PathBuf>,

    /// Attribute identifying each series
    #[arg(long)]
    pub key: Option<String>,

    /// Attribute to index by (defaults to the first date attribute)
    #[arg(long)]
    pub index: Option<String>,

    /// Name of the observation value column
    #[arg(long, default_value = DEFAULT_VALUE_COLUMN)]
    pub value_column: String,

    /// Parquet compression algorithm (snappy, zstd, lz4, none)
    #[arg(long, default_value = "snappy")]
    pub compression: String,

    /// Number of files decoded concurrently (defaults to CPU count)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Print decoded meta-data and table shape without writing Parquet
    #[arg(long)]
    pub summary_only: bool,

    /// Overwrite existing Parquet outputs
    #[arg(long)]
    pub force: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    pub fn get_log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }

    /// Build the processing configuration from the arguments
    pub fn to_config(&self) -> Result<TsfConfig> {
        let mut decode = DecodeOptions::default().with_value_column(&self.value_column);
        if let Some(key) = &self.key {
            decode = decode.with_key(key);
        }
        if let Some(index) = &self.index {
            decode = decode.with_index(index);
        }

        let compression: CompressionAlgorithm = self.compression.parse()?;

        let mut config = TsfConfig::default()
            .with_decode_options(decode)
            .with_compression(compression);
        if let Some(workers) = self.workers {
            config = config.with_workers(workers);
        }
        if self.summary_only {
            config = config.with_summary_only();
        }
        if self.force {
            config = config.with_force_reprocess();
        }

        config.validate()?;
        Ok(config)
    }
}

/// Set up structured logging
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tsf_processor={}", log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
}

/// Run the conversion described by `args`
pub async fn run(args: Args) -> Result<ProcessingStats> {
    setup_logging(&args);

    let config = args.to_config().context("Invalid arguments")?;
    let processor = TsfProcessor::new(args.input_path.clone(), args.output_path.clone())
        .with_context(|| format!("Cannot open input {}", args.input_path.display()))?
        .with_config(config);

    let stats = processor.process().await?;
    Ok(stats)
}
