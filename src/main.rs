//! ironbrc CLI
//!
//! Reads a measurements file of `<key>;<value>` lines and prints
//! `{key=min/max/mean, ...}` to stdout.
//!
//! ## Usage
//!
//! ```bash
//! # Default input ./measurements.txt, one worker per CPU
//! ironbrc
//!
//! # Explicit file, 8 workers, 16 MiB blocks
//! ironbrc --input-file data/measurements.txt --workers 8 --block-size 16777216
//!
//! # Load sizing from JSON, write run metrics next to it
//! ironbrc --config run.json --metrics metrics.json
//!
//! # Verbose pipeline logging
//! RUST_LOG=ironbrc=debug ironbrc
//! ```

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use ironbrc::{write_report, ExecMode, RunConfig, Runner};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    Sequential,
    Streaming,
    InMemory,
}

impl From<Mode> for ExecMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Sequential => Self::Sequential,
            Mode::Streaming => Self::Streaming,
            Mode::InMemory => Self::InMemory,
        }
    }
}

#[derive(Parser)]
#[command(name = "ironbrc")]
#[command(author, version, about = "Per-key min/max/mean over <key>;<value> measurement files")]
struct Cli {
    /// Measurements file to aggregate
    #[arg(short, long, default_value = "./measurements.txt")]
    input_file: PathBuf,

    /// JSON run config (workers, block_size, queue depths); flags override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of worker threads (default: one per CPU)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Bytes read per chunk
    #[arg(short, long)]
    block_size: Option<usize>,

    /// Execution mode
    #[arg(short, long, value_enum, default_value = "streaming")]
    mode: Mode,

    /// Write run metrics as JSON to this path
    #[arg(long)]
    metrics: Option<PathBuf>,

    /// Print run metrics to stderr
    #[arg(long)]
    print_metrics: bool,
}

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries only the report.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => RunConfig::from_json_file(path)?,
        None => RunConfig::default(),
    };
    if let Some(workers) = cli.workers {
        config.workers = workers;
    }
    if let Some(block_size) = cli.block_size {
        config.block_size = block_size;
    }

    let file = File::open(&cli.input_file)
        .with_context(|| format!("open {}", cli.input_file.display()))?;
    info!(input = %cli.input_file.display(), "reading measurements");

    let runner = Runner::new(cli.mode.into(), config);
    let summary = runner
        .run(file)
        .with_context(|| format!("aggregate {}", cli.input_file.display()))?;

    write_report(&summary.table, BufWriter::new(io::stdout().lock()))?;

    if cli.print_metrics || cli.metrics.is_some() {
        let metrics = summary.stats.to_collector();
        if cli.print_metrics {
            metrics.print();
        }
        if let Some(path) = &cli.metrics {
            metrics.save_to_file(path)?;
        }
    }
    Ok(())
}
