//! # ironbrc
//!
//! Per-key **minimum / maximum / mean** over arbitrarily large streams of
//! `<key>;<value>` measurement records, computed with bounded memory and
//! parallel chunk processing, and reported in one deterministic line:
//!
//! ```text
//! {Kabala=-11.3/96.4/24.9, Khrustalnyi=-6.6/-6.6/-6.6}
//! ```
//!
//! ## Key Features
//!
//! - **Exact arithmetic** - values are parsed into integer tenths, so sums over
//!   billions of records never drift and results do not depend on chunking
//! - **Streaming pipeline** - a reader, a pool of workers and a single merger
//!   run concurrently, connected by bounded queues
//! - **Three execution modes** - streaming, sequential and in-memory (Rayon);
//!   all produce byte-identical output
//! - **Strict input** - malformed records are reported as typed
//!   [`RecordError`]s instead of being silently mis-parsed
//!
//! ## Quick Start
//!
//! ```
//! use ironbrc::*;
//! # use anyhow::Result;
//!
//! # fn main() -> Result<()> {
//! let input = "Kabala;-10.4\nKhrustalnyi;-6.6\nKabala;96.4\nKabala;-11.3";
//!
//! let summary = Runner::default().run(input.as_bytes())?;
//! assert_eq!(
//!     summary.report(),
//!     "{Kabala=-11.3/96.4/24.9, Khrustalnyi=-6.6/-6.6/-6.6}"
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Concepts
//!
//! ### Chunks
//!
//! The [`ChunkSplitter`] reads the source in large blocks and cuts each block
//! after its last newline, carrying the trailing partial record into the next
//! block. Every [`Chunk`] therefore holds only complete records.
//!
//! ### Partial and global tables
//!
//! Each worker turns one chunk into a fresh [`AggregateTable`] (the partial
//! table) and hands it off by value. A single merger folds partial tables into
//! the global table. The reduction ([`MinMaxMean`]) is commutative and
//! associative, so chunk order and worker count never change the result.
//!
//! ### Execution Modes
//!
//! - [`ExecMode::Streaming`] - threaded pipeline, bounded memory (default)
//! - [`ExecMode::Sequential`] - the same steps on the calling thread
//! - [`ExecMode::InMemory`] - buffered input reduced with Rayon
//!
//! ## Module Overview
//!
//! - [`fixed`] - fixed-point value parsing and formatting
//! - [`splitter`] - line-aligned chunking of byte streams
//! - [`chunk`] - per-chunk record scanning
//! - [`combine`] - the combiner trait and min/max/mean reduction
//! - [`table`] - key → aggregate tables and merging
//! - [`runner`] - execution engine
//! - [`report`] - final summary rendering
//! - [`config`] - run configuration
//! - [`metrics`] - run statistics and reporting
//! - [`testing`] - helpers for testing code built on this crate

use std::io::{Read, Write};

use anyhow::Result;

pub mod aggregate;
pub mod chunk;
pub mod combine;
pub mod config;
pub mod error;
pub mod fixed;
pub mod metrics;
pub mod report;
pub mod runner;
pub mod splitter;
pub mod table;
pub mod testing;

pub use aggregate::Aggregate;
pub use chunk::{process_chunk, Chunk};
pub use combine::{CombineFn, MinMaxMean, Stats};
pub use config::RunConfig;
pub use error::{ConfigError, RecordError, ValueError};
pub use fixed::{parse_tenths, Tenths};
pub use metrics::{MetricsCollector, RunStats};
pub use report::{render, write_report};
pub use runner::{ExecMode, Runner, Summary};
pub use splitter::{ChunkSplitter, DEFAULT_BLOCK_SIZE};
pub use table::AggregateTable;

/// Read all of `reader`, aggregate it with the default streaming runner, and
/// write the report to `writer`.
///
/// Nothing is written unless the whole input was processed successfully.
///
/// # Errors
/// Returns any read, parse or write error.
pub fn compute<R: Read, W: Write>(reader: R, writer: W) -> Result<RunStats> {
    let summary = Runner::default().run(reader)?;
    write_report(&summary.table, writer)?;
    Ok(summary.stats)
}
