//! Execution engine.
//!
//! Three execution modes share the same building blocks (splitter, chunk
//! scanner, table merge) and produce byte-identical reports:
//!
//! - [`ExecMode::Streaming`] (default): a three-stage pipeline. The calling
//!   thread reads line-aligned chunks and feeds a bounded queue; `workers`
//!   scoped threads each turn one chunk at a time into a private partial table;
//!   one merger thread folds partial tables into the global table. Memory is
//!   bounded by the queue depths times the block size.
//! - [`ExecMode::Sequential`]: the same chunk/partial/merge steps on the
//!   calling thread.
//! - [`ExecMode::InMemory`]: the whole input is buffered, cut into
//!   line-aligned partitions and reduced with Rayon (local tables per
//!   partition, then a merge).
//!
//! Any error aborts the whole run; a partially merged table is never returned.

use std::any::Any;
use std::io::Read;
use std::thread;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use crossbeam_channel::{bounded, Receiver, Sender};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::chunk::{process_chunk, Chunk};
use crate::config::RunConfig;
use crate::metrics::RunStats;
use crate::report::render;
use crate::splitter::{split_slice, ChunkSplitter};
use crate::table::AggregateTable;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExecMode {
    Sequential,
    #[default]
    Streaming,
    InMemory,
}

/// The frozen result of a run.
#[derive(Clone, Debug)]
pub struct Summary {
    pub table: AggregateTable,
    pub stats: RunStats,
}

impl Summary {
    /// The formatted `{key=min/max/mean, ...}` report.
    #[must_use]
    pub fn report(&self) -> String {
        render(&self.table)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Runner {
    pub mode: ExecMode,
    pub config: RunConfig,
}

/// What a mode hands back before stats are assembled.
struct Pass {
    table: AggregateTable,
    bytes_read: u64,
    chunks: u64,
}

impl Runner {
    #[must_use]
    pub const fn new(mode: ExecMode, config: RunConfig) -> Self {
        Self { mode, config }
    }

    /// Aggregate everything `reader` yields.
    ///
    /// # Errors
    /// Returns an error for an invalid config, a source I/O failure, a
    /// malformed record ([`RecordError`](crate::RecordError) can be downcast
    /// from the result), or a panicked pipeline stage.
    pub fn run<R: Read>(&self, mut reader: R) -> Result<Summary> {
        self.config.validate().context("invalid run config")?;
        let started = Instant::now();
        info!(
            mode = ?self.mode,
            workers = self.config.workers,
            block_size = self.config.block_size,
            "starting run"
        );

        let pass = match self.mode {
            ExecMode::Sequential => run_sequential(reader, &self.config)?,
            ExecMode::Streaming => run_streaming(reader, &self.config)?,
            ExecMode::InMemory => {
                let mut data = Vec::new();
                reader.read_to_end(&mut data).context("read input")?;
                run_in_memory(&data, &self.config)?
            }
        };

        Ok(self.finish(pass, started))
    }

    /// Aggregate input that is already in memory.
    ///
    /// # Errors
    /// Same as [`run`](Self::run), minus source I/O failures.
    pub fn run_bytes(&self, data: &[u8]) -> Result<Summary> {
        match self.mode {
            ExecMode::InMemory => {
                self.config.validate().context("invalid run config")?;
                let started = Instant::now();
                info!(
                    mode = ?self.mode,
                    workers = self.config.workers,
                    bytes = data.len(),
                    "starting run"
                );
                let pass = run_in_memory(data, &self.config)?;
                Ok(self.finish(pass, started))
            }
            ExecMode::Sequential | ExecMode::Streaming => self.run(data),
        }
    }

    fn finish(&self, pass: Pass, started: Instant) -> Summary {
        let stats = RunStats {
            mode: self.mode,
            workers: self.config.workers,
            bytes_read: pass.bytes_read,
            chunks: pass.chunks,
            records: pass.table.records(),
            keys: pass.table.len() as u64,
            elapsed: started.elapsed(),
        };
        info!(
            keys = stats.keys,
            records = stats.records,
            chunks = stats.chunks,
            bytes = stats.bytes_read,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "run finished"
        );
        Summary {
            table: pass.table,
            stats,
        }
    }
}

/// Sequential executor: one chunk at a time on the calling thread.
fn run_sequential<R: Read>(reader: R, cfg: &RunConfig) -> Result<Pass> {
    let mut splitter = ChunkSplitter::new(reader, cfg.block_size);
    let mut table = AggregateTable::new();
    while let Some(chunk) = splitter.next_chunk().context("read input")? {
        trace!(seq = chunk.seq(), bytes = chunk.len(), "processing chunk");
        let partial = process_chunk(chunk.as_bytes())
            .with_context(|| format!("parse chunk #{}", chunk.seq()))?;
        table.merge(partial);
    }
    Ok(Pass {
        table,
        bytes_read: splitter.bytes_read(),
        chunks: splitter.chunks_emitted(),
    })
}

/// Streaming executor: reader → chunk queue → workers → partial queue → merger.
fn run_streaming<R: Read>(reader: R, cfg: &RunConfig) -> Result<Pass> {
    let (chunk_tx, chunk_rx) = bounded::<Chunk>(cfg.chunk_queue_capacity());
    let (partial_tx, partial_rx) = bounded::<Result<AggregateTable>>(cfg.partial_queue_capacity());
    let mut splitter = ChunkSplitter::new(reader, cfg.block_size);

    let (produced, workers_ok, merged) = thread::scope(|s| {
        let merger = s.spawn(move || merge_partials(partial_rx));

        let workers: Vec<_> = (0..cfg.workers)
            .map(|id| {
                let chunks = chunk_rx.clone();
                let partials = partial_tx.clone();
                s.spawn(move || worker_loop(id, chunks, partials))
            })
            .collect();
        // Only the workers hold these now; the queues close when they exit.
        drop(chunk_rx);
        drop(partial_tx);

        let produced = produce(&mut splitter, chunk_tx);

        let mut joined: Result<()> = Ok(());
        for (id, worker) in workers.into_iter().enumerate() {
            if let Err(payload) = worker.join() {
                if joined.is_ok() {
                    joined = Err(anyhow!(
                        "worker thread {id} panicked: {}",
                        panic_message(payload.as_ref())
                    ));
                }
            }
        }
        let merged = merger.join().unwrap_or_else(|payload| {
            Err(anyhow!(
                "merger thread panicked: {}",
                panic_message(payload.as_ref())
            ))
        });
        (produced, joined, merged)
    });

    produced?;
    workers_ok?;
    let table = merged?;
    Ok(Pass {
        table,
        bytes_read: splitter.bytes_read(),
        chunks: splitter.chunks_emitted(),
    })
}

/// Feed chunks to the workers until the input ends or nobody is listening.
fn produce<R: Read>(splitter: &mut ChunkSplitter<R>, chunks: Sender<Chunk>) -> Result<()> {
    while let Some(chunk) = splitter.next_chunk().context("read input")? {
        trace!(seq = chunk.seq(), bytes = chunk.len(), "chunk emitted");
        if chunks.send(chunk).is_err() {
            debug!("all workers stopped; abandoning remaining input");
            break;
        }
    }
    Ok(())
}

fn worker_loop(id: usize, chunks: Receiver<Chunk>, partials: Sender<Result<AggregateTable>>) {
    debug!(worker = id, "worker started");
    let mut processed = 0u64;
    for chunk in chunks {
        let partial = process_chunk(chunk.as_bytes())
            .with_context(|| format!("parse chunk #{}", chunk.seq()));
        let failed = partial.is_err();
        trace!(worker = id, seq = chunk.seq(), failed, "chunk processed");
        if partials.send(partial).is_err() || failed {
            break;
        }
        processed += 1;
    }
    debug!(worker = id, chunks = processed, "worker finished");
}

/// Single consumer of partial tables. Returns on the first error, which drops
/// the receiver and winds the rest of the pipeline down.
fn merge_partials(partials: Receiver<Result<AggregateTable>>) -> Result<AggregateTable> {
    let mut global = AggregateTable::new();
    for partial in partials {
        match partial {
            Ok(table) => global.merge(table),
            Err(e) => {
                debug!(error = %e, "aborting merge");
                return Err(e);
            }
        }
    }
    Ok(global)
}

/// Best-effort text of a panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "non-string panic payload"
    }
}

/// In-memory executor: line-aligned partitions → Rayon local tables → merge.
fn run_in_memory(data: &[u8], cfg: &RunConfig) -> Result<Pass> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(cfg.workers)
        .build()
        .context("build worker pool")?;

    // Two partitions per worker, as the default runner partitioning does.
    let partitions = split_slice(data, cfg.workers.saturating_mul(2));
    let chunks = partitions.len() as u64;

    let locals: Vec<AggregateTable> = pool.install(|| {
        partitions
            .into_par_iter()
            .enumerate()
            .map(|(seq, part)| {
                process_chunk(part).with_context(|| format!("parse partition #{seq}"))
            })
            .collect::<Result<Vec<_>>>()
    })?;

    let table = locals
        .into_iter()
        .fold(AggregateTable::new(), |mut acc, local| {
            acc.merge(local);
            acc
        });

    Ok(Pass {
        table,
        bytes_read: data.len() as u64,
        chunks,
    })
}
