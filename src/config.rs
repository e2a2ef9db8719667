//! Run configuration.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::splitter::DEFAULT_BLOCK_SIZE;

/// Sizing knobs for a run.
///
/// Every field has a default, so a JSON file only needs to name what it
/// overrides:
///
/// ```
/// use ironbrc::RunConfig;
///
/// let cfg: RunConfig = serde_json::from_str(r#"{ "workers": 4 }"#).unwrap();
/// assert_eq!(cfg.workers, 4);
/// assert_eq!(cfg.chunk_queue_capacity(), 8);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Parallel chunk processors. Defaults to the number of logical CPUs.
    pub workers: usize,
    /// Bytes read from the source per chunk.
    pub block_size: usize,
    /// Chunks buffered between the reader and the workers. 0 derives
    /// `2 * workers`.
    pub chunk_queue_depth: usize,
    /// Partial tables buffered between the workers and the merger. 0 derives
    /// `2 * workers`.
    pub partial_queue_depth: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            workers: num_cpus::get().max(1),
            block_size: DEFAULT_BLOCK_SIZE,
            chunk_queue_depth: 0,
            partial_queue_depth: 0,
        }
    }
}

impl RunConfig {
    #[must_use]
    pub const fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    #[must_use]
    pub const fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    #[must_use]
    pub const fn with_queue_depths(mut self, chunks: usize, partials: usize) -> Self {
        self.chunk_queue_depth = chunks;
        self.partial_queue_depth = partials;
        self
    }

    #[must_use]
    pub const fn chunk_queue_capacity(&self) -> usize {
        derive_depth(self.chunk_queue_depth, self.workers)
    }

    #[must_use]
    pub const fn partial_queue_capacity(&self) -> usize {
        derive_depth(self.partial_queue_depth, self.workers)
    }

    /// # Errors
    /// Returns a [`ConfigError`] for a zero worker count or block size.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if self.block_size == 0 {
            return Err(ConfigError::EmptyBlock);
        }
        Ok(())
    }

    /// Load and validate a JSON config file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or parsed, or if the
    /// resulting config fails [`validate`](Self::validate).
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parse run config {}", path.display()))?;
        cfg.validate()
            .with_context(|| format!("invalid run config {}", path.display()))?;
        Ok(cfg)
    }
}

const fn derive_depth(depth: usize, workers: usize) -> usize {
    if depth == 0 {
        workers.saturating_mul(2)
    } else {
        depth
    }
}
