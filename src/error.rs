//! Typed errors for malformed input and invalid run configuration.
//!
//! Everything else in the crate reports failures through [`anyhow::Result`];
//! these enums exist so callers can tell a bad record or a bad config apart
//! from an I/O failure with `err.downcast_ref::<RecordError>()`.

use thiserror::Error;

/// Why a value field could not be read as a one-fractional-digit decimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("value is empty")]
    Empty,

    #[error("missing decimal point")]
    MissingPoint,

    #[error("no digits before the decimal point")]
    MissingIntegerDigits,

    #[error("expected exactly one fractional digit, found {0}")]
    FractionDigits(usize),

    #[error("unexpected byte {0:#04x}")]
    UnexpectedByte(u8),

    #[error("value does not fit in 64 bits of tenths")]
    Overflow,
}

/// A line that is not a well-formed `<key>;<value>` record.
///
/// `line` is 1-based and counts lines within the chunk that contained the
/// record; the runner attaches the chunk sequence number as context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("line {line}: missing ';' delimiter")]
    MissingDelimiter { line: u64 },

    #[error("line {line}: empty key")]
    EmptyKey { line: u64 },

    #[error("line {line}: key is not valid UTF-8")]
    InvalidKey { line: u64 },

    #[error("line {line}: invalid value {value:?}: {source}")]
    InvalidValue {
        line: u64,
        value: String,
        #[source]
        source: ValueError,
    },
}

impl RecordError {
    /// Line number (within its chunk) of the offending record.
    #[must_use]
    pub const fn line(&self) -> u64 {
        match self {
            Self::MissingDelimiter { line }
            | Self::EmptyKey { line }
            | Self::InvalidKey { line }
            | Self::InvalidValue { line, .. } => *line,
        }
    }
}

/// Run configuration rejected before any input is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("worker count must be at least 1")]
    NoWorkers,

    #[error("block size must be at least 1 byte")]
    EmptyBlock,
}
