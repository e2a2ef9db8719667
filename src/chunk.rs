//! Line-aligned chunks and the per-chunk record scanner.

use memchr::memchr;

use crate::error::RecordError;
use crate::fixed::parse_tenths;
use crate::table::AggregateTable;

/// A contiguous run of complete records.
///
/// Produced by [`ChunkSplitter`](crate::splitter::ChunkSplitter); never ends
/// in the middle of a record. `seq` is the chunk's position in the input and
/// is only used for diagnostics: chunks may be processed in any order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    seq: u64,
    bytes: Vec<u8>,
}

impl Chunk {
    #[must_use]
    pub const fn new(seq: u64, bytes: Vec<u8>) -> Self {
        Self { seq, bytes }
    }

    #[must_use]
    pub const fn seq(&self) -> u64 {
        self.seq
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Parse every record in `bytes` into a fresh partial table.
///
/// # Errors
/// Returns the first malformed record as a [`RecordError`].
pub fn process_chunk(bytes: &[u8]) -> Result<AggregateTable, RecordError> {
    let mut table = AggregateTable::new();
    scan_records(bytes, &mut table)?;
    Ok(table)
}

/// Scan `bytes` record by record into `table`, returning the number of
/// records seen.
///
/// A record ends at `\n` or at the end of `bytes`; the key ends at the first
/// `;`. Empty lines are skipped.
///
/// # Errors
/// Returns the first malformed record as a [`RecordError`]. Records before it
/// have already been applied to `table`.
pub fn scan_records(bytes: &[u8], table: &mut AggregateTable) -> Result<u64, RecordError> {
    let mut start = 0usize;
    let mut line = 0u64;
    let mut records = 0u64;

    while start < bytes.len() {
        line += 1;
        let rest = &bytes[start..];
        let end = memchr(b'\n', rest).unwrap_or(rest.len());
        let record = &rest[..end];
        start += end + 1;

        if record.is_empty() {
            continue;
        }

        let semi = memchr(b';', record).ok_or(RecordError::MissingDelimiter { line })?;
        let (key, value) = (&record[..semi], &record[semi + 1..]);
        if key.is_empty() {
            return Err(RecordError::EmptyKey { line });
        }
        let key = std::str::from_utf8(key).map_err(|_| RecordError::InvalidKey { line })?;
        let tenths = parse_tenths(value).map_err(|source| RecordError::InvalidValue {
            line,
            value: String::from_utf8_lossy(value).into_owned(),
            source,
        })?;

        table.observe(key, tenths);
        records += 1;
    }

    Ok(records)
}
