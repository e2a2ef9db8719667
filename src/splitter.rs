//! Splitting a byte stream into line-aligned chunks.
//!
//! [`ChunkSplitter`] reads fixed-size blocks from any [`Read`] source and cuts
//! each block after its last newline. The bytes after that newline (the start
//! of a record whose end has not been read yet) are carried into the next
//! block, so no record is ever split across two chunks regardless of how the
//! source delivers data.
//!
//! [`split_slice`] does the same for input that is already in memory, without
//! copying.

use std::io::{self, Read};
use std::mem;

use memchr::{memchr, memrchr};

use crate::chunk::Chunk;

/// Default block size read per chunk (32 MiB).
pub const DEFAULT_BLOCK_SIZE: usize = 32 * 1024 * 1024;

pub struct ChunkSplitter<R> {
    reader: R,
    block_size: usize,
    /// Leftover prefix from the previous block, followed by newly read bytes.
    buf: Vec<u8>,
    next_seq: u64,
    bytes_read: u64,
    done: bool,
}

impl<R: Read> ChunkSplitter<R> {
    /// Create a splitter reading `block_size` bytes at a time (minimum 1).
    pub fn new(reader: R, block_size: usize) -> Self {
        let block_size = block_size.max(1);
        Self {
            reader,
            block_size,
            buf: Vec::with_capacity(block_size),
            next_seq: 0,
            bytes_read: 0,
            done: false,
        }
    }

    #[must_use]
    pub const fn block_size(&self) -> usize {
        self.block_size
    }

    /// Bytes consumed from the source so far.
    #[must_use]
    pub const fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Chunks emitted so far.
    #[must_use]
    pub const fn chunks_emitted(&self) -> u64 {
        self.next_seq
    }

    /// Read the next line-aligned chunk.
    ///
    /// Returns `Ok(None)` once the source is exhausted. A final record without
    /// a trailing newline is emitted as its own chunk with `\n` appended.
    ///
    /// # Errors
    /// Returns the source's I/O error (other than `Interrupted`, which is
    /// retried). The splitter yields nothing further after an error.
    pub fn next_chunk(&mut self) -> io::Result<Option<Chunk>> {
        if self.done {
            return Ok(None);
        }

        loop {
            // The carried prefix never contains a newline; only scan new bytes.
            let scanned = self.buf.len();
            let n = match self.fill_block() {
                Ok(n) => n,
                Err(e) => {
                    self.done = true;
                    self.buf = Vec::new();
                    return Err(e);
                }
            };

            if n == 0 {
                self.done = true;
                if self.buf.is_empty() {
                    return Ok(None);
                }
                let mut last = mem::take(&mut self.buf);
                last.push(b'\n');
                return Ok(Some(self.emit(last)));
            }

            if let Some(pos) = memrchr(b'\n', &self.buf[scanned..]) {
                let cut = scanned + pos + 1;
                let mut next = Vec::with_capacity(self.block_size + (self.buf.len() - cut));
                next.extend_from_slice(&self.buf[cut..]);
                self.buf.truncate(cut);
                let chunk = mem::replace(&mut self.buf, next);
                return Ok(Some(self.emit(chunk)));
            }
            // No newline yet: a record longer than one block. Keep reading.
        }
    }

    fn emit(&mut self, bytes: Vec<u8>) -> Chunk {
        let chunk = Chunk::new(self.next_seq, bytes);
        self.next_seq += 1;
        chunk
    }

    /// Append up to `block_size` bytes to `buf`, stopping early only at end of
    /// input. Returns the number of bytes appended.
    ///
    /// Reads go straight into the buffer's spare capacity; `read_to_end`
    /// retries `Interrupted` and keeps whatever arrived before an error.
    fn fill_block(&mut self) -> io::Result<usize> {
        let start = self.buf.len();
        let result = (&mut self.reader)
            .take(self.block_size as u64)
            .read_to_end(&mut self.buf);
        let n = self.buf.len() - start;
        self.bytes_read += n as u64;
        result.map(|_| n)
    }
}

impl<R: Read> Iterator for ChunkSplitter<R> {
    type Item = io::Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_chunk().transpose()
    }
}

/// Split in-memory input into about `parts` line-aligned slices.
///
/// Each slice ends just after a newline, except possibly the last one, which
/// ends wherever the input does. Empty input yields no slices.
#[must_use]
pub fn split_slice(data: &[u8], parts: usize) -> Vec<&[u8]> {
    if data.is_empty() {
        return Vec::new();
    }
    let target = data.len().div_ceil(parts.max(1));
    let mut out = Vec::with_capacity(parts.max(1));
    let mut start = 0usize;
    while start < data.len() {
        let guess = start + target;
        let end = if guess >= data.len() {
            data.len()
        } else {
            memchr(b'\n', &data[guess - 1..]).map_or(data.len(), |p| guess + p)
        };
        out.push(&data[start..end]);
        start = end;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(input: &[u8], block: usize) -> Vec<Vec<u8>> {
        ChunkSplitter::new(input, block)
            .map(|c| c.map(Chunk::into_bytes))
            .collect::<io::Result<_>>()
            .unwrap()
    }

    #[test]
    fn chunks_end_on_newlines() {
        let chunks = collect(b"a;1.0\nbb;2.0\nccc;3.0\n", 8);
        for c in &chunks {
            assert_eq!(c.last(), Some(&b'\n'));
        }
        assert_eq!(chunks.concat(), b"a;1.0\nbb;2.0\nccc;3.0\n");
    }

    #[test]
    fn trailing_record_without_newline_is_emitted() {
        let chunks = collect(b"a;1.0\nb;2.0", 4);
        assert_eq!(chunks.concat(), b"a;1.0\nb;2.0\n");
    }

    #[test]
    fn record_longer_than_block_is_kept_whole() {
        let chunks = collect(b"a-very-long-key;12.5\nb;1.0\n", 3);
        assert_eq!(chunks[0], b"a-very-long-key;12.5\n");
        assert_eq!(chunks.concat(), b"a-very-long-key;12.5\nb;1.0\n");
    }

    #[test]
    fn empty_input_has_no_chunks() {
        assert!(collect(b"", 16).is_empty());
    }

    #[test]
    fn sequence_numbers_and_byte_count() {
        let input = b"a;1.0\nb;2.0\nc;3.0\n";
        let mut s = ChunkSplitter::new(&input[..], 6);
        let mut seqs = Vec::new();
        while let Some(chunk) = s.next_chunk().unwrap() {
            seqs.push(chunk.seq());
        }
        assert_eq!(seqs, vec![0, 1, 2]);
        assert_eq!(s.chunks_emitted(), 3);
        assert_eq!(s.bytes_read(), input.len() as u64);
    }

    #[test]
    fn each_read_consumes_at_most_one_block() {
        let input = b"a;1.0\nbb;2.0\nccc;3.0\n";
        for reader_step in [1, 3, 64] {
            let reader = crate::testing::ChunkedReader::new(&input[..], reader_step);
            let mut s = ChunkSplitter::new(reader, 8);
            let first = s.next_chunk().unwrap().unwrap();
            assert_eq!(s.bytes_read(), 8, "reads of {reader_step} bytes");
            assert_eq!(first.as_bytes(), b"a;1.0\n");

            let rest: Vec<Vec<u8>> = s.map(|c| c.unwrap().into_bytes()).collect();
            assert_eq!(rest.concat(), b"bb;2.0\nccc;3.0\n");
        }
    }

    #[test]
    fn read_error_after_partial_block_is_reported() {
        let mut s = ChunkSplitter::new(crate::testing::FailingReader::new(b"a;1.0\nb;2"), 64);
        assert!(s.next_chunk().is_err());
        assert_eq!(s.bytes_read(), 10);
        assert!(s.next_chunk().unwrap().is_none());
    }

    #[test]
    fn split_slice_is_line_aligned() {
        let data = b"a;1.0\nbb;2.0\nccc;3.0\nd;4.0";
        for parts in 1..8 {
            let slices = split_slice(data, parts);
            assert_eq!(slices.concat(), data.to_vec());
            for s in &slices[..slices.len() - 1] {
                assert_eq!(s.last(), Some(&b'\n'));
            }
        }
        assert!(split_slice(b"", 4).is_empty());
    }
}
