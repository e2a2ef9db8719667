//! Mock I/O helpers: awkward readers and temporary measurement files.

use std::io::{self, ErrorKind, Read, Write};
use std::path::Path;

use tempfile::NamedTempFile;

/// A reader that returns at most `max_per_read` bytes per call and reports
/// `Interrupted` before every other successful read.
///
/// Real sources rarely hand out record-aligned reads; this one never does.
pub struct ChunkedReader<R> {
    inner: R,
    max_per_read: usize,
    interrupt_next: bool,
}

impl<R: Read> ChunkedReader<R> {
    pub fn new(inner: R, max_per_read: usize) -> Self {
        Self {
            inner,
            max_per_read: max_per_read.max(1),
            interrupt_next: false,
        }
    }
}

impl<R: Read> Read for ChunkedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.interrupt_next = !self.interrupt_next;
        if self.interrupt_next {
            return Err(io::Error::new(ErrorKind::Interrupted, "try again"));
        }
        let n = buf.len().min(self.max_per_read);
        self.inner.read(&mut buf[..n])
    }
}

/// A reader that serves `data` and then fails with a non-retryable error
/// instead of reporting end of input.
pub struct FailingReader<'a> {
    data: &'a [u8],
}

impl<'a> FailingReader<'a> {
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data }
    }
}

impl Read for FailingReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.data.is_empty() {
            return Err(io::Error::other("simulated device failure"));
        }
        self.data.read(buf)
    }
}

/// Write `contents` to a fresh temporary file, deleted when the handle drops.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn measurements_file(contents: &str) -> io::Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    Ok(file)
}

/// Read a file back as a string (for comparing written reports).
///
/// # Errors
/// Returns an error if the file cannot be read.
pub fn read_to_string(path: impl AsRef<Path>) -> io::Result<String> {
    std::fs::read_to_string(path)
}
