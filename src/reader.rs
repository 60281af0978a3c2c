//! Line-buffered reading on top of a [`SerialLink`].
//!
//! The scanner firmware emits one report per line, but the USB link hands
//! the bytes over in arbitrary slices. `LineReader` accumulates raw bytes
//! and resolves them into complete lines, with the delimiter and the decode
//! policy explicit instead of hidden inside a buffered text wrapper.

use crate::port::{PortError, SerialLink};
use memchr::memmem;
use thiserror::Error;

/// Cap on a single line before the buffer is considered garbage.
///
/// The longest report the firmware can produce (a full 31-byte
/// advertisement rendered as hex, plus address and metadata fields) stays
/// well below this.
pub const DEFAULT_MAX_LINE: usize = 1024;

/// Scratch size for a single transport read.
const READ_CHUNK: usize = 256;

/// Errors while resolving the byte stream into lines.
#[derive(Debug, Error)]
pub enum LineError {
    /// A complete line contained bytes outside the ASCII range. The line
    /// has already been dropped from the buffer, so polling may resume.
    #[error("non-ASCII data in received line ({} bytes)", raw.len())]
    Decode {
        /// The undecodable line, delimiter excluded.
        raw: Vec<u8>,
    },

    /// The buffer exceeded the line cap with no delimiter in sight; the
    /// accumulated bytes were discarded to resynchronize.
    #[error("no line delimiter within {dropped} bytes")]
    Overflow { dropped: usize },

    /// The underlying transport failed.
    #[error(transparent)]
    Link(#[from] PortError),
}

/// Accumulates transport reads and yields complete, whitespace-trimmed
/// lines.
///
/// The reader never blocks past the transport's read timeout: when no
/// complete line is available it returns `Ok(None)` and keeps whatever it
/// has buffered for the next call.
#[derive(Debug)]
pub struct LineReader {
    delimiter: Vec<u8>,
    max_line: usize,
    buf: Vec<u8>,
}

impl LineReader {
    /// Create a reader splitting on `delimiter`.
    ///
    /// # Panics
    /// Panics if `delimiter` is empty.
    pub fn new(delimiter: impl Into<Vec<u8>>) -> Self {
        let delimiter = delimiter.into();
        assert!(!delimiter.is_empty(), "line delimiter must not be empty");
        Self {
            delimiter,
            max_line: DEFAULT_MAX_LINE,
            buf: Vec::new(),
        }
    }

    /// Replace the line cap.
    pub fn with_max_line(mut self, max_line: usize) -> Self {
        self.max_line = max_line;
        self
    }

    /// Bytes read but not yet resolved into a line.
    pub fn buffered(&self) -> &[u8] {
        &self.buf
    }

    /// Try to produce one complete line.
    ///
    /// Already-buffered data is checked first; only when it holds no
    /// delimiter does the reader go back to the link, appending until a
    /// delimiter shows up or the read times out. `Ok(None)` means no
    /// complete line yet; buffered bytes are retained for the next call.
    pub fn poll_line(&mut self, link: &mut dyn SerialLink) -> Result<Option<String>, LineError> {
        if let Some(line) = self.take_line()? {
            return Ok(Some(line));
        }

        let mut chunk = [0u8; READ_CHUNK];
        loop {
            match link.read_bytes(&mut chunk) {
                Ok(0) => return Ok(None),
                Ok(n) => {
                    self.buf.extend_from_slice(&chunk[..n]);
                    if let Some(line) = self.take_line()? {
                        return Ok(Some(line));
                    }
                    if self.buf.len() > self.max_line {
                        let dropped = self.buf.len();
                        self.buf.clear();
                        return Err(LineError::Overflow { dropped });
                    }
                }
                Err(e) if e.is_timeout() => return Ok(None),
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Split off the first complete line already in the buffer.
    ///
    /// Consumes the line and its delimiter from the buffer even when the
    /// line fails to decode, so one bad line cannot wedge the stream.
    fn take_line(&mut self) -> Result<Option<String>, LineError> {
        let Some(idx) = memmem::find(&self.buf, &self.delimiter) else {
            return Ok(None);
        };

        let mut raw: Vec<u8> = self.buf.drain(..idx + self.delimiter.len()).collect();
        raw.truncate(idx);

        match String::from_utf8(raw) {
            Ok(line) if line.is_ascii() => Ok(Some(line.trim_end().to_string())),
            Ok(line) => Err(LineError::Decode {
                raw: line.into_bytes(),
            }),
            Err(e) => Err(LineError::Decode {
                raw: e.into_bytes(),
            }),
        }
    }
}
