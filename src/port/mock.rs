//! Scripted serial link for tests.
//!
//! `MockSerialLink` replays canned receive data and records writes, without
//! touching hardware. Receive data is queued in chunks, and each chunk is
//! handed back by a single read, so tests control exactly how the byte
//! stream is sliced across reads.

use super::error::PortError;
use super::traits::SerialLink;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Default)]
struct MockLinkState {
    /// Chunks to hand back, one per read call.
    rx_chunks: VecDeque<Vec<u8>>,
    /// Every write, in order.
    write_log: Vec<Vec<u8>>,
    flush_count: usize,
    /// When set, writes and flushes fail with `BrokenPipe`.
    fail_writes: bool,
    /// When set, reads on an empty queue fail with `BrokenPipe` instead of
    /// timing out, simulating the device disappearing mid-stream.
    error_when_drained: bool,
}

/// Serial link double with scripted receive data and a write log.
///
/// Clones share state, so a test can keep one handle for scripting and
/// inspection while the monitor owns the other.
///
/// # Example
/// ```
/// use blescan_monitor::port::{MockSerialLink, SerialLink};
///
/// let mut link = MockSerialLink::new("MOCK0");
/// link.push_rx(b"hello\n");
///
/// let mut buffer = [0u8; 16];
/// let n = link.read_bytes(&mut buffer).unwrap();
/// assert_eq!(&buffer[..n], b"hello\n");
///
/// link.write_bytes(b"cmd\n").unwrap();
/// assert_eq!(link.write_log(), vec![b"cmd\n".to_vec()]);
/// ```
#[derive(Clone)]
pub struct MockSerialLink {
    name: String,
    state: Arc<Mutex<MockLinkState>>,
}

impl MockSerialLink {
    /// Create a new mock link with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Arc::new(Mutex::new(MockLinkState::default())),
        }
    }

    /// Queue bytes to be returned by one future read call.
    pub fn push_rx(&self, chunk: &[u8]) {
        let mut state = self.state.lock().unwrap();
        state.rx_chunks.push_back(chunk.to_vec());
    }

    /// All data written so far, one entry per write call.
    pub fn write_log(&self) -> Vec<Vec<u8>> {
        let state = self.state.lock().unwrap();
        state.write_log.clone()
    }

    /// How many times the link was flushed.
    pub fn flush_count(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.flush_count
    }

    /// Make subsequent writes and flushes fail with `BrokenPipe`.
    pub fn fail_writes(&self, fail: bool) {
        let mut state = self.state.lock().unwrap();
        state.fail_writes = fail;
    }

    /// Make reads fail with `BrokenPipe` once the receive queue is empty,
    /// instead of reporting a timeout.
    pub fn error_when_drained(&self, error: bool) {
        let mut state = self.state.lock().unwrap();
        state.error_when_drained = error;
    }

    /// Bytes still queued for reading.
    pub fn pending_rx(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.rx_chunks.iter().map(Vec::len).sum()
    }

    fn broken_pipe() -> PortError {
        PortError::Io(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "mock link closed",
        ))
    }
}

impl SerialLink for MockSerialLink {
    fn write_bytes(&mut self, data: &[u8]) -> Result<usize, PortError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_writes {
            return Err(Self::broken_pipe());
        }
        state.write_log.push(data.to_vec());
        Ok(data.len())
    }

    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, PortError> {
        let mut state = self.state.lock().unwrap();

        let Some(mut chunk) = state.rx_chunks.pop_front() else {
            if state.error_when_drained {
                return Err(Self::broken_pipe());
            }
            // Empty queue models the bounded read timeout elapsing.
            return Err(PortError::Io(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "no data within timeout",
            )));
        };

        let n = chunk.len().min(buffer.len());
        buffer[..n].copy_from_slice(&chunk[..n]);
        if n < chunk.len() {
            // Caller's buffer was too small; keep the tail for the next read.
            state.rx_chunks.push_front(chunk.split_off(n));
        }
        Ok(n)
    }

    fn flush(&mut self) -> Result<(), PortError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_writes {
            return Err(Self::broken_pipe());
        }
        state.flush_count += 1;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_timeout(&mut self, _timeout: Duration) -> Result<(), PortError> {
        Ok(())
    }
}

impl std::fmt::Debug for MockSerialLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSerialLink")
            .field("name", &self.name)
            .field("pending_rx", &self.pending_rx())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_return_one_chunk_at_a_time() {
        let mut link = MockSerialLink::new("MOCK0");
        link.push_rx(b"AB");
        link.push_rx(b"CD");

        let mut buffer = [0u8; 16];
        let n = link.read_bytes(&mut buffer).unwrap();
        assert_eq!(&buffer[..n], b"AB");
        let n = link.read_bytes(&mut buffer).unwrap();
        assert_eq!(&buffer[..n], b"CD");
    }

    #[test]
    fn empty_queue_times_out() {
        let mut link = MockSerialLink::new("MOCK0");
        let mut buffer = [0u8; 16];

        let err = link.read_bytes(&mut buffer).unwrap_err();
        assert!(err.is_timeout());
    }

    #[test]
    fn drained_queue_can_report_disconnect() {
        let mut link = MockSerialLink::new("MOCK0");
        link.error_when_drained(true);
        let mut buffer = [0u8; 16];

        let err = link.read_bytes(&mut buffer).unwrap_err();
        assert!(!err.is_timeout());
    }

    #[test]
    fn oversized_chunk_is_split_across_reads() {
        let mut link = MockSerialLink::new("MOCK0");
        link.push_rx(b"ABCDEFGH");

        let mut buffer = [0u8; 3];
        let n = link.read_bytes(&mut buffer).unwrap();
        assert_eq!(&buffer[..n], b"ABC");
        assert_eq!(link.pending_rx(), 5);

        let n = link.read_bytes(&mut buffer).unwrap();
        assert_eq!(&buffer[..n], b"DEF");
    }

    #[test]
    fn writes_are_logged_and_failable() {
        let mut link = MockSerialLink::new("MOCK0");
        link.write_bytes(b"one").unwrap();
        link.write_bytes(b"two").unwrap();
        assert_eq!(link.write_log(), vec![b"one".to_vec(), b"two".to_vec()]);

        link.fail_writes(true);
        assert!(link.write_bytes(b"three").is_err());
        assert!(link.flush().is_err());
    }

    #[test]
    fn shared_state_across_clones() {
        let link = MockSerialLink::new("MOCK0");
        let mut handle = link.clone();
        link.push_rx(b"xyz");

        let mut buffer = [0u8; 8];
        let n = handle.read_bytes(&mut buffer).unwrap();
        assert_eq!(&buffer[..n], b"xyz");
        assert_eq!(link.pending_rx(), 0);
    }
}
