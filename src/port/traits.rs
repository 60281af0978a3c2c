//! Core trait for the serial transport.
//!
//! `SerialLink` abstracts the byte-level link to the scanner dongle so the
//! monitor can run against real hardware or a scripted mock.

use super::error::PortError;
use std::time::Duration;

/// Connection parameters for the scanner link.
///
/// The dongle enumerates as a USB CDC ACM device, so framing is fixed at
/// 8N1 and only the baud rate and the read timeout are configurable.
#[derive(Debug, Clone)]
pub struct LinkSettings {
    /// Baud rate (bits per second).
    pub baud_rate: u32,

    /// Read timeout; a read returns empty-handed once it elapses.
    pub timeout: Duration,
}

impl Default for LinkSettings {
    fn default() -> Self {
        Self {
            baud_rate: 115_200,
            timeout: Duration::from_millis(100),
        }
    }
}

/// Byte-level I/O over the serial link.
///
/// A read timeout is a normal polling outcome, not a failure: implementations
/// surface it as `io::ErrorKind::TimedOut` (or `WouldBlock`) wrapped in
/// [`PortError::Io`], and callers keep polling. See [`PortError::is_timeout`].
pub trait SerialLink: Send + std::fmt::Debug {
    /// Write bytes to the device.
    ///
    /// Returns the number of bytes actually accepted.
    fn write_bytes(&mut self, data: &[u8]) -> Result<usize, PortError>;

    /// Read available bytes into `buffer`.
    ///
    /// Returns the number of bytes actually read.
    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, PortError>;

    /// Drain the OS transmit buffer so queued bytes reach the device.
    fn flush(&mut self) -> Result<(), PortError>;

    /// The port path this link was opened on.
    fn name(&self) -> &str;

    /// Replace the read timeout.
    fn set_timeout(&mut self, timeout: Duration) -> Result<(), PortError>;
}
