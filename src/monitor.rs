//! Driver tying the serial link, line reader, and scan filter together.
//!
//! The monitor owns the open port for its whole lifetime: acquired on
//! [`Monitor::connect`], released by drop on every exit path, including a
//! Ctrl-C-initiated stop via the shared stop flag.

use crate::filter::ScanFilter;
use crate::port::{LinkSettings, PortError, SerialLink, UsbSerialLink};
use crate::reader::{LineError, LineReader};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Failures that end a monitoring run.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// The serial link failed to open, write, or read.
    #[error(transparent)]
    Link(#[from] PortError),

    /// The subscription command was already sent on this connection.
    #[error("subscription was already sent on this connection")]
    AlreadySubscribed,

    /// A received line could not be written to the output stream.
    #[error("failed to write received line to output: {0}")]
    Output(std::io::Error),
}

/// Polls the scanner and streams its report lines.
pub struct Monitor<L: SerialLink> {
    link: L,
    reader: LineReader,
    subscribed: bool,
    running: Arc<AtomicBool>,
}

impl Monitor<UsbSerialLink> {
    /// Open the scanner's port and wrap it in a monitor.
    pub fn connect(
        path: &str,
        settings: &LinkSettings,
        reader: LineReader,
    ) -> Result<Self, MonitorError> {
        let link = UsbSerialLink::open(path, settings)?;
        info!(port = path, baud = settings.baud_rate, "connected to scanner");
        Ok(Self::with_link(link, reader))
    }
}

impl<L: SerialLink> Monitor<L> {
    /// Wrap an already-open link. Tests use this with a mock.
    pub fn with_link(link: L, reader: LineReader) -> Self {
        Self {
            link,
            reader,
            subscribed: false,
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Flag checked by the streaming loop.
    ///
    /// Clear it, typically from a Ctrl-C handler, to make [`Monitor::run`]
    /// return and release the port.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    /// Send the subscription command.
    ///
    /// Sent exactly once per connection; the firmware keeps streaming until
    /// the link drops, so there is nothing to repeat. A write or flush
    /// failure here is fatal.
    pub fn subscribe(&mut self, filter: &ScanFilter) -> Result<(), MonitorError> {
        if self.subscribed {
            return Err(MonitorError::AlreadySubscribed);
        }

        let command = filter.command_line();
        let mut remaining = command.as_bytes();
        while !remaining.is_empty() {
            let n = self.link.write_bytes(remaining)?;
            remaining = &remaining[n..];
        }
        self.link.flush()?;

        self.subscribed = true;
        debug!(command = %filter, "subscription sent");
        Ok(())
    }

    /// One polling step: at most one complete line.
    pub fn poll(&mut self) -> Result<Option<String>, LineError> {
        self.reader.poll_line(&mut self.link)
    }

    /// Stream report lines to `out` until the stop flag clears or the
    /// transport fails.
    ///
    /// Read timeouts and empty lines are skipped; malformed lines are
    /// logged and skipped, keeping the stream alive.
    pub fn run(&mut self, out: &mut dyn Write) -> Result<(), MonitorError> {
        while self.running.load(Ordering::SeqCst) {
            match self.poll() {
                Ok(Some(line)) if !line.is_empty() => {
                    writeln!(out, "{line}").map_err(MonitorError::Output)?;
                }
                Ok(_) => {}
                Err(LineError::Decode { raw }) => {
                    warn!(bytes = raw.len(), "dropping line with non-ASCII data");
                }
                Err(LineError::Overflow { dropped }) => {
                    warn!(dropped, "no delimiter found; discarding buffered data");
                }
                Err(LineError::Link(e)) => return Err(e.into()),
            }
        }

        info!(port = self.link.name(), "monitor stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::MockSerialLink;
    use pretty_assertions::assert_eq;

    fn monitor(link: &MockSerialLink) -> Monitor<MockSerialLink> {
        Monitor::with_link(link.clone(), LineReader::new(b"\n".to_vec()))
    }

    #[test]
    fn subscribe_writes_command_and_flushes() {
        let link = MockSerialLink::new("MOCK0");
        let mut mon = monitor(&link);

        mon.subscribe(&ScanFilter::default()).unwrap();

        assert_eq!(
            link.write_log().concat(),
            b"LYWSD03MMC,a4:c1:38:5e:de:26\n".to_vec()
        );
        assert_eq!(link.flush_count(), 1);
    }

    #[test]
    fn subscribe_is_single_shot() {
        let link = MockSerialLink::new("MOCK0");
        let mut mon = monitor(&link);
        let filter = ScanFilter::default();

        mon.subscribe(&filter).unwrap();
        assert!(matches!(
            mon.subscribe(&filter),
            Err(MonitorError::AlreadySubscribed)
        ));
        // Only one command line went out.
        assert_eq!(link.write_log().len(), 1);
    }

    #[test]
    fn subscribe_write_failure_is_fatal() {
        let link = MockSerialLink::new("MOCK0");
        link.fail_writes(true);
        let mut mon = monitor(&link);

        assert!(matches!(
            mon.subscribe(&ScanFilter::default()),
            Err(MonitorError::Link(_))
        ));
    }

    #[test]
    fn poll_surfaces_report_lines() {
        let link = MockSerialLink::new("MOCK0");
        link.push_rx(b"a4:c1:38:5e:de:26,0,-67,0,16,0201060f16\n");
        let mut mon = monitor(&link);

        assert_eq!(
            mon.poll().unwrap(),
            Some("a4:c1:38:5e:de:26,0,-67,0,16,0201060f16".to_string())
        );
        assert_eq!(mon.poll().unwrap(), None);
    }
}
