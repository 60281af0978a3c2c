//! Serial link backed by a real USB serial port.
//!
//! Wraps the `serialport` crate behind the [`SerialLink`] trait so the rest
//! of the crate never touches the hardware API directly.

use super::error::PortError;
use super::traits::{LinkSettings, SerialLink};
use std::io::{Read, Write};
use std::time::Duration;

/// Serial link over a real port (`/dev/ttyACM0`, `COM10`, ...).
pub struct UsbSerialLink {
    port: Box<dyn serialport::SerialPort>,
    name: String,
}

impl UsbSerialLink {
    /// Open the port at `path` with the given settings.
    ///
    /// Fails with [`PortError::NotFound`] when the path does not exist and
    /// [`PortError::InvalidSettings`] when the driver rejects the settings;
    /// everything else (permissions, device busy) surfaces as
    /// [`PortError::Serial`].
    pub fn open(path: &str, settings: &LinkSettings) -> Result<Self, PortError> {
        let port = serialport::new(path, settings.baud_rate)
            .timeout(settings.timeout)
            .open()
            .map_err(|e| match e.kind() {
                serialport::ErrorKind::NoDevice => PortError::not_found(path),
                serialport::ErrorKind::InvalidInput => {
                    PortError::invalid_settings(e.to_string())
                }
                _ => PortError::Serial(e),
            })?;

        Ok(Self {
            port,
            name: path.to_string(),
        })
    }
}

impl SerialLink for UsbSerialLink {
    fn write_bytes(&mut self, data: &[u8]) -> Result<usize, PortError> {
        self.port.write(data).map_err(PortError::Io)
    }

    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, PortError> {
        self.port.read(buffer).map_err(PortError::Io)
    }

    fn flush(&mut self) -> Result<(), PortError> {
        self.port.flush().map_err(PortError::Io)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_timeout(&mut self, timeout: Duration) -> Result<(), PortError> {
        self.port.set_timeout(timeout).map_err(PortError::Serial)
    }
}

impl std::fmt::Debug for UsbSerialLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsbSerialLink")
            .field("name", &self.name)
            .field("baud_rate", &self.port.baud_rate())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_missing_port_reports_not_found() {
        let settings = LinkSettings::default();
        let result = UsbSerialLink::open("/dev/nonexistent_port_12345", &settings);

        match result {
            Err(PortError::NotFound(path)) => assert!(path.contains("nonexistent")),
            other => panic!("expected NotFound, got: {:?}", other.err()),
        }
    }
}
