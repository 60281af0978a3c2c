//! Transport-level error types.

use thiserror::Error;

/// Errors from the serial link.
#[derive(Debug, Error)]
pub enum PortError {
    /// The device path does not exist on this system.
    #[error("serial port not found: {0}")]
    NotFound(String),

    /// The requested settings were rejected by the driver.
    #[error("invalid port settings: {0}")]
    InvalidSettings(String),

    /// An I/O error during read, write, or flush.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other serialport-level failure.
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),
}

impl PortError {
    /// Create a `NotFound` error from a port path.
    pub fn not_found(port: impl Into<String>) -> Self {
        Self::NotFound(port.into())
    }

    /// Create an `InvalidSettings` error from a message.
    pub fn invalid_settings(message: impl Into<String>) -> Self {
        Self::InvalidSettings(message.into())
    }

    /// Whether this error is a read timeout, i.e. a normal polling outcome
    /// rather than a transport failure.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::Io(e) if matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
            )
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = PortError::not_found("/dev/ttyUSB0");
        assert_eq!(err.to_string(), "serial port not found: /dev/ttyUSB0");

        let err = PortError::invalid_settings("baud rate 0");
        assert_eq!(err.to_string(), "invalid port settings: baud rate 0");
    }

    #[test]
    fn timeout_classification() {
        let timed_out = PortError::Io(std::io::Error::new(
            std::io::ErrorKind::TimedOut,
            "no data",
        ));
        assert!(timed_out.is_timeout());

        let broken = PortError::Io(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "gone",
        ));
        assert!(!broken.is_timeout());

        assert!(!PortError::not_found("COM10").is_timeout());
    }
}
