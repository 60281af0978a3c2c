//! Host-side monitor for a BLE advertisement scanner dongle.
//!
//! The scanner firmware listens for BLE advertisements and forwards
//! matching reports over a USB serial link, one text line per
//! advertisement. This crate opens the link, sends the one-line
//! subscription command (`"<DEVICE_TYPE>,<MAC_ADDRESS>\n"`), and streams
//! the report lines to stdout.
//!
//! # Modules
//!
//! - `config`: TOML configuration with environment overrides
//! - `error`: unified error handling
//! - `filter`: the subscription command payload
//! - `monitor`: the polling driver
//! - `port`: serial transport abstraction (real port + mock)
//! - `reader`: line-buffered reading over the transport

pub mod config;
pub mod error;
pub mod filter;
pub mod monitor;
pub mod port;
pub mod reader;

// Re-export commonly used types for convenience
pub use config::{Config, ConfigLoader};
pub use error::AppError;
pub use filter::{FilterError, ScanFilter};
pub use monitor::{Monitor, MonitorError};
pub use port::{LinkSettings, MockSerialLink, PortError, SerialLink, UsbSerialLink};
pub use reader::{LineError, LineReader};
