//! Serial transport layer.
//!
//! Provides the [`SerialLink`] trait plus a real USB-backed implementation
//! and a scripted mock, enabling dependency injection and testing.

pub mod error;
pub mod mock;
pub mod traits;
pub mod usb;

pub use error::PortError;
pub use mock::MockSerialLink;
pub use traits::{LinkSettings, SerialLink};
pub use usb::UsbSerialLink;
