//! The subscription command sent to the scanner.
//!
//! The firmware reads a single comma-separated command line: the token
//! before the first comma selects the device type, the rest is the sensor's
//! Bluetooth address. Matching advertisement reports are then streamed back
//! until the link drops.

use std::fmt;
use thiserror::Error;

/// Device type of the sensor the tool was originally built around.
pub const DEFAULT_DEVICE_TYPE: &str = "LYWSD03MMC";

/// Address of that sensor; overridable via config or `--address`.
pub const DEFAULT_ADDRESS: &str = "a4:c1:38:5e:de:26";

/// Rejections while building a [`ScanFilter`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// Device type must be a non-empty ASCII token; a comma would be read
    /// as the field separator by the firmware.
    #[error("invalid device type {0:?}: expected a non-empty ASCII token without ','")]
    InvalidDeviceType(String),

    /// Address must be six colon-separated hex octets.
    #[error("invalid Bluetooth address {0:?}: expected six ':'-separated hex octets")]
    InvalidAddress(String),
}

/// Identifies which sensor's advertisements the scanner should report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanFilter {
    device_type: String,
    address: String,
}

impl ScanFilter {
    /// Build a filter, validating both fields.
    ///
    /// The address is normalized to lowercase so the wire form is stable
    /// regardless of how the user typed it.
    pub fn new(device_type: &str, address: &str) -> Result<Self, FilterError> {
        if device_type.is_empty()
            || !device_type.is_ascii()
            || device_type
                .chars()
                .any(|c| c == ',' || c.is_ascii_whitespace() || c.is_ascii_control())
        {
            return Err(FilterError::InvalidDeviceType(device_type.to_string()));
        }

        Ok(Self {
            device_type: device_type.to_string(),
            address: normalize_address(address)?,
        })
    }

    pub fn device_type(&self) -> &str {
        &self.device_type
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// The wire form of the command, newline-terminated.
    pub fn command_line(&self) -> String {
        format!("{},{}\n", self.device_type, self.address)
    }
}

impl Default for ScanFilter {
    fn default() -> Self {
        Self {
            device_type: DEFAULT_DEVICE_TYPE.to_string(),
            address: DEFAULT_ADDRESS.to_string(),
        }
    }
}

impl fmt::Display for ScanFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.device_type, self.address)
    }
}

fn normalize_address(address: &str) -> Result<String, FilterError> {
    let octets: Vec<&str> = address.split(':').collect();
    let well_formed = octets.len() == 6
        && octets
            .iter()
            .all(|o| o.len() == 2 && o.chars().all(|c| c.is_ascii_hexdigit()));

    if !well_formed {
        return Err(FilterError::InvalidAddress(address.to_string()));
    }
    Ok(address.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_filter_matches_original_sensor() {
        let filter = ScanFilter::default();
        assert_eq!(filter.command_line(), "LYWSD03MMC,a4:c1:38:5e:de:26\n");
    }

    #[test]
    fn address_is_normalized_to_lowercase() {
        let filter = ScanFilter::new("LYWSD03MMC", "A4:C1:38:5E:DE:26").unwrap();
        assert_eq!(filter.address(), "a4:c1:38:5e:de:26");
    }

    #[test]
    fn device_type_rejects_comma_and_whitespace() {
        assert_eq!(
            ScanFilter::new("LY,WS", "a4:c1:38:5e:de:26"),
            Err(FilterError::InvalidDeviceType("LY,WS".to_string()))
        );
        assert!(ScanFilter::new("LY WS", "a4:c1:38:5e:de:26").is_err());
        assert!(ScanFilter::new("", "a4:c1:38:5e:de:26").is_err());
    }

    #[test]
    fn malformed_addresses_are_rejected() {
        for bad in [
            "",
            "a4:c1:38:5e:de",
            "a4:c1:38:5e:de:26:00",
            "a4-c1-38-5e-de-26",
            "g4:c1:38:5e:de:26",
            "a4:c1:38:5e:de:2",
        ] {
            assert!(
                ScanFilter::new("LYWSD03MMC", bad).is_err(),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn display_matches_wire_form_without_newline() {
        let filter = ScanFilter::default();
        assert_eq!(filter.to_string(), "LYWSD03MMC,a4:c1:38:5e:de:26");
    }
}
