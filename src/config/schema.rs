//! Configuration schema definitions.

use crate::filter::{DEFAULT_ADDRESS, DEFAULT_DEVICE_TYPE};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Serial link configuration
    pub serial: SerialSection,
    /// Scan filter (which sensor to subscribe to)
    pub filter: FilterSection,
    /// Logging configuration
    pub logging: LoggingSection,
}

/// Serial link configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialSection {
    /// Port path; when unset, the platform placeholder is used.
    pub port: Option<String>,
    /// Default baud rate
    pub default_baud: u32,
    /// Read timeout in milliseconds
    pub timeout_ms: u64,
    /// Line delimiter on the receive side
    pub line_ending: String,
    /// Longest line accepted before the receive buffer is discarded
    pub max_line_len: usize,
}

impl Default for SerialSection {
    fn default() -> Self {
        Self {
            port: None,
            default_baud: 115_200,
            timeout_ms: 100,
            line_ending: "\n".to_string(),
            max_line_len: 1024,
        }
    }
}

impl SerialSection {
    /// Get the read timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// The configured port, falling back to the platform placeholder.
    pub fn port_or_placeholder(&self) -> String {
        self.port
            .clone()
            .unwrap_or_else(|| default_port().to_string())
    }
}

/// Platform placeholder used when no port is configured anywhere.
pub fn default_port() -> &'static str {
    if cfg!(windows) {
        "COM10"
    } else {
        "/dev/ttyUSB0"
    }
}

/// Scan filter configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSection {
    /// Device type token sent to the firmware
    pub device_type: String,
    /// Bluetooth address of the sensor
    pub address: String,
}

impl Default for FilterSection {
    fn default() -> Self {
        Self {
            device_type: DEFAULT_DEVICE_TYPE.to_string(),
            address: DEFAULT_ADDRESS.to_string(),
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level when `RUST_LOG` is unset: "trace", "debug", "info", "warn", "error"
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_tool() {
        let config = Config::default();
        assert_eq!(config.serial.default_baud, 115_200);
        assert_eq!(config.serial.timeout(), Duration::from_millis(100));
        assert_eq!(config.serial.line_ending, "\n");
        assert_eq!(config.filter.device_type, "LYWSD03MMC");
        assert_eq!(config.filter.address, "a4:c1:38:5e:de:26");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: Config = toml::from_str(
            r#"
            [serial]
            port = "/dev/ttyACM0"
            timeout_ms = 250
            "#,
        )
        .expect("parse");

        assert_eq!(config.serial.port.as_deref(), Some("/dev/ttyACM0"));
        assert_eq!(config.serial.timeout_ms, 250);
        assert_eq!(config.serial.default_baud, 115_200);
        assert_eq!(config.filter.device_type, "LYWSD03MMC");
    }

    #[test]
    fn placeholder_port_is_platform_specific() {
        let section = SerialSection::default();
        if cfg!(windows) {
            assert_eq!(section.port_or_placeholder(), "COM10");
        } else {
            assert_eq!(section.port_or_placeholder(), "/dev/ttyUSB0");
        }
    }
}
