//! Configuration module for blescan-monitor.
//!
//! TOML-based configuration with environment variable overrides.
//!
//! # Configuration Resolution
//!
//! Configuration is loaded from the following locations (in order of priority):
//!
//! 1. `BLESCAN_CONFIG` environment variable (explicit path)
//! 2. `./blescan.toml` (current directory)
//! 3. `~/.config/blescan-monitor/blescan.toml` (XDG on Linux/macOS)
//! 4. `%APPDATA%\blescan-monitor\blescan.toml` (Windows)
//! 5. Built-in defaults (no file required)
//!
//! # Environment Overrides
//!
//! Any configuration value can be overridden via environment variables
//! following the pattern `BLESCAN_<SECTION>_<KEY>`:
//!
//! - `BLESCAN_SERIAL_PORT=/dev/ttyACM0`
//! - `BLESCAN_SERIAL_DEFAULT_BAUD=921600`
//! - `BLESCAN_FILTER_DEVICE_TYPE=ATC`
//!
//! Command-line flags take precedence over both.

mod error;
mod loader;
mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{resolve_config_path, ConfigLoader};
pub use schema::{default_port, Config, FilterSection, LoggingSection, SerialSection};
