//! Configuration loader with file resolution and environment override support.

use super::error::{ConfigError, ConfigResult};
use super::schema::Config;
use std::path::{Path, PathBuf};

/// Environment variable prefix for overrides
const ENV_PREFIX: &str = "BLESCAN";

/// Config file name
const CONFIG_FILE_NAME: &str = "blescan.toml";

/// Environment variable for an explicit config path
const CONFIG_PATH_ENV: &str = "BLESCAN_CONFIG";

/// Directory under the platform config root
const CONFIG_DIR_NAME: &str = "blescan-monitor";

/// Configuration loader with resolution and override logic.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Resolved config file path (if any)
    pub config_path: Option<PathBuf>,
    /// The loaded configuration
    pub config: Config,
}

impl ConfigLoader {
    /// Load configuration using standard resolution order.
    ///
    /// Resolution priority (highest to lowest):
    /// 1. `BLESCAN_CONFIG` environment variable (explicit path)
    /// 2. `./blescan.toml` (current directory)
    /// 3. `~/.config/blescan-monitor/blescan.toml` (XDG on Linux/macOS)
    /// 4. `%APPDATA%\blescan-monitor\blescan.toml` (Windows)
    /// 5. Built-in defaults (no file required)
    ///
    /// Environment variables can override any config file values.
    pub fn load() -> ConfigResult<Self> {
        let config_path = resolve_config_path();

        let mut config = if let Some(ref path) = config_path {
            load_from_file(path)?
        } else {
            Config::default()
        };

        apply_env_overrides(&mut config)?;

        Ok(Self {
            config_path,
            config,
        })
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref().to_path_buf();
        let mut config = load_from_file(&path)?;
        apply_env_overrides(&mut config)?;

        Ok(Self {
            config_path: Some(path),
            config,
        })
    }

    /// Create a loader with default configuration (no file).
    pub fn with_defaults() -> Self {
        let mut config = Config::default();
        // Env overrides still apply without a file.
        let _ = apply_env_overrides(&mut config);

        Self {
            config_path: None,
            config,
        }
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Consume the loader and return the configuration.
    pub fn into_config(self) -> Config {
        self.config
    }
}

/// Resolve the configuration file path using standard locations.
pub fn resolve_config_path() -> Option<PathBuf> {
    // 1. Explicit environment variable
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
    }

    // 2. Current directory
    let cwd_config = PathBuf::from(CONFIG_FILE_NAME);
    if cwd_config.exists() {
        return Some(cwd_config);
    }

    // 3. XDG config directory (Linux/macOS) or APPDATA (Windows)
    if let Some(config_dir) = get_config_dir() {
        let app_config = config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME);
        if app_config.exists() {
            return Some(app_config);
        }
    }

    // 4. No config file found - defaults apply
    None
}

/// Get the platform-specific config directory.
fn get_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var("APPDATA").ok().map(PathBuf::from)
    }

    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var("HOME")
                    .ok()
                    .map(|h| PathBuf::from(h).join(".config"))
            })
    }
}

/// Load configuration from a file.
fn load_from_file(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&content).map_err(ConfigError::ParseError)
}

/// Apply environment variable overrides to the configuration.
///
/// Environment variables follow the pattern: `BLESCAN_<SECTION>_<KEY>`
/// For example:
/// - `BLESCAN_SERIAL_PORT=/dev/ttyACM0`
/// - `BLESCAN_SERIAL_DEFAULT_BAUD=921600`
/// - `BLESCAN_FILTER_ADDRESS=a4:c1:38:aa:bb:cc`
fn apply_env_overrides(config: &mut Config) -> ConfigResult<()> {
    // Serial overrides
    if let Ok(val) = std::env::var(format!("{}_SERIAL_PORT", ENV_PREFIX)) {
        config.serial.port = Some(val);
    }
    if let Ok(val) = std::env::var(format!("{}_SERIAL_DEFAULT_BAUD", ENV_PREFIX)) {
        config.serial.default_baud = val.parse().map_err(|_| {
            ConfigError::env_parse(
                format!("{}_SERIAL_DEFAULT_BAUD", ENV_PREFIX),
                "invalid baud rate",
            )
        })?;
    }
    if let Ok(val) = std::env::var(format!("{}_SERIAL_TIMEOUT_MS", ENV_PREFIX)) {
        config.serial.timeout_ms = val.parse().map_err(|_| {
            ConfigError::env_parse(
                format!("{}_SERIAL_TIMEOUT_MS", ENV_PREFIX),
                "invalid timeout",
            )
        })?;
    }

    // Filter overrides
    if let Ok(val) = std::env::var(format!("{}_FILTER_DEVICE_TYPE", ENV_PREFIX)) {
        config.filter.device_type = val;
    }
    if let Ok(val) = std::env::var(format!("{}_FILTER_ADDRESS", ENV_PREFIX)) {
        config.filter.address = val;
    }

    // Logging overrides
    if let Ok(val) = std::env::var(format!("{}_LOGGING_LEVEL", ENV_PREFIX)) {
        config.logging.level = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use std::io::Write;

    #[test]
    #[serial]
    fn default_loader() {
        let loader = ConfigLoader::with_defaults();
        assert_eq!(loader.config().serial.default_baud, 115_200);
        assert!(loader.config_path.is_none());
    }

    #[test]
    #[serial]
    fn env_override_wins_over_defaults() {
        env::set_var("BLESCAN_SERIAL_DEFAULT_BAUD", "921600");
        env::set_var("BLESCAN_FILTER_ADDRESS", "a4:c1:38:aa:bb:cc");

        let loader = ConfigLoader::with_defaults();
        assert_eq!(loader.config().serial.default_baud, 921_600);
        assert_eq!(loader.config().filter.address, "a4:c1:38:aa:bb:cc");

        env::remove_var("BLESCAN_SERIAL_DEFAULT_BAUD");
        env::remove_var("BLESCAN_FILTER_ADDRESS");
    }

    #[test]
    #[serial]
    fn unparsable_env_override_is_an_error() {
        env::set_var("BLESCAN_SERIAL_TIMEOUT_MS", "soon");

        let result = ConfigLoader::load();
        assert!(matches!(
            result,
            Err(ConfigError::EnvParseError { .. })
        ));

        env::remove_var("BLESCAN_SERIAL_TIMEOUT_MS");
    }

    #[test]
    #[serial]
    fn load_from_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            r#"
            [serial]
            port = "/dev/ttyACM1"
            default_baud = 57600

            [filter]
            device_type = "ATC"
            "#
        )
        .expect("write config");

        let loader = ConfigLoader::load_from(file.path()).expect("load");
        assert_eq!(loader.config().serial.port.as_deref(), Some("/dev/ttyACM1"));
        assert_eq!(loader.config().serial.default_baud, 57_600);
        assert_eq!(loader.config().filter.device_type, "ATC");
        // Unset sections keep their defaults.
        assert_eq!(loader.config().logging.level, "info");
    }

    #[test]
    #[serial]
    fn env_override_wins_over_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "[serial]\ndefault_baud = 57600").expect("write config");

        env::set_var("BLESCAN_SERIAL_DEFAULT_BAUD", "230400");
        let loader = ConfigLoader::load_from(file.path()).expect("load");
        env::remove_var("BLESCAN_SERIAL_DEFAULT_BAUD");

        assert_eq!(loader.config().serial.default_baud, 230_400);
    }

    #[test]
    #[serial]
    fn broken_toml_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "[serial\nport=").expect("write config");

        assert!(matches!(
            ConfigLoader::load_from(file.path()),
            Err(ConfigError::ParseError(_))
        ));
    }
}
