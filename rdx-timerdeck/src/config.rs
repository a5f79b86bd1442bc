//! Defines all configuration structures for Timerdeck.
//!
//! These structs are deserialized with `serde`. [`TimerdeckConfig::load`]
//! layers an optional TOML file and `TIMERDECK__*` environment variables over
//! the built-in defaults, so every field can be left out.

use chrono_tz::Tz;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// The top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TimerdeckConfig {
    /// How often the engine ticks running timers.
    #[serde(default)]
    pub tick: TickResolution,

    /// Where the state snapshot lives.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Where history exports are written.
    #[serde(default)]
    pub export: ExportConfig,

    /// Presentation settings.
    #[serde(default)]
    pub display: DisplayConfig,

    /// Fallback filter for the log subscriber when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// The tick period of the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TickResolution {
    /// One tick per second. Every countdown step is one second.
    #[default]
    Standard,
    /// A user-defined period in milliseconds. Handy for demos.
    Custom { millis: u64 },
}

impl TickResolution {
    pub fn interval(&self) -> Duration {
        match self {
            TickResolution::Standard => Duration::from_secs(1),
            TickResolution::Custom { millis } => Duration::from_millis((*millis).max(1)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the snapshot. Defaults to the platform data directory.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// The storage key; the snapshot file is `<key>.json`.
    #[serde(default = "default_storage_key")]
    pub key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Directory for exported history. Defaults to the current directory.
    #[serde(default)]
    pub directory: Option<PathBuf>,

    #[serde(default = "default_export_file_name")]
    pub file_name: String,
}

impl ExportConfig {
    /// The full path of the export file.
    pub fn target_path(&self) -> PathBuf {
        self.directory
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(&self.file_name)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    /// Timezone for history timestamps, as an IANA name (e.g. "Europe/Berlin").
    #[serde(default = "default_timezone")]
    pub timezone: Tz,
}

impl TimerdeckConfig {
    /// Builds the configuration from defaults, an optional TOML file and the environment.
    ///
    /// Environment variables use the `TIMERDECK` prefix and `__` as the
    /// separator, e.g. `TIMERDECK__STORAGE__DATA_DIR=/tmp/deck`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        builder
            .add_source(Environment::with_prefix("TIMERDECK").separator("__"))
            .build()?
            .try_deserialize()
    }
}

// --- Default value functions for serde ---

fn default_log_level() -> String {
    "info".to_string()
}

fn default_storage_key() -> String {
    "timerState".to_string()
}

fn default_export_file_name() -> String {
    "timer_history.json".to_string()
}

fn default_timezone() -> Tz {
    Tz::UTC
}

impl Default for TimerdeckConfig {
    fn default() -> Self {
        Self {
            tick: TickResolution::default(),
            storage: StorageConfig::default(),
            export: ExportConfig::default(),
            display: DisplayConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            key: default_storage_key(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: None,
            file_name: default_export_file_name(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_tick_once_per_second() {
        let config = TimerdeckConfig::default();
        assert_eq!(config.tick.interval(), Duration::from_secs(1));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.storage.key, "timerState");
        assert_eq!(config.export.file_name, "timer_history.json");
        assert_eq!(config.display.timezone, Tz::UTC);
    }

    #[test]
    fn loads_overrides_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
log_level = "debug"

[tick]
custom = {{ millis = 250 }}

[storage]
data_dir = "/tmp/deck"

[export]
directory = "/tmp/out"

[display]
timezone = "Europe/Berlin"
"#
        )
        .unwrap();

        let config = TimerdeckConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.tick.interval(), Duration::from_millis(250));
        assert_eq!(config.storage.data_dir, Some(PathBuf::from("/tmp/deck")));
        assert_eq!(config.storage.key, "timerState");
        assert_eq!(config.export.target_path(), PathBuf::from("/tmp/out/timer_history.json"));
        assert_eq!(config.display.timezone, chrono_tz::Europe::Berlin);
    }
}
