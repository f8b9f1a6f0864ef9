// SPDX-License-Identifier: MPL-2.0
//! Loading and saving of the `settings.toml` file.
//!
//! # Configuration Sections
//!
//! - `[notifications]` - Default display duration and host tick interval
//! - `[diagnostics]` - Lifecycle event buffer size
//!
//! Every field is optional. Missing fields fall back to the constants in
//! [`defaults`], and out-of-range values are clamped when read through the
//! typed accessors.
//!
//! # Path Resolution
//!
//! 1. Use `load_from_path()`/`save_to_path()` with explicit path
//! 2. Pass a directory to `load_with_override()`/`save_with_override()`
//! 3. Set `ICED_TOASTS_CONFIG_DIR` environment variable
//! 4. Falls back to platform-specific config directory
//!
//! # Examples
//!
//! ```no_run
//! use iced_toasts::config::{self, Config};
//!
//! // Load existing configuration (returns tuple with optional warning)
//! let (mut config, _warning) = config::load();
//!
//! config.notifications.default_duration_ms = Some(5000);
//!
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;
pub mod paths;

pub use defaults::*;

use crate::domain::diagnostics::BufferCapacity;
use crate::domain::notification::{DisplayDuration, TickInterval};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";

// =============================================================================
// Section Structs
// =============================================================================

/// Notification timing settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationsConfig {
    /// Display duration for notifications that do not request one.
    #[serde(
        default = "default_display_duration_ms",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_duration_ms: Option<u64>,

    /// Polling interval for hosts that drive timers from a periodic tick.
    #[serde(
        default = "default_tick_interval_ms",
        skip_serializing_if = "Option::is_none"
    )]
    pub tick_interval_ms: Option<u64>,
}

impl NotificationsConfig {
    /// Returns the configured default display duration, clamped to range.
    #[must_use]
    pub fn display_duration(&self) -> DisplayDuration {
        self.default_duration_ms
            .map_or_else(DisplayDuration::default, DisplayDuration::new)
    }

    /// Returns the configured tick interval, clamped to range.
    #[must_use]
    pub fn tick_interval(&self) -> TickInterval {
        self.tick_interval_ms
            .map_or_else(TickInterval::default, TickInterval::new)
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            default_duration_ms: default_display_duration_ms(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

/// Diagnostics settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiagnosticsConfig {
    /// Number of lifecycle events kept in memory.
    #[serde(
        default = "default_buffer_capacity",
        skip_serializing_if = "Option::is_none"
    )]
    pub buffer_capacity: Option<usize>,
}

impl DiagnosticsConfig {
    /// Returns the configured buffer capacity, clamped to range.
    #[must_use]
    pub fn buffer_capacity(&self) -> BufferCapacity {
        self.buffer_capacity
            .map_or_else(BufferCapacity::default, BufferCapacity::new)
    }
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: default_buffer_capacity(),
        }
    }
}

// =============================================================================
// Main Config Struct (Sectioned)
// =============================================================================

/// Application configuration with logical sections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    /// Notification timing settings.
    #[serde(default)]
    pub notifications: NotificationsConfig,

    /// Diagnostics settings.
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

// =============================================================================
// Default Value Functions
// =============================================================================

fn default_display_duration_ms() -> Option<u64> {
    Some(DEFAULT_DISPLAY_DURATION_MS)
}

fn default_tick_interval_ms() -> Option<u64> {
    Some(DEFAULT_TICK_INTERVAL_MS)
}

fn default_buffer_capacity() -> Option<usize> {
    Some(DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY)
}

// =============================================================================
// Config Path Resolution
// =============================================================================

/// Returns the config file path with an optional override.
fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::get_app_config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

// =============================================================================
// Load Functions
// =============================================================================

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// default config with a warning message explaining what went wrong.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = get_config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(err) => {
                    return (
                        Config::default(),
                        Some(format!(
                            "ignoring {}: {}; using defaults",
                            path.display(),
                            err
                        )),
                    );
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

// =============================================================================
// Save Functions
// =============================================================================

/// Saves the configuration to the default path.
pub fn save(config: &Config) -> Result<()> {
    save_with_override(config, None)
}

/// Saves the configuration to a custom directory.
pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    if let Some(path) = get_config_path_with_override(base_dir) {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Saves configuration to a specific path.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::notification::{display_duration_bounds, tick_interval_bounds};
    use tempfile::tempdir;

    #[test]
    fn domain_bounds_match_config() {
        assert_eq!(display_duration_bounds::MIN_MS, MIN_DISPLAY_DURATION_MS);
        assert_eq!(display_duration_bounds::MAX_MS, MAX_DISPLAY_DURATION_MS);
        assert_eq!(display_duration_bounds::DEFAULT_MS, DEFAULT_DISPLAY_DURATION_MS);
        assert_eq!(tick_interval_bounds::MIN_MS, MIN_TICK_INTERVAL_MS);
        assert_eq!(tick_interval_bounds::MAX_MS, MAX_TICK_INTERVAL_MS);
        assert_eq!(tick_interval_bounds::DEFAULT_MS, DEFAULT_TICK_INTERVAL_MS);
    }

    #[test]
    fn save_and_load_round_trip_preserves_settings() {
        let config = Config {
            notifications: NotificationsConfig {
                default_duration_ms: Some(4500),
                tick_interval_ms: Some(50),
            },
            diagnostics: DiagnosticsConfig {
                buffer_capacity: Some(250),
            },
        };
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("settings.toml");

        save_to_path(&config, &config_path).expect("failed to save config");
        let loaded = load_from_path(&config_path).expect("failed to load config");

        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_sections_use_defaults() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "[notifications]\ndefault_duration_ms = 5000\n")
            .expect("failed to write config");

        let loaded = load_from_path(&config_path).expect("failed to load config");

        assert_eq!(loaded.notifications.display_duration().value(), 5000);
        assert_eq!(
            loaded.notifications.tick_interval().value(),
            DEFAULT_TICK_INTERVAL_MS
        );
        assert_eq!(loaded.diagnostics, DiagnosticsConfig::default());
    }

    #[test]
    fn out_of_range_values_are_clamped_by_accessors() {
        let config = Config {
            notifications: NotificationsConfig {
                default_duration_ms: Some(10),
                tick_interval_ms: Some(999_999),
            },
            diagnostics: DiagnosticsConfig {
                buffer_capacity: Some(1),
            },
        };

        assert_eq!(
            config.notifications.display_duration().value(),
            MIN_DISPLAY_DURATION_MS
        );
        assert_eq!(
            config.notifications.tick_interval().value(),
            MAX_TICK_INTERVAL_MS
        );
        assert_eq!(
            config.diagnostics.buffer_capacity().value(),
            MIN_DIAGNOSTICS_BUFFER_CAPACITY
        );
    }

    #[test]
    fn load_from_path_reports_invalid_toml() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "not = valid = toml").expect("failed to write invalid toml");

        let result = load_from_path(&config_path);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn load_with_override_warns_and_falls_back_on_invalid_file() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        fs::write(temp_dir.path().join(CONFIG_FILE), "[notifications\n")
            .expect("failed to write invalid toml");

        let (config, warning) = load_with_override(Some(temp_dir.path().to_path_buf()));

        assert_eq!(config, Config::default());
        assert!(warning.is_some_and(|w| w.contains(CONFIG_FILE)));
    }

    #[test]
    fn load_with_override_without_file_is_silent() {
        let temp_dir = tempdir().expect("failed to create temp dir");

        let (config, warning) = load_with_override(Some(temp_dir.path().to_path_buf()));

        assert_eq!(config, Config::default());
        assert!(warning.is_none());
    }

    #[test]
    fn save_with_override_writes_settings_file() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config = Config::default();

        save_with_override(&config, Some(temp_dir.path().join("deep")))
            .expect("save should create directories");

        assert!(temp_dir.path().join("deep").join(CONFIG_FILE).exists());
    }

    #[test]
    fn default_config_uses_default_constants() {
        let config = Config::default();
        assert_eq!(
            config.notifications.default_duration_ms,
            Some(DEFAULT_DISPLAY_DURATION_MS)
        );
        assert_eq!(
            config.notifications.tick_interval_ms,
            Some(DEFAULT_TICK_INTERVAL_MS)
        );
        assert_eq!(
            config.diagnostics.buffer_capacity,
            Some(DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY)
        );
    }
}
