// SPDX-License-Identifier: MPL-2.0
//! Config directory resolution.
//!
//! # Resolution Order
//!
//! 1. **Explicit override** - `--config-dir` or a test directory
//! 2. **Environment variable** - `ICED_TOASTS_CONFIG_DIR`
//! 3. **Platform default** - via `dirs` crate, with the app name appended

use std::path::PathBuf;

/// Application name used for directory naming.
const APP_NAME: &str = "IcedToasts";

/// Environment variable to override the config directory.
pub const ENV_CONFIG_DIR: &str = "ICED_TOASTS_CONFIG_DIR";

/// Returns the config directory path.
///
/// - Linux: `~/.config/IcedToasts/`
/// - macOS: `~/Library/Application Support/IcedToasts/`
/// - Windows: `C:\Users\<User>\AppData\Roaming\IcedToasts\`
///
/// Returns `None` if the config directory cannot be determined (rare edge case).
pub fn get_app_config_dir() -> Option<PathBuf> {
    get_app_config_dir_with_override(None)
}

/// Returns the config directory path with an optional override.
///
/// The override has highest priority, then a non-empty
/// `ICED_TOASTS_CONFIG_DIR`, then the platform default.
pub fn get_app_config_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = override_path {
        return Some(path);
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG_DIR) {
        if !env_path.is_empty() {
            return Some(PathBuf::from(env_path));
        }
    }

    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path
    })
}
