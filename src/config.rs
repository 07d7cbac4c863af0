//! Engine configuration persistence
//!
//! Stores user preferences in `config.yaml` under the charguard config directory,
//! next to the `logs/` directory used by [`crate::tracing`].

use std::{
    env,
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::highlight::{AllowList, AllowListProfile};

/// Names a config directory that replaces the platform default
pub const CONFIG_DIR_ENV: &str = "CHARGUARD_CONFIG_DIR";

/// Prefix of the daily-rotated log files
pub const LOG_FILE_PREFIX: &str = "charguard.log";

const APP_DIR: &str = "charguard";
const CONFIG_FILE: &str = "config.yaml";

/// Debounce window for raw edit events, in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = 1000;

/// Engine configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Base set of accepted characters
    #[serde(default)]
    pub allow_list: AllowListProfile,
    /// Characters accepted on top of the profile
    #[serde(default)]
    pub extra_allowed: String,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Shown by the host while the document is empty
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn default_placeholder() -> String {
    "Enter text here...".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            allow_list: AllowListProfile::default(),
            extra_allowed: String::new(),
            debounce_ms: default_debounce_ms(),
            placeholder: default_placeholder(),
        }
    }
}

impl EngineConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from `path`, falling back to defaults on any failure
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<(), String> {
        let path = config_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        self.save_to(&path)
    }

    /// Save config to `path`
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// The allow-list described by this config
    pub fn allow_list(&self) -> AllowList {
        AllowList::from_profile(self.allow_list).with_extra(&self.extra_allowed)
    }
}

/// Base config directory.
///
/// `$CHARGUARD_CONFIG_DIR` when set and non-empty. Otherwise
/// `$XDG_CONFIG_HOME/charguard` or `~/.config/charguard` (`%APPDATA%\charguard`
/// on Windows).
pub fn config_dir() -> Option<PathBuf> {
    explicit_dir(env::var_os(CONFIG_DIR_ENV)).or_else(platform_config_dir)
}

fn explicit_dir(value: Option<OsString>) -> Option<PathBuf> {
    value.filter(|v| !v.is_empty()).map(PathBuf::from)
}

#[cfg(target_os = "windows")]
fn platform_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR))
}

// `dirs::config_dir` points at Application Support on macOS; keep the XDG layout
#[cfg(not(target_os = "windows"))]
fn platform_config_dir() -> Option<PathBuf> {
    env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
        .map(|config| config.join(APP_DIR))
}

/// Where [`EngineConfig::load`] and [`EngineConfig::save`] look
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_FILE))
}

pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

/// Create the logs directory if needed, returning it
pub fn ensure_logs_dir() -> Result<PathBuf, String> {
    let logs = logs_dir().ok_or_else(|| "No config directory available".to_string())?;
    fs::create_dir_all(&logs)
        .map_err(|e| format!("Failed to create directory {}: {}", logs.display(), e))?;
    Ok(logs)
}
