//! Settings type definitions.
//!
//! Field names are camelCase in JSON. Every section is `#[serde(default)]`,
//! so a settings file only needs the values it changes.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tasklane_core::constants::DEFAULT_STORAGE_KEY;

/// Sort keys accepted by `view.defaultSort`.
pub const SORT_KEYS: [&str; 3] = ["priority", "status", "none"];

/// Root settings type.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TasklaneSettings {
    /// Where and whether the task collection is persisted.
    pub storage: StorageSettings,
    /// Logging configuration.
    pub logging: LoggingSettings,
    /// Task list presentation defaults.
    pub view: ViewSettings,
}

/// Persistence settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageSettings {
    /// Slot key the collection is written under.
    pub key: String,
    /// Directory holding slot files. `None` means `~/.tasklane/data`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,
    /// When false the store runs memory-only.
    pub enabled: bool,
    /// Seed two sample tasks when nothing is persisted yet.
    pub seed: bool,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            key: DEFAULT_STORAGE_KEY.to_string(),
            data_dir: None,
            enabled: true,
            seed: true,
        }
    }
}

impl StorageSettings {
    /// Resolved slot directory.
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir
            .as_ref()
            .map_or_else(|| tasklane_home().join("data"), PathBuf::from)
    }
}

/// Logging settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Minimum level passed to the tracing filter.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Task list presentation settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewSettings {
    /// Sort key used when the caller does not pick one.
    pub default_sort: String,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            default_sort: "priority".to_string(),
        }
    }
}

/// `~/.tasklane`, or `/tmp/.tasklane` when `HOME` is unset.
pub fn tasklane_home() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".tasklane")
}
