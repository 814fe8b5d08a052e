//! # tasklane-settings
//!
//! Configuration with layered sources.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`TasklaneSettings::default()`]
//! 2. **User file**: `~/.tasklane/settings.json` (deep-merged over defaults)
//! 3. **Environment variables**: `TASKLANE_*` overrides (highest priority)

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{apply_overrides, deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::*;

use std::sync::OnceLock;

/// Global settings, loaded on first access.
static SETTINGS: OnceLock<TasklaneSettings> = OnceLock::new();

/// Get the global settings instance.
///
/// On first call, loads settings from `~/.tasklane/settings.json` with env var
/// overrides. If loading fails, logs the failure and returns compiled defaults.
pub fn get_settings() -> &'static TasklaneSettings {
    SETTINGS.get_or_init(|| {
        load_settings().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to load settings, using defaults");
            TasklaneSettings::default()
        })
    })
}

/// Initialize the global settings with a specific value.
///
/// Returns the settings back if the global was already initialized.
#[allow(clippy::result_large_err)]
pub fn init_settings(settings: TasklaneSettings) -> std::result::Result<(), TasklaneSettings> {
    SETTINGS.set(settings)
}
