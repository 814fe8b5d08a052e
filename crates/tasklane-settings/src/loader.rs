//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`TasklaneSettings::default()`]
//! 2. If `~/.tasklane/settings.json` exists, deep-merge user values over defaults
//! 3. Apply `TASKLANE_*` environment variable overrides (highest priority)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::Result;
use crate::types::{SORT_KEYS, TasklaneSettings, tasklane_home};

/// Resolve the path to the settings file (`~/.tasklane/settings.json`).
pub fn settings_path() -> PathBuf {
    tasklane_home().join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<TasklaneSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// A missing file yields defaults. Invalid JSON is an error.
pub fn load_settings_from_path(path: &Path) -> Result<TasklaneSettings> {
    let mut settings = load_file_layer(path)?;
    apply_overrides(&mut settings, |name| std::env::var(name).ok());
    Ok(settings)
}

/// Defaults with the settings file merged over them, no env overrides.
fn load_file_layer(path: &Path) -> Result<TasklaneSettings> {
    let defaults = serde_json::to_value(TasklaneSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    Ok(serde_json::from_value(merged)?)
}

/// Recursive deep merge of two JSON values.
///
/// - Objects are merged recursively (source overrides target per-key)
/// - Arrays and primitives are replaced entirely by source
/// - Null values in source are skipped (preserving target)
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply overrides read through `lookup` (normally the process environment).
///
/// Empty values are skipped. Invalid values are logged and ignored.
pub fn apply_overrides(settings: &mut TasklaneSettings, lookup: impl Fn(&str) -> Option<String>) {
    let read = |name: &str| lookup(name).filter(|v| !v.is_empty());

    if let Some(v) = read("TASKLANE_STORAGE_KEY") {
        settings.storage.key = v;
    }
    if let Some(v) = read("TASKLANE_DATA_DIR") {
        settings.storage.data_dir = Some(v);
    }
    if let Some(v) = read("TASKLANE_STORAGE") {
        match parse_bool(&v) {
            Some(b) => settings.storage.enabled = b,
            None => warn_invalid("TASKLANE_STORAGE", &v),
        }
    }
    if let Some(v) = read("TASKLANE_SEED") {
        match parse_bool(&v) {
            Some(b) => settings.storage.seed = b,
            None => warn_invalid("TASKLANE_SEED", &v),
        }
    }
    if let Some(v) = read("TASKLANE_LOG_LEVEL") {
        settings.logging.level = v;
    }
    if let Some(v) = read("TASKLANE_DEFAULT_SORT") {
        let normalized = v.trim().to_lowercase();
        if SORT_KEYS.contains(&normalized.as_str()) {
            settings.view.default_sort = normalized;
        } else {
            warn_invalid("TASKLANE_DEFAULT_SORT", &v);
        }
    }
}

fn warn_invalid(key: &str, value: &str) {
    tracing::warn!(key, value, "invalid env var, ignoring");
}

/// Parse a string as a boolean.
///
/// Accepts (case-insensitive): `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`.
pub fn parse_bool(val: &str) -> Option<bool> {
    match val.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
