//! Package-level constants.

/// Current version of tasklane (sourced from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package name.
pub const NAME: &str = "tasklane";

/// Storage key the task collection is persisted under unless overridden.
pub const DEFAULT_STORAGE_KEY: &str = "tasklane.tasks";

/// Title shown for a dependency id that does not resolve to a task.
pub const UNKNOWN_TASK_TITLE: &str = "Unknown Task";
