//! Structured logging with `tracing`.
//!
//! - [`init_subscriber`] installs the stderr subscriber used by the binary
//! - [`with_bootstrap_logging`] reports warnings raised before that, while
//!   the settings that choose the level are still loading
//! - [`capture_logs`] records events in memory so tests can assert that a
//!   recovered failure was logged

pub mod capture;

pub use capture::{CapturedEvent, CapturedLogs, capture_logs};

/// Initialize the global tracing subscriber with stderr output only.
///
/// Call once at application startup. Subsequent calls are no-ops.
/// `RUST_LOG` takes precedence over `level` when set.
pub fn init_subscriber(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact();

    // try_init fails if a global subscriber is already set
    let _ = subscriber.try_init();
}

/// Run `f` with a scoped stderr subscriber at `warn`.
///
/// Used around settings loading, which happens before [`init_subscriber`]
/// knows the configured level.
pub fn with_bootstrap_logging<T>(f: impl FnOnce() -> T) -> T {
    use tracing_subscriber::EnvFilter;

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("warn"))
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    tracing::subscriber::with_default(subscriber, f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_subscriber_does_not_panic() {
        init_subscriber("warn");
        init_subscriber("debug");
    }

    #[test]
    fn bootstrap_logging_enables_warnings_only() {
        let (warn, debug) = with_bootstrap_logging(|| {
            tracing::warn!("settings value rejected");
            (
                tracing::enabled!(tracing::Level::WARN),
                tracing::enabled!(tracing::Level::DEBUG),
            )
        });
        assert!(warn);
        assert!(!debug);
    }
}
