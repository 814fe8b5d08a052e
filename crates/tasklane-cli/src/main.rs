//! # tasklane
//!
//! Terminal front-end: loads settings, opens the task store and runs one
//! subcommand against it.

#![deny(unsafe_code)]

mod commands;

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tasklane_core::logging::{init_subscriber, with_bootstrap_logging};
use tasklane_settings::TasklaneSettings;
use tasklane_tasks::{FileSlot, KeyValueSlot, SortKey, StoreOptions, TaskStore, UnavailableSlot};
use tracing::{debug, warn};

use crate::commands::{Command, execute};

/// Task list with dependencies.
#[derive(Parser, Debug)]
#[command(name = "tasklane", version, about = "Task list with dependencies")]
struct Cli {
    /// Directory holding the task file (overrides settings).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Keep changes in memory only for this run.
    #[arg(long, global = true)]
    no_storage: bool,

    #[command(subcommand)]
    command: Command,
}

/// Pick the slot the store persists through.
fn open_slot(settings: &TasklaneSettings, cli: &Cli) -> Box<dyn KeyValueSlot> {
    if cli.no_storage || !settings.storage.enabled {
        return Box::new(UnavailableSlot);
    }
    let dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| settings.storage.resolved_data_dir());
    Box::new(FileSlot::new(dir))
}

/// The configured default sort, or priority when the setting is unusable.
fn default_sort(settings: &TasklaneSettings) -> SortKey {
    settings.view.default_sort.parse().unwrap_or_else(|err| {
        warn!(error = %err, "ignoring view.defaultSort");
        SortKey::default()
    })
}

/// Interpret a y/N answer. Anything but an explicit yes declines.
fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Ask on stderr, read one line from stdin.
fn prompt_stdin(prompt: &str) -> bool {
    eprint!("{prompt} [y/N] ");
    let _ = std::io::stderr().flush();
    let mut answer = String::new();
    match std::io::stdin().lock().read_line(&mut answer) {
        Ok(_) => is_yes(&answer),
        Err(err) => {
            warn!(error = %err, "could not read confirmation");
            false
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    // Settings warnings fire before the configured subscriber exists.
    let settings = with_bootstrap_logging(tasklane_settings::get_settings);
    init_subscriber(&settings.logging.level);

    let slot = open_slot(settings, &cli);
    let mut store = TaskStore::open(
        slot,
        StoreOptions {
            key: settings.storage.key.clone(),
            seed: settings.storage.seed,
        },
    );
    debug!(tasks = store.len(), persistent = store.is_persistent(), "store ready");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let ok = execute(
        cli.command,
        &mut store,
        default_sort(settings),
        &mut out,
        &mut prompt_stdin,
    )
    .context("command failed")?;
    out.flush().context("failed to write output")?;

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

#[cfg(test)]
#[allow(unused_results)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("tasklane").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn yes_answers() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes(""));
        assert!(!is_yes("n"));
        assert!(!is_yes("yep"));
    }

    #[test]
    fn parses_subcommands() {
        let parsed = cli(&["add", "Buy milk", "--priority", "high", "--depends-on", "3"]);
        assert!(matches!(
            parsed.command,
            Command::Add { ref title, .. } if title == "Buy milk"
        ));

        let parsed = cli(&["list", "--sort", "status", "--data-dir", "/tmp/x"]);
        assert_eq!(parsed.data_dir, Some(PathBuf::from("/tmp/x")));
        assert!(matches!(
            parsed.command,
            Command::List { sort: Some(SortKey::Status), .. }
        ));

        assert!(Cli::try_parse_from(["tasklane", "list", "--sort", "alpha"]).is_err());
        assert!(Cli::try_parse_from(["tasklane", "toggle", "abc"]).is_err());
    }

    #[test]
    fn disabled_storage_is_memory_only() {
        let mut settings = TasklaneSettings::default();
        settings.storage.enabled = false;
        let store = TaskStore::open(open_slot(&settings, &cli(&["list"])), StoreOptions::default());
        assert!(!store.is_persistent());
        assert!(store.is_empty());

        let settings = TasklaneSettings::default();
        let store = TaskStore::open(
            open_slot(&settings, &cli(&["--no-storage", "list"])),
            StoreOptions::default(),
        );
        assert!(!store.is_persistent());
    }

    #[test]
    fn data_dir_flag_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_str().unwrap();
        let settings = TasklaneSettings::default();
        let mut store = TaskStore::open(
            open_slot(&settings, &cli(&["--data-dir", path, "list"])),
            StoreOptions::default(),
        );
        assert!(store.is_persistent());
        store.delete(tasklane_core::TaskId::new(-1));
        assert!(dir.path().join("tasklane.tasks.json").exists());
    }

    #[test]
    fn bad_default_sort_falls_back() {
        let mut settings = TasklaneSettings::default();
        settings.view.default_sort = "alphabetical".into();
        assert_eq!(default_sort(&settings), SortKey::Priority);
        settings.view.default_sort = "status".into();
        assert_eq!(default_sort(&settings), SortKey::Status);
    }
}
