//! Dependency-aware lifecycle rules.
//!
//! Key rules:
//!
//! - **Completion gate**: a task may toggle only when every dependency
//!   resolves to a done task. An id missing from the collection counts as
//!   not done.
//! - **Deletion gate**: a task listed in anyone's dependencies cannot be
//!   deleted. Otherwise deletion still needs the caller's confirmation.
//! - **Cycles**: self-dependencies and cycles are accepted as-is. A task in
//!   a cycle can never be completed.
//!
//! A refused transition is a value ([`ToggleOutcome::Blocked`],
//! [`DeleteOutcome::Blocked`]) carrying a user-facing [`Notice`], not an
//! error.

use std::fmt;

use tasklane_core::constants::UNKNOWN_TASK_TITLE;
use tasklane_core::{Task, TaskId};
use tracing::debug;

use crate::store::TaskStore;

/// Message shown when completion is blocked by dependencies.
pub const BLOCKED_COMPLETION_MESSAGE: &str =
    "Cannot complete this task until dependencies are done.";

/// A user-facing message explaining why an action was refused.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice(String);

impl Notice {
    /// Wrap a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    /// The message text.
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of [`TaskLifecycle::toggle_done`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The flag flipped and the store was updated.
    Toggled {
        /// New value of `done`.
        done: bool,
    },
    /// Dependencies are not all done; nothing changed.
    Blocked(Notice),
}

/// Result of [`TaskLifecycle::delete_task`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The task was removed from the store.
    Deleted,
    /// Another task depends on it; nothing changed.
    Blocked(Notice),
    /// The caller declined the confirmation; nothing changed.
    Cancelled,
    /// No task has that id; nothing changed.
    NotFound,
}

/// Asks the user to confirm a destructive action.
pub trait Confirm {
    /// Show `prompt`, return whether the user agreed.
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Lifecycle rules evaluated against a [`TaskStore`].
pub struct TaskLifecycle;

impl TaskLifecycle {
    // ─────────────────────────────────────────────────────────────────────
    // Completion
    // ─────────────────────────────────────────────────────────────────────

    /// Whether every dependency of `task` resolves to a done task.
    pub fn can_complete(store: &TaskStore, task: &Task) -> bool {
        task.dependencies
            .iter()
            .all(|&id| Self::is_dependency_done(store, id))
    }

    /// Flip `task.done` and write it to the store, if the completion gate
    /// allows it.
    ///
    /// The gate applies in both directions: reopening a done task whose
    /// dependencies are no longer all done is refused too.
    pub fn toggle_done(store: &mut TaskStore, task: &mut Task) -> ToggleOutcome {
        if !Self::can_complete(store, task) {
            debug!(id = %task.id, "toggle blocked by dependencies");
            return ToggleOutcome::Blocked(Notice::new(BLOCKED_COMPLETION_MESSAGE));
        }

        task.done = !task.done;
        store.update(task.clone());
        ToggleOutcome::Toggled { done: task.done }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Deletion
    // ─────────────────────────────────────────────────────────────────────

    /// Whether any task lists `id` among its dependencies.
    pub fn is_referenced_as_dependency(store: &TaskStore, id: TaskId) -> bool {
        store.get_all().iter().any(|t| t.depends_on(id))
    }

    /// Delete the task with `id` if nothing depends on it and `confirm`
    /// agrees.
    pub fn delete_task(
        store: &mut TaskStore,
        id: TaskId,
        confirm: &mut impl Confirm,
    ) -> DeleteOutcome {
        let Some(title) = store.get_by_id(id).map(|t| t.title.clone()) else {
            return DeleteOutcome::NotFound;
        };

        if Self::is_referenced_as_dependency(store, id) {
            debug!(%id, "delete blocked, task is a dependency");
            return DeleteOutcome::Blocked(Notice::new(format!(
                "\"{title}\" cannot be deleted because it is a dependency of another task."
            )));
        }

        if !confirm.confirm(&format!("Are you sure you want to delete \"{title}\"?")) {
            return DeleteOutcome::Cancelled;
        }

        store.delete(id);
        DeleteOutcome::Deleted
    }

    // ─────────────────────────────────────────────────────────────────────
    // Dependency display
    // ─────────────────────────────────────────────────────────────────────

    /// Title of the task with `id`, or `"Unknown Task"`.
    pub fn get_dependency_title(store: &TaskStore, id: TaskId) -> String {
        store
            .get_by_id(id)
            .map_or_else(|| UNKNOWN_TASK_TITLE.to_string(), |t| t.title.clone())
    }

    /// Whether `id` resolves to a done task.
    pub fn is_dependency_done(store: &TaskStore, id: TaskId) -> bool {
        store.get_by_id(id).is_some_and(|t| t.done)
    }
}
