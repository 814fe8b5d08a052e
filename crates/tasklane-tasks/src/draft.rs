//! Form state for creating or editing a task.
//!
//! The draft keeps the dependency list as a toggle-set: toggling an id that
//! is present removes it, otherwise it is appended.

use tasklane_core::{Recurrence, Task, TaskId, TaskPriority};

use crate::errors::TaskError;

/// Editable task fields before they reach the store.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskDraft {
    /// Title; must not be blank.
    pub title: String,
    /// Priority, Medium by default.
    pub priority: TaskPriority,
    /// Recurrence, None by default.
    pub recurrence: Recurrence,
    /// Selected dependency ids, in selection order.
    pub dependencies: Vec<TaskId>,
    /// Set when editing an existing task.
    editing: Option<(TaskId, bool)>,
}

impl TaskDraft {
    /// Empty draft with default priority and recurrence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty draft with `title` filled in.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Draft pre-filled from an existing task, for editing.
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            priority: task.priority,
            recurrence: task.recurrence,
            dependencies: task.dependencies.clone(),
            editing: Some((task.id, task.done)),
        }
    }

    /// Id of the task being edited, if any.
    pub fn editing_id(&self) -> Option<TaskId> {
        self.editing.map(|(id, _)| id)
    }

    /// Whether `id` is currently selected as a dependency.
    pub fn is_checked(&self, id: TaskId) -> bool {
        self.dependencies.contains(&id)
    }

    /// Select `id` if absent, deselect it (every occurrence) if present.
    pub fn toggle_dependency(&mut self, id: TaskId) {
        if self.is_checked(id) {
            self.dependencies.retain(|&d| d != id);
        } else {
            self.dependencies.push(id);
        }
    }

    /// Build the task to hand to the store.
    ///
    /// A whitespace-only title is rejected; any other title is stored as
    /// typed. A new draft gets a fresh id and starts open. An edit draft
    /// keeps the original id and done flag.
    pub fn build(&self) -> Result<Task, TaskError> {
        if self.title.trim().is_empty() {
            return Err(TaskError::Validation("title is required".to_string()));
        }

        let (id, done) = self.editing.unwrap_or_else(|| (TaskId::generate(), false));
        Ok(Task {
            id,
            title: self.title.clone(),
            done,
            priority: self.priority,
            recurrence: self.recurrence,
            dependencies: self.dependencies.clone(),
        })
    }

    /// Back to an empty new-task draft.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
