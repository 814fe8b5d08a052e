//! Subcommand handlers.
//!
//! Each handler works on an already-open [`TaskStore`] and writes its
//! human-readable output to `out`, so tests can drive them with an
//! in-memory store and a byte buffer. A handler returns `Ok(false)` when the
//! core refused the action (blocked transition, unknown id).

use std::io::Write;

use anyhow::Result;
use clap::Subcommand;
use tasklane_core::{Recurrence, Task, TaskId, TaskPriority};
use tasklane_tasks::{
    Confirm, DeleteOutcome, SortKey, TaskDraft, TaskLifecycle, TaskStore, ToggleOutcome,
    filter_tasks,
};

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List tasks, filtered and sorted.
    List {
        /// Case-insensitive title substring.
        #[arg(long, short)]
        search: Option<String>,
        /// `priority`, `status` or `none` (defaults to settings).
        #[arg(long)]
        sort: Option<SortKey>,
    },
    /// Add a task.
    Add {
        /// Task title.
        title: String,
        /// Low, Medium or High.
        #[arg(long, default_value = "Medium")]
        priority: TaskPriority,
        /// None, Daily, Weekly or Monthly.
        #[arg(long, default_value = "None")]
        recurrence: Recurrence,
        /// Dependency id. Giving the same id twice deselects it.
        #[arg(long = "depends-on")]
        depends_on: Vec<TaskId>,
    },
    /// Edit a task's fields.
    Edit {
        /// Task id.
        id: TaskId,
        /// New title.
        #[arg(long)]
        title: Option<String>,
        /// New priority.
        #[arg(long)]
        priority: Option<TaskPriority>,
        /// New recurrence.
        #[arg(long)]
        recurrence: Option<Recurrence>,
        /// Add the id to the dependencies, or remove it if already there.
        #[arg(long = "toggle-dependency")]
        toggle_dependency: Vec<TaskId>,
    },
    /// Mark a task done, or open again.
    Toggle {
        /// Task id.
        id: TaskId,
    },
    /// Delete a task that nothing depends on.
    Delete {
        /// Task id.
        id: TaskId,
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },
    /// Show one task with its dependencies.
    Show {
        /// Task id.
        id: TaskId,
    },
}

/// Run `command` against `store`.
pub fn execute(
    command: Command,
    store: &mut TaskStore,
    default_sort: SortKey,
    out: &mut impl Write,
    confirm: &mut impl Confirm,
) -> Result<bool> {
    match command {
        Command::List { search, sort } => {
            let tasks = filter_tasks(
                Some(store.get_all()),
                search.as_deref(),
                sort.unwrap_or(default_sort),
            );
            if tasks.is_empty() {
                writeln!(out, "No tasks.")?;
            }
            for task in &tasks {
                write_task_line(out, store, task)?;
            }
            Ok(true)
        }
        Command::Add {
            title,
            priority,
            recurrence,
            depends_on,
        } => {
            let mut draft = TaskDraft::with_title(title);
            draft.priority = priority;
            draft.recurrence = recurrence;
            for id in depends_on {
                draft.toggle_dependency(id);
            }
            let task = draft.build()?;
            writeln!(out, "Added {} {}", task.id, task.title)?;
            store.add(task);
            Ok(true)
        }
        Command::Edit {
            id,
            title,
            priority,
            recurrence,
            toggle_dependency,
        } => {
            let Some(existing) = store.get_by_id(id) else {
                writeln!(out, "No task with id {id}.")?;
                return Ok(false);
            };
            let mut draft = TaskDraft::from_task(existing);
            if let Some(title) = title {
                draft.title = title;
            }
            if let Some(priority) = priority {
                draft.priority = priority;
            }
            if let Some(recurrence) = recurrence {
                draft.recurrence = recurrence;
            }
            for dep in toggle_dependency {
                draft.toggle_dependency(dep);
            }
            let task = draft.build()?;
            writeln!(out, "Updated {} {}", task.id, task.title)?;
            store.update(task);
            Ok(true)
        }
        Command::Toggle { id } => {
            let Some(mut task) = store.get_by_id(id).cloned() else {
                writeln!(out, "No task with id {id}.")?;
                return Ok(false);
            };
            match TaskLifecycle::toggle_done(store, &mut task) {
                ToggleOutcome::Toggled { done } => {
                    let state = if done { "done" } else { "open" };
                    writeln!(out, "{} is now {state}.", task.title)?;
                    Ok(true)
                }
                ToggleOutcome::Blocked(notice) => {
                    writeln!(out, "{notice}")?;
                    Ok(false)
                }
            }
        }
        Command::Delete { id, yes } => {
            let outcome = if yes {
                TaskLifecycle::delete_task(store, id, &mut |_: &str| true)
            } else {
                TaskLifecycle::delete_task(store, id, confirm)
            };
            match outcome {
                DeleteOutcome::Deleted => {
                    writeln!(out, "Deleted {id}.")?;
                    Ok(true)
                }
                DeleteOutcome::Cancelled => {
                    writeln!(out, "Kept {id}.")?;
                    Ok(true)
                }
                DeleteOutcome::Blocked(notice) => {
                    writeln!(out, "{notice}")?;
                    Ok(false)
                }
                DeleteOutcome::NotFound => {
                    writeln!(out, "No task with id {id}.")?;
                    Ok(false)
                }
            }
        }
        Command::Show { id } => {
            let Some(task) = store.get_by_id(id) else {
                writeln!(out, "No task with id {id}.")?;
                return Ok(false);
            };
            writeln!(out, "{}  {}", task.id, task.title)?;
            writeln!(out, "  done:       {}", task.done)?;
            writeln!(out, "  priority:   {}", task.priority)?;
            writeln!(out, "  recurrence: {}", task.recurrence)?;
            if task.dependencies.is_empty() {
                writeln!(out, "  depends on: nothing")?;
            } else {
                writeln!(out, "  depends on:")?;
                for &dep in &task.dependencies {
                    writeln!(
                        out,
                        "    [{}] {} {}",
                        mark(TaskLifecycle::is_dependency_done(store, dep)),
                        dep,
                        TaskLifecycle::get_dependency_title(store, dep)
                    )?;
                }
            }
            if TaskLifecycle::is_referenced_as_dependency(store, id) {
                writeln!(out, "  required by another task")?;
            }
            Ok(true)
        }
    }
}

fn mark(done: bool) -> char {
    if done { 'x' } else { ' ' }
}

fn write_task_line(out: &mut impl Write, store: &TaskStore, task: &Task) -> Result<()> {
    write!(
        out,
        "[{}] {:>13}  {:<6}  {}",
        mark(task.done),
        task.id.get(),
        task.priority.as_str(),
        task.title
    )?;
    if task.recurrence != Recurrence::None {
        write!(out, "  ({})", task.recurrence)?;
    }
    if !task.dependencies.is_empty() {
        let deps: Vec<String> = task
            .dependencies
            .iter()
            .map(|&dep| {
                format!(
                    "{}{}",
                    TaskLifecycle::get_dependency_title(store, dep),
                    if TaskLifecycle::is_dependency_done(store, dep) { "" } else { "*" }
                )
            })
            .collect();
        write!(out, "  after: {}", deps.join(", "))?;
    }
    writeln!(out)?;
    Ok(())
}
