//! Sample tasks for a collection that has never been persisted.

use tasklane_core::{Recurrence, Task, TaskId, TaskPriority};

/// The two-task starter collection: one open Low-priority task and one
/// completed High-priority task, fresh ids, no dependencies.
pub fn seed_tasks() -> Vec<Task> {
    vec![
        Task {
            id: TaskId::generate(),
            title: "Plan the week".to_string(),
            done: false,
            priority: TaskPriority::Low,
            recurrence: Recurrence::None,
            dependencies: Vec::new(),
        },
        Task {
            id: TaskId::generate(),
            title: "Install tasklane".to_string(),
            done: true,
            priority: TaskPriority::High,
            recurrence: Recurrence::None,
            dependencies: Vec::new(),
        },
    ]
}
