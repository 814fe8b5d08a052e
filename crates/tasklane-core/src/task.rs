//! The task entity.
//!
//! The serialized shape is the persisted layout: an object with `id`,
//! `title`, `done`, `priority`, `recurrence` and `dependencies`, enum values
//! spelled exactly as their variant names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ids::TaskId;

// ─────────────────────────────────────────────────────────────────────────────
// Enums
// ─────────────────────────────────────────────────────────────────────────────

/// Task priority.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskPriority {
    /// Low priority.
    Low,
    /// Medium priority.
    #[default]
    Medium,
    /// High priority.
    High,
}

impl TaskPriority {
    /// Sort rank, lowest first: High=1, Medium=2, Low=3.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }

    /// Variant name as persisted.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!("unknown priority: {other}")),
        }
    }
}

/// How often a task repeats. Recorded only; nothing regenerates tasks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recurrence {
    /// One-off task.
    #[default]
    None,
    /// Repeats every day.
    Daily,
    /// Repeats every week.
    Weekly,
    /// Repeats every month.
    Monthly,
}

impl Recurrence {
    /// Variant name as persisted.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
        }
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Recurrence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            other => Err(format!("unknown recurrence: {other}")),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Task
// ─────────────────────────────────────────────────────────────────────────────

/// A unit of work with completion state, priority, recurrence and
/// dependencies on other tasks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique id, never reassigned.
    pub id: TaskId,
    /// Display title.
    pub title: String,
    /// Completion flag.
    pub done: bool,
    /// Priority.
    pub priority: TaskPriority,
    /// Recurrence tag.
    pub recurrence: Recurrence,
    /// Ids that must be done before this task may be.
    ///
    /// May reference ids missing from the collection, and may repeat.
    pub dependencies: Vec<TaskId>,
}

impl Task {
    /// Create an open task with default priority and recurrence.
    #[must_use]
    pub fn new(id: TaskId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            done: false,
            priority: TaskPriority::default(),
            recurrence: Recurrence::default(),
            dependencies: Vec::new(),
        }
    }

    /// Whether `id` appears in this task's dependencies.
    #[must_use]
    pub fn depends_on(&self, id: TaskId) -> bool {
        self.dependencies.contains(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_orders_high_first() {
        assert!(TaskPriority::High.rank() < TaskPriority::Medium.rank());
        assert!(TaskPriority::Medium.rank() < TaskPriority::Low.rank());
    }

    #[test]
    fn defaults_match_new_task_form() {
        assert_eq!(TaskPriority::default(), TaskPriority::Medium);
        assert_eq!(Recurrence::default(), Recurrence::None);
    }

    #[test]
    fn json_shape_is_stable() {
        let task = Task {
            id: TaskId::new(2),
            title: "Second".into(),
            done: true,
            priority: TaskPriority::High,
            recurrence: Recurrence::Weekly,
            dependencies: vec![TaskId::new(1)],
        };
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": 2,
                "title": "Second",
                "done": true,
                "priority": "High",
                "recurrence": "Weekly",
                "dependencies": [1]
            })
        );
    }

    #[test]
    fn rejects_unknown_priority_value() {
        let raw = r#"{"id":1,"title":"x","done":false,"priority":"Urgent","recurrence":"None","dependencies":[]}"#;
        assert!(serde_json::from_str::<Task>(raw).is_err());
    }

    #[test]
    fn parse_enums_case_insensitively() {
        assert_eq!("HIGH".parse::<TaskPriority>().unwrap(), TaskPriority::High);
        assert_eq!(" weekly".parse::<Recurrence>().unwrap(), Recurrence::Weekly);
        assert!("sometimes".parse::<Recurrence>().is_err());
    }

    #[test]
    fn depends_on_checks_membership() {
        let mut task = Task::new(TaskId::new(3), "Third");
        task.dependencies = vec![TaskId::new(1), TaskId::new(1)];
        assert!(task.depends_on(TaskId::new(1)));
        assert!(!task.depends_on(TaskId::new(2)));
    }
}
