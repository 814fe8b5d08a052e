//! Filtered and sorted presentation of the task collection.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tasklane_core::Task;

use crate::errors::TaskError;
use crate::store::{SubscriptionId, TaskSnapshot, TaskStore};

/// Ordering applied after filtering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortKey {
    /// High, then Medium, then Low.
    #[default]
    Priority,
    /// Open tasks before done ones.
    Status,
    /// Collection order.
    Unsorted,
}

impl SortKey {
    /// Name accepted by [`FromStr`].
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Priority => "priority",
            Self::Status => "status",
            Self::Unsorted => "none",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "priority" => Ok(Self::Priority),
            "status" => Ok(Self::Status),
            "none" => Ok(Self::Unsorted),
            other => Err(TaskError::UnknownSortKey(other.to_string())),
        }
    }
}

/// Filter `tasks` by a case-insensitive title substring, then sort.
///
/// A missing collection yields an empty list. A missing or empty search
/// keeps every task. Both sorts are stable.
pub fn filter_tasks(tasks: Option<&[Task]>, search: Option<&str>, sort: SortKey) -> Vec<Task> {
    let Some(tasks) = tasks else {
        return Vec::new();
    };

    let needle = search.unwrap_or_default().to_lowercase();
    let mut filtered: Vec<Task> = tasks
        .iter()
        .filter(|t| t.title.to_lowercase().contains(&needle))
        .cloned()
        .collect();

    match sort {
        SortKey::Priority => filtered.sort_by_key(|t| t.priority.rank()),
        SortKey::Status => filtered.sort_by_key(|t| t.done),
        SortKey::Unsorted => {}
    }
    filtered
}

/// List state for a task list screen: search term, sort key and the latest
/// snapshot received from the store.
#[derive(Clone, Debug)]
pub struct TaskListView {
    search: String,
    sort: SortKey,
    latest: Arc<Mutex<TaskSnapshot>>,
}

impl TaskListView {
    /// Empty view sorted by `sort`.
    pub fn new(sort: SortKey) -> Self {
        Self {
            search: String::new(),
            sort,
            latest: Arc::new(Mutex::new(TaskSnapshot::from(Vec::new()))),
        }
    }

    /// Subscribe to `store` so the view always holds its latest snapshot.
    pub fn attach(&self, store: &mut TaskStore) -> SubscriptionId {
        let latest = Arc::clone(&self.latest);
        store.subscribe(move |snapshot| {
            *latest.lock().unwrap_or_else(PoisonError::into_inner) = Arc::clone(snapshot);
        })
    }

    /// Current search term.
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Change the search term.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    /// Current sort key.
    pub fn sort(&self) -> SortKey {
        self.sort
    }

    /// Change the sort key.
    pub fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
    }

    /// Latest snapshot, unfiltered.
    pub fn tasks(&self) -> TaskSnapshot {
        Arc::clone(&self.lock())
    }

    /// Tasks to display: the latest snapshot filtered and sorted.
    pub fn visible(&self) -> Vec<Task> {
        let snapshot = self.tasks();
        filter_tasks(Some(&*snapshot), Some(self.search.as_str()), self.sort)
    }

    fn lock(&self) -> MutexGuard<'_, TaskSnapshot> {
        self.latest.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for TaskListView {
    fn default() -> Self {
        Self::new(SortKey::default())
    }
}
