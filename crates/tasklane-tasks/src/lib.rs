//! # tasklane-tasks
//!
//! The task collection and the rules that govern it.
//!
//! - [`store::TaskStore`] owns the collection, persists it to a
//!   [`storage::KeyValueSlot`] after every mutation and pushes snapshots to
//!   subscribers
//! - [`lifecycle::TaskLifecycle`] decides whether a task may be completed or
//!   deleted given the rest of the collection
//! - [`view`] filters and sorts the collection for display
//! - [`draft::TaskDraft`] assembles a task from form input

#![deny(unsafe_code)]

pub mod draft;
pub mod errors;
pub mod lifecycle;
pub mod seed;
pub mod storage;
pub mod store;
pub mod view;

pub use draft::TaskDraft;
pub use errors::{StorageError, TaskError};
pub use lifecycle::{Confirm, DeleteOutcome, Notice, TaskLifecycle, ToggleOutcome};
pub use storage::{FileSlot, KeyValueSlot, MemorySlot, UnavailableSlot};
pub use store::{StoreOptions, SubscriptionId, TaskSnapshot, TaskStore};
pub use view::{SortKey, TaskListView, filter_tasks};
