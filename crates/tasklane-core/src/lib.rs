//! # tasklane-core
//!
//! Foundation types shared by every tasklane crate:
//!
//! - **Task entity**: [`Task`] with [`TaskPriority`] and [`Recurrence`]
//! - **Ids**: [`TaskId`], clock-derived and monotonic within a process
//! - **Logging**: `tracing` subscriber setup and a capture helper for tests

#![deny(unsafe_code)]

pub mod constants;
pub mod ids;
pub mod logging;
pub mod task;

pub use ids::TaskId;
pub use task::{Recurrence, Task, TaskPriority};
