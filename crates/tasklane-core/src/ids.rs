//! Task identity.
//!
//! A [`TaskId`] is an integer derived from the wall clock in milliseconds.
//! Ids handed out by [`TaskId::generate`] are strictly increasing within a
//! process: when two calls land in the same millisecond the second one gets
//! the previous id plus one.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};

use serde::{Deserialize, Serialize};

/// Last id handed out by [`TaskId::generate`].
static LAST_GENERATED: AtomicI64 = AtomicI64::new(0);

/// Unique identifier of a task within a collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(i64);

impl TaskId {
    /// Wrap an existing raw id.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Generate a fresh id from the current time.
    #[must_use]
    pub fn generate() -> Self {
        Self::generate_at(chrono::Utc::now().timestamp_millis())
    }

    /// Generate an id as if the clock read `now_millis`.
    ///
    /// Never returns a value lower than or equal to one returned earlier.
    #[must_use]
    pub fn generate_at(now_millis: i64) -> Self {
        let mut last = LAST_GENERATED.load(Ordering::Relaxed);
        loop {
            let next = now_millis.max(last.saturating_add(1));
            match LAST_GENERATED.compare_exchange_weak(
                last,
                next,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return Self(next),
                Err(current) => last = current,
            }
        }
    }

    /// Return the raw integer value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for TaskId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl From<TaskId> for i64 {
    fn from(id: TaskId) -> Self {
        id.0
    }
}

impl FromStr for TaskId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}
