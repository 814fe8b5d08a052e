//! The task store: single owner of the task collection.
//!
//! Every mutation (`add`, `update`, `delete`) does three things before it
//! returns:
//!
//! 1. builds a fresh immutable [`TaskSnapshot`] of the collection
//! 2. pushes it to every current subscriber, in subscription order
//! 3. writes the collection as JSON to the slot (unless memory-only)
//!
//! Mutations cannot fail. Storage problems are logged and swallowed, and a
//! missing id on `update`/`delete` is a silent no-op.

use std::fmt;
use std::sync::Arc;

use tasklane_core::constants::DEFAULT_STORAGE_KEY;
use tasklane_core::{Task, TaskId};
use tracing::{debug, info, warn};

use crate::errors::StorageError;
use crate::seed::seed_tasks;
use crate::storage::KeyValueSlot;

/// Immutable copy of the collection at one point in time.
pub type TaskSnapshot = Arc<[Task]>;

type Subscriber = Box<dyn FnMut(&TaskSnapshot) + Send>;

/// Handle returned by [`TaskStore::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// How a store opens its slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreOptions {
    /// Key the collection is stored under.
    pub key: String,
    /// Start from the sample tasks when nothing usable is stored.
    pub seed: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            key: DEFAULT_STORAGE_KEY.to_string(),
            seed: true,
        }
    }
}

/// What the slot held at open time.
enum Loaded {
    Tasks(Vec<Task>),
    Nothing,
}

/// Owner of the task collection.
pub struct TaskStore {
    tasks: Vec<Task>,
    snapshot: TaskSnapshot,
    /// `None` in memory-only mode.
    slot: Option<Box<dyn KeyValueSlot>>,
    key: String,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl TaskStore {
    /// Open a store over `slot`.
    ///
    /// - slot unavailable: memory-only, empty collection
    /// - nothing stored, or stored data malformed: seed collection (or empty
    ///   when seeding is off)
    /// - otherwise the stored collection
    pub fn open(slot: Box<dyn KeyValueSlot>, options: StoreOptions) -> Self {
        if !slot.is_available() {
            warn!(key = %options.key, "durable storage unavailable, running in memory only");
            return Self::build(Vec::new(), None, options.key);
        }

        let tasks = match load(&*slot, &options.key) {
            Loaded::Tasks(tasks) => {
                info!(key = %options.key, count = tasks.len(), "loaded tasks");
                tasks
            }
            Loaded::Nothing if options.seed => {
                info!(key = %options.key, "no stored tasks, starting from seed");
                seed_tasks()
            }
            Loaded::Nothing => Vec::new(),
        };

        Self::build(tasks, Some(slot), options.key)
    }

    /// A memory-only store holding `tasks`. Nothing is seeded or persisted.
    pub fn in_memory(tasks: Vec<Task>) -> Self {
        Self::build(tasks, None, DEFAULT_STORAGE_KEY.to_string())
    }

    fn build(tasks: Vec<Task>, slot: Option<Box<dyn KeyValueSlot>>, key: String) -> Self {
        let snapshot = TaskSnapshot::from(tasks.clone());
        Self {
            tasks,
            snapshot,
            slot,
            key,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    // ── Reads ───────────────────────────────────────────────────────────

    /// The current collection, in order.
    pub fn get_all(&self) -> &[Task] {
        &self.tasks
    }

    /// First task with `id`, if any.
    pub fn get_by_id(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// The latest published snapshot.
    pub fn snapshot(&self) -> TaskSnapshot {
        Arc::clone(&self.snapshot)
    }

    /// Number of tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Whether mutations are written to durable storage.
    pub fn is_persistent(&self) -> bool {
        self.slot.is_some()
    }

    /// Key the collection is stored under.
    pub fn key(&self) -> &str {
        &self.key
    }

    // ── Mutations ───────────────────────────────────────────────────────

    /// Append `task`. Id uniqueness is the caller's job.
    pub fn add(&mut self, task: Task) {
        debug!(id = %task.id, title = %task.title, "add task");
        self.tasks.push(task);
        self.commit();
    }

    /// Replace, in place, every task whose id matches `task.id`.
    pub fn update(&mut self, task: Task) {
        let mut matched = 0usize;
        for existing in self.tasks.iter_mut().filter(|t| t.id == task.id) {
            *existing = task.clone();
            matched += 1;
        }
        debug!(id = %task.id, matched, "update task");
        self.commit();
    }

    /// Remove every task with `id`.
    pub fn delete(&mut self, id: TaskId) {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        debug!(%id, removed = before - self.tasks.len(), "delete task");
        self.commit();
    }

    // ── Subscriptions ───────────────────────────────────────────────────

    /// Register `callback`. It is called right away with the latest
    /// snapshot, then inline on every mutation until unsubscribed.
    pub fn subscribe<F>(&mut self, mut callback: F) -> SubscriptionId
    where
        F: FnMut(&TaskSnapshot) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        callback(&self.snapshot);
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a subscriber. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    /// Number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn commit(&mut self) {
        self.snapshot = TaskSnapshot::from(self.tasks.clone());
        for (_, subscriber) in &mut self.subscribers {
            subscriber(&self.snapshot);
        }
        self.persist();
    }

    fn persist(&mut self) {
        let Some(slot) = self.slot.as_mut() else {
            return;
        };
        let result = serde_json::to_vec(&self.tasks)
            .map_err(StorageError::from)
            .and_then(|bytes| slot.write(&self.key, &bytes));
        if let Err(e) = result {
            warn!(key = %self.key, error = %e, "failed to persist tasks");
        }
    }
}

impl fmt::Debug for TaskStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskStore")
            .field("tasks", &self.tasks)
            .field("key", &self.key)
            .field("persistent", &self.is_persistent())
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

/// Read and decode the collection stored under `key`.
///
/// Read failures and malformed data are logged and reported as nothing
/// stored.
fn load(slot: &dyn KeyValueSlot, key: &str) -> Loaded {
    let bytes = match slot.read(key) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return Loaded::Nothing,
        Err(e) => {
            warn!(key, error = %e, "failed to read stored tasks");
            return Loaded::Nothing;
        }
    };
    match serde_json::from_slice::<Vec<Task>>(&bytes) {
        Ok(tasks) => Loaded::Tasks(tasks),
        Err(e) => {
            warn!(key, error = %e, "stored tasks are malformed, ignoring them");
            Loaded::Nothing
        }
    }
}

#[cfg(test)]
#[allow(unused_results)]
mod tests {
    use std::sync::Mutex;

    use tasklane_core::TaskPriority;
    use tasklane_core::logging::capture_logs;
    use tracing::Level;

    use super::*;
    use crate::storage::{MemorySlot, UnavailableSlot};

    const KEY: &str = "tasklane.tasks";

    fn task(id: i64, title: &str) -> Task {
        Task::new(TaskId::new(id), title)
    }

    fn ids(tasks: &[Task]) -> Vec<i64> {
        tasks.iter().map(|t| t.id.get()).collect()
    }

    fn open(slot: &MemorySlot) -> TaskStore {
        TaskStore::open(Box::new(slot.clone()), StoreOptions::default())
    }

    fn stored(slot: &MemorySlot) -> Vec<Task> {
        serde_json::from_slice(&slot.get(KEY).unwrap()).unwrap()
    }

    // ── Opening ─────────────────────────────────────────────────────

    #[test]
    fn empty_slot_seeds_two_tasks() {
        let store = open(&MemorySlot::new());
        assert_eq!(store.len(), 2);
        assert!(store.is_persistent());
        assert!(!store.get_all()[0].done);
        assert!(store.get_all()[1].done);
    }

    #[test]
    fn seeding_can_be_disabled() {
        let store = TaskStore::open(
            Box::new(MemorySlot::new()),
            StoreOptions {
                seed: false,
                ..StoreOptions::default()
            },
        );
        assert!(store.is_empty());
        assert!(store.is_persistent());
    }

    #[test]
    fn seed_is_not_written_until_first_mutation() {
        let slot = MemorySlot::new();
        let _store = open(&slot);
        assert!(slot.get(KEY).is_none());
    }

    #[test]
    fn loads_stored_collection() {
        let raw = r#"[{"id":1,"title":"First","done":false,"priority":"Low","recurrence":"Daily","dependencies":[]},
                      {"id":2,"title":"Second","done":true,"priority":"High","recurrence":"None","dependencies":[1]}]"#;
        let store = open(&MemorySlot::with_entry(KEY, raw));
        assert_eq!(ids(store.get_all()), vec![1, 2]);
        assert_eq!(store.get_by_id(TaskId::new(2)).unwrap().dependencies, vec![TaskId::new(1)]);
    }

    #[test]
    fn stored_empty_list_is_not_reseeded() {
        let store = open(&MemorySlot::with_entry(KEY, "[]"));
        assert!(store.is_empty());
    }

    #[test]
    fn malformed_data_falls_back_to_seed_and_logs() {
        let (logs, _guard) = capture_logs();
        let store = open(&MemorySlot::with_entry(KEY, "{not json"));
        assert_eq!(store.len(), 2);
        assert!(logs.has_event(Level::WARN, "malformed"));
    }

    #[test]
    fn wrong_shape_is_malformed() {
        let store = open(&MemorySlot::with_entry(KEY, r#"{"id":1}"#));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn unavailable_slot_runs_empty_in_memory() {
        let (logs, _guard) = capture_logs();
        let mut store = TaskStore::open(Box::new(UnavailableSlot), StoreOptions::default());
        assert!(store.is_empty());
        assert!(!store.is_persistent());
        assert!(logs.has_event(Level::WARN, "unavailable"));

        store.add(task(1, "Still works"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn custom_key_is_used() {
        let slot = MemorySlot::new();
        let mut store = TaskStore::open(
            Box::new(slot.clone()),
            StoreOptions {
                key: "work.tasks".into(),
                seed: false,
            },
        );
        store.add(task(1, "A"));
        assert!(slot.get("work.tasks").is_some());
        assert!(slot.get(KEY).is_none());
        assert_eq!(store.key(), "work.tasks");
    }

    // ── Mutations ───────────────────────────────────────────────────

    #[test]
    fn add_appends_without_uniqueness_check() {
        let mut store = TaskStore::in_memory(vec![task(1, "A")]);
        store.add(task(2, "B"));
        store.add(task(1, "A again"));
        assert_eq!(ids(store.get_all()), vec![1, 2, 1]);
        assert_eq!(store.get_by_id(TaskId::new(1)).unwrap().title, "A");
    }

    #[test]
    fn update_replaces_in_place() {
        let mut store = TaskStore::in_memory(vec![task(1, "A"), task(2, "B"), task(3, "C")]);
        let mut changed = task(2, "B2");
        changed.done = true;
        changed.priority = TaskPriority::High;
        store.update(changed.clone());

        assert_eq!(ids(store.get_all()), vec![1, 2, 3]);
        assert_eq!(store.get_all()[1], changed);
        assert_eq!(store.get_all()[0].title, "A");
    }

    #[test]
    fn update_unknown_id_is_silent_noop() {
        let mut store = TaskStore::in_memory(vec![task(1, "A")]);
        store.update(task(99, "Ghost"));
        assert_eq!(store.get_all(), &[task(1, "A")]);
    }

    #[test]
    fn delete_removes_all_matches() {
        let mut store = TaskStore::in_memory(vec![task(1, "A"), task(2, "B"), task(1, "dup")]);
        store.delete(TaskId::new(1));
        assert_eq!(ids(store.get_all()), vec![2]);
    }

    #[test]
    fn delete_unknown_id_is_silent_noop() {
        let mut store = TaskStore::in_memory(vec![task(1, "A")]);
        store.delete(TaskId::new(42));
        assert_eq!(store.len(), 1);
    }

    // ── Persistence ─────────────────────────────────────────────────

    #[test]
    fn every_mutation_persists_full_collection() {
        let slot = MemorySlot::with_entry(KEY, "[]");
        let mut store = open(&slot);

        store.add(task(1, "A"));
        assert_eq!(stored(&slot), vec![task(1, "A")]);

        store.add(task(2, "B"));
        let mut done = task(1, "A");
        done.done = true;
        store.update(done.clone());
        assert_eq!(stored(&slot), vec![done, task(2, "B")]);

        store.delete(TaskId::new(2));
        assert_eq!(ids(&stored(&slot)), vec![1]);

        store.delete(TaskId::new(2));
        assert_eq!(ids(&stored(&slot)), vec![1]);
    }

    #[test]
    fn reload_reconstructs_added_task() {
        let slot = MemorySlot::new();
        let mut t = task(7, "Persist me");
        t.priority = TaskPriority::Low;
        t.dependencies = vec![TaskId::new(1), TaskId::new(999)];
        {
            let mut store = open(&slot);
            store.add(t.clone());
        }
        let reopened = open(&slot);
        assert_eq!(reopened.get_by_id(TaskId::new(7)), Some(&t));
        assert_eq!(reopened.len(), 3);
    }

    #[test]
    fn memory_only_store_never_writes() {
        let mut store = TaskStore::in_memory(Vec::new());
        store.add(task(1, "A"));
        assert!(!store.is_persistent());
    }

    struct FailingSlot;

    impl KeyValueSlot for FailingSlot {
        fn read(&self, _key: &str) -> Result<Option<Vec<u8>>, StorageError> {
            Err(std::io::Error::other("disk on fire").into())
        }

        fn write(&mut self, _key: &str, _bytes: &[u8]) -> Result<(), StorageError> {
            Err(std::io::Error::other("disk on fire").into())
        }
    }

    #[test]
    fn storage_failures_are_logged_not_raised() {
        let (logs, _guard) = capture_logs();
        let mut store = TaskStore::open(Box::new(FailingSlot), StoreOptions::default());
        assert_eq!(store.len(), 2);
        assert!(logs.has_event(Level::WARN, "failed to read"));

        store.add(task(1, "A"));
        assert_eq!(store.len(), 3);
        assert!(logs.has_event(Level::WARN, "failed to persist"));
    }

    // ── Subscriptions ───────────────────────────────────────────────

    fn recorder() -> (Arc<Mutex<Vec<TaskSnapshot>>>, impl FnMut(&TaskSnapshot) + Send + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, move |s: &TaskSnapshot| sink.lock().unwrap().push(Arc::clone(s)))
    }

    #[test]
    fn subscribe_receives_current_snapshot_immediately() {
        let mut store = TaskStore::in_memory(vec![task(1, "A")]);
        let (seen, cb) = recorder();
        store.subscribe(cb);
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(ids(&seen[0]), vec![1]);
    }

    #[test]
    fn every_mutation_notifies_before_returning() {
        let mut store = TaskStore::in_memory(Vec::new());
        let (seen, cb) = recorder();
        store.subscribe(cb);

        store.add(task(1, "A"));
        assert_eq!(seen.lock().unwrap().len(), 2);
        store.update(task(1, "A2"));
        store.update(task(5, "missing"));
        store.delete(TaskId::new(1));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 5);
        assert_eq!(seen[2][0].title, "A2");
        assert!(seen[4].is_empty());
    }

    #[test]
    fn snapshots_are_independent_of_later_mutations() {
        let mut store = TaskStore::in_memory(vec![task(1, "A")]);
        let before = store.snapshot();
        store.add(task(2, "B"));
        assert_eq!(before.len(), 1);
        assert_eq!(store.snapshot().len(), 2);
        assert!(!Arc::ptr_eq(&before, &store.snapshot()));
    }

    #[test]
    fn all_subscribers_notified_in_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut store = TaskStore::in_memory(Vec::new());
        for n in 0..3 {
            let order = Arc::clone(&order);
            store.subscribe(move |_| order.lock().unwrap().push(n));
        }
        order.lock().unwrap().clear();

        store.add(task(1, "A"));
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let mut store = TaskStore::in_memory(Vec::new());
        let (seen, cb) = recorder();
        let id = store.subscribe(cb);

        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        assert_eq!(store.subscriber_count(), 0);

        store.add(task(1, "A"));
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn late_subscriber_gets_latest_snapshot() {
        let mut store = TaskStore::in_memory(Vec::new());
        store.add(task(1, "A"));
        store.add(task(2, "B"));
        let (seen, cb) = recorder();
        store.subscribe(cb);
        assert_eq!(ids(&seen.lock().unwrap()[0]), vec![1, 2]);
    }
}
