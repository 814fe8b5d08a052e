//! Durable key-value slots.
//!
//! The store persists through the [`KeyValueSlot`] trait so it never touches
//! the filesystem directly. Three implementations:
//!
//! | Slot               | Backing                                   |
//! |--------------------|-------------------------------------------|
//! | [`FileSlot`]       | one JSON file per key in a directory      |
//! | [`MemorySlot`]     | shared in-process map (tests, embedding)  |
//! | [`UnavailableSlot`]| nothing; forces memory-only mode          |

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::errors::StorageError;

/// A durable slot addressed by string keys.
pub trait KeyValueSlot: Send {
    /// Whether the slot can be used at all in this execution context.
    fn is_available(&self) -> bool {
        true
    }

    /// Read the bytes stored under `key`, `None` if nothing is stored.
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Replace whatever is stored under `key`.
    fn write(&mut self, key: &str, bytes: &[u8]) -> Result<(), StorageError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// MemorySlot
// ─────────────────────────────────────────────────────────────────────────────

/// In-process slot. Clones share the same entries, so a clone handed to a
/// second store sees what the first one wrote.
#[derive(Clone, Debug, Default)]
pub struct MemorySlot {
    entries: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemorySlot {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a slot holding `bytes` under `key`.
    pub fn with_entry(key: &str, bytes: impl Into<Vec<u8>>) -> Self {
        let slot = Self::new();
        let _ = slot.lock().insert(key.to_owned(), bytes.into());
        slot
    }

    /// Raw bytes stored under `key`.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.lock().get(key).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueSlot for MemorySlot {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.get(key))
    }

    fn write(&mut self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let _ = self.lock().insert(key.to_owned(), bytes.to_vec());
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// FileSlot
// ─────────────────────────────────────────────────────────────────────────────

/// Slot backed by a directory, one `<key>.json` file per key.
#[derive(Clone, Debug)]
pub struct FileSlot {
    dir: PathBuf,
}

impl FileSlot {
    /// Use `dir` as the slot directory. Nothing is created until first use.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Slot directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`. Characters outside `[A-Za-z0-9._-]` become `_`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{name}.json"))
    }
}

impl KeyValueSlot for FileSlot {
    fn is_available(&self) -> bool {
        if self.dir.is_dir() {
            return true;
        }
        match std::fs::create_dir_all(&self.dir) {
            Ok(()) => true,
            Err(e) => {
                debug!(dir = %self.dir.display(), error = %e, "slot directory unusable");
                false
            }
        }
    }

    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        match std::fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// UnavailableSlot
// ─────────────────────────────────────────────────────────────────────────────

/// Slot for contexts without durable storage.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnavailableSlot;

impl KeyValueSlot for UnavailableSlot {
    fn is_available(&self) -> bool {
        false
    }

    fn read(&self, _key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Err(StorageError::Unavailable("no durable storage".into()))
    }

    fn write(&mut self, _key: &str, _bytes: &[u8]) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("no durable storage".into()))
    }
}
