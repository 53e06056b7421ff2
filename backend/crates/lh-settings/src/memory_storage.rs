use crate::{StorageBackend, StoreError, StoreResult};

use std::collections::HashMap;
use std::panic::Location;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use error_location::ErrorLocation;

/// Process-local backend. Used for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail, simulating an unusable local tier
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .lock()
            .map(|entries| entries.contains_key(key))
            .unwrap_or(false)
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries
            .lock()
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl StorageBackend for MemoryStorage {
    #[track_caller]
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        let entries = self.entries.lock().map_err(|_| StoreError::Unavailable {
            message: "memory storage lock poisoned".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;
        Ok(entries.get(key).cloned())
    }

    #[track_caller]
    fn write(&self, key: &str, value: &str) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable {
                message: format!("write to '{}' refused", key),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let mut entries = self.entries.lock().map_err(|_| StoreError::Unavailable {
            message: "memory storage lock poisoned".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
