//! In-memory durable store for tests and ephemeral runs.

use std::collections::HashMap;
use std::sync::Mutex;

use super::DurableStore;
use crate::{Error, Result};

/// Durable store held entirely in memory.
///
/// Nothing survives the process; used where tests need a store without
/// touching the filesystem.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.values.lock().map_err(|_| Error::Storage {
            operation: "lock_memory_store".to_string(),
            cause: "store mutex poisoned".to_string(),
        })
    }
}

impl DurableStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}
