//! Durable local persistence.
//!
//! State snapshots and the event cache go through the [`DurableStore`]
//! key-value contract; the filesystem implementation is the production
//! backend, the in-memory one backs tests.

mod cache;
mod file;
mod memory;

pub use cache::{CachedEvents, EVENT_CACHE_PREFIX, EventCache};
pub use file::FileStore;
pub use memory::MemoryStore;

use crate::Result;

/// Key-value persistence scoped to the local installation.
///
/// The store is the authoritative snapshot location for the layer registry
/// and the read-through event cache. Values are opaque strings; callers
/// own the serialization. A `set` atomically replaces the previous value
/// under that key.
pub trait DurableStore: Send + Sync {
    /// Reads the value under `key`, `None` when absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes the value under `key`; absent keys are a no-op.
    fn remove(&self, key: &str) -> Result<()>;

    /// Whether a value exists under `key`.
    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}

impl<T: DurableStore + ?Sized> DurableStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
