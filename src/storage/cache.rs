//! Time-boxed event cache.
//!
//! Event list fetches are read-through cached per region: a fresh cache
//! entry short-circuits the network call entirely. Entries expire after a
//! validity window (24 hours by default); there is no other invalidation.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use super::DurableStore;
use crate::models::SeismicEvent;
use crate::{Result, current_timestamp};

/// Key prefix for cached event lists; the region name is appended.
pub const EVENT_CACHE_PREFIX: &str = "earthquake_data";

/// Default validity window.
const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Snapshot format of one cached region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedEvents {
    /// Unix timestamp (seconds) when the events were fetched.
    pub fetched_at: u64,
    /// The events as filtered at fetch time.
    pub events: Vec<SeismicEvent>,
}

/// Read-through cache for per-region event lists.
#[derive(Debug)]
pub struct EventCache<S> {
    store: S,
    ttl: Duration,
}

impl<S: DurableStore> EventCache<S> {
    /// Creates a cache with the default 24-hour validity window.
    pub fn new(store: S) -> Self {
        Self::with_ttl(store, DEFAULT_TTL)
    }

    /// Creates a cache with a custom validity window.
    pub fn with_ttl(store: S, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Returns the cached events for `region` when present and fresh.
    ///
    /// A missing, expired, or unreadable entry is a miss, never an error;
    /// unreadable entries are logged and left for the next store to
    /// overwrite.
    pub fn lookup(&self, region: &str) -> Result<Option<Vec<SeismicEvent>>> {
        let key = Self::cache_key(region);
        let Some(raw) = self.store.get(&key)? else {
            return Ok(None);
        };

        let cached: CachedEvents = match serde_json::from_str(&raw) {
            Ok(cached) => cached,
            Err(error) => {
                warn!(%region, %error, "discarding unreadable event cache entry");
                return Ok(None);
            }
        };

        let age = current_timestamp().saturating_sub(cached.fetched_at);
        if age >= self.ttl.as_secs() {
            debug!(%region, age_secs = age, "event cache entry expired");
            return Ok(None);
        }

        debug!(%region, count = cached.events.len(), "event cache hit");
        Ok(Some(cached.events))
    }

    /// Stores the events for `region`, stamping the current time.
    pub fn store(&self, region: &str, events: &[SeismicEvent]) -> Result<()> {
        let cached = CachedEvents {
            fetched_at: current_timestamp(),
            events: events.to_vec(),
        };
        let json = serde_json::to_string(&cached).map_err(|e| crate::Error::Storage {
            operation: "serialize_event_cache".to_string(),
            cause: e.to_string(),
        })?;
        self.store.set(&Self::cache_key(region), &json)
    }

    /// Drops the cached entry for `region`, if any.
    pub fn evict(&self, region: &str) -> Result<()> {
        self.store.remove(&Self::cache_key(region))
    }

    fn cache_key(region: &str) -> String {
        format!("{EVENT_CACHE_PREFIX}_{region}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventId, GeoPoint};
    use crate::storage::MemoryStore;
    use chrono::{TimeZone, Utc};

    fn sample_events() -> Vec<SeismicEvent> {
        vec![SeismicEvent {
            id: EventId::new("us7000m9g4"),
            magnitude: 6.1,
            occurred_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            location: GeoPoint::new(85.2, 28.1),
            description: "Nepal".to_string(),
        }]
    }

    #[test]
    fn test_store_then_lookup_hits() {
        let cache = EventCache::new(MemoryStore::new());
        cache.store("nepal", &sample_events()).unwrap();
        let hit = cache.lookup("nepal").unwrap().unwrap();
        assert_eq!(hit.len(), 1);
        assert_eq!(hit[0].id.as_str(), "us7000m9g4");
    }

    #[test]
    fn test_lookup_misses_for_unknown_region() {
        let cache = EventCache::new(MemoryStore::new());
        assert!(cache.lookup("turkey").unwrap().is_none());
    }

    #[test]
    fn test_regions_are_cached_independently() {
        let cache = EventCache::new(MemoryStore::new());
        cache.store("nepal", &sample_events()).unwrap();
        assert!(cache.lookup("turkey").unwrap().is_none());
        assert!(cache.lookup("nepal").unwrap().is_some());
    }

    #[test]
    fn test_expired_entry_is_a_miss() {
        let store = MemoryStore::new();
        let stale = CachedEvents {
            fetched_at: current_timestamp() - 25 * 60 * 60,
            events: sample_events(),
        };
        store
            .set(
                "earthquake_data_nepal",
                &serde_json::to_string(&stale).unwrap(),
            )
            .unwrap();

        let cache = EventCache::new(store);
        assert!(cache.lookup("nepal").unwrap().is_none());
    }

    #[test]
    fn test_corrupt_entry_is_a_miss_not_an_error() {
        let store = MemoryStore::new();
        store.set("earthquake_data_nepal", "{not json").unwrap();
        let cache = EventCache::new(store);
        assert!(cache.lookup("nepal").unwrap().is_none());
    }

    #[test]
    fn test_evict_forces_next_lookup_to_miss() {
        let cache = EventCache::new(MemoryStore::new());
        cache.store("nepal", &sample_events()).unwrap();
        cache.evict("nepal").unwrap();
        assert!(cache.lookup("nepal").unwrap().is_none());
    }
}
