//! The fetch-filter-cache event pipeline.

use std::time::Duration;
use tracing::{info, warn};

use crate::config::{QuakelensConfig, Region};
use crate::geo::filter_nearby;
use crate::models::{EventId, SeismicEvent};
use crate::providers::{EventDataProvider, ProviderConfig, QueryWindow};
use crate::state::EventStore;
use crate::storage::{DurableStore, EventCache};
use crate::Result;

/// Orchestrates event retrieval for a region.
///
/// The pipeline is: cache lookup → (miss) provider fetch → proximity
/// filter around the region center → cache store → merge into the event
/// store under a fetch ticket. When `pinned_events` is configured, the
/// pin list replaces the proximity filter.
#[derive(Debug)]
pub struct EventFeed<S> {
    provider: EventDataProvider,
    cache: EventCache<S>,
    radius_km: f64,
    min_magnitude: f64,
    lookback_years: i64,
    pinned: Vec<EventId>,
}

impl<S: DurableStore> EventFeed<S> {
    /// Creates a feed from the configuration, caching through `store`.
    pub fn new(config: &QuakelensConfig, store: S) -> Self {
        let provider_config = ProviderConfig::new(&config.endpoint);
        let ttl = Duration::from_secs(config.cache_ttl_hours * 60 * 60);
        Self {
            provider: EventDataProvider::new(&provider_config),
            cache: EventCache::with_ttl(store, ttl),
            radius_km: config.radius_km,
            min_magnitude: config.min_magnitude,
            lookback_years: config.lookback_years,
            pinned: config.pinned_events.clone(),
        }
    }

    /// Refreshes the event collection for `region`.
    ///
    /// Returns the events that were merged. A fresh cache entry
    /// short-circuits the network entirely (unless `use_cache` is false).
    /// Provider failures downgrade to an empty result with a warning; the
    /// store keeps whatever it held before. A fetch superseded by a newer
    /// one (its ticket went stale while awaiting the network) is discarded
    /// at merge time.
    pub async fn refresh(
        &self,
        region: &Region,
        store: &mut EventStore,
        use_cache: bool,
    ) -> Result<Vec<SeismicEvent>> {
        let ticket = store.begin_fetch();

        if use_cache {
            if let Some(cached) = self.cache.lookup(&region.name)? {
                info!(region = %region.name, count = cached.len(), "serving events from cache");
                store.complete_fetch(ticket, cached.clone());
                return Ok(cached);
            }
        }

        let window = QueryWindow::last_years(self.lookback_years);
        let fetched = match self
            .provider
            .fetch_earthquakes(&region.bounds, &window, self.min_magnitude)
            .await
        {
            Ok(events) => events,
            Err(error) => {
                // Downgrade: the dashboard shows an empty list, prior
                // state stays untouched.
                warn!(region = %region.name, %error, "event fetch failed, no data");
                return Ok(Vec::new());
            }
        };

        let nearby = self.narrow(region, fetched);
        self.cache.store(&region.name, &nearby)?;
        store.complete_fetch(ticket, nearby.clone());
        Ok(nearby)
    }

    /// Drops any cached entry for `region`.
    pub fn evict_cache(&self, region: &Region) -> Result<()> {
        self.cache.evict(&region.name)
    }

    /// Applies the proximity filter, or the pin list when configured.
    fn narrow(&self, region: &Region, events: Vec<SeismicEvent>) -> Vec<SeismicEvent> {
        if self.pinned.is_empty() {
            return filter_nearby(region.center, &events, self.radius_km);
        }
        events
            .into_iter()
            .filter(|event| self.pinned.contains(&event.id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GeoPoint;
    use crate::storage::MemoryStore;
    use chrono::{TimeZone, Utc};

    fn event(id: &str, longitude: f64, latitude: f64) -> SeismicEvent {
        SeismicEvent {
            id: EventId::new(id),
            magnitude: 6.0,
            occurred_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            location: GeoPoint::new(longitude, latitude),
            description: String::new(),
        }
    }

    fn nepal() -> Region {
        Region::new(
            "nepal",
            GeoPoint::new(85.2, 28.1),
            crate::models::GeoBounds::new(26.3, 30.4, 80.0, 88.2),
        )
    }

    fn feed(pinned: Vec<EventId>) -> EventFeed<MemoryStore> {
        let mut config = QuakelensConfig::default();
        config.pinned_events = pinned;
        EventFeed::new(&config, MemoryStore::new())
    }

    #[test]
    fn test_narrow_filters_by_proximity() {
        let feed = feed(Vec::new());
        let events = vec![event("near", 85.3, 28.2), event("far", 0.0, 0.0)];
        let nearby = feed.narrow(&nepal(), events);
        assert_eq!(nearby.len(), 1);
        assert_eq!(nearby[0].id.as_str(), "near");
    }

    #[test]
    fn test_narrow_honors_overridden_radius() {
        // "close" is roughly 15 km from the Nepal center, "regional" about
        // 135 km; both sit inside the default 900 km radius.
        let events = vec![event("close", 85.3, 28.2), event("regional", 86.5, 28.5)];
        let wide = feed(Vec::new()).narrow(&nepal(), events.clone());
        assert_eq!(wide.len(), 2);

        let config = QuakelensConfig::default().with_radius_km(50.0);
        let tight = EventFeed::new(&config, MemoryStore::new());
        let close = tight.narrow(&nepal(), events);
        assert_eq!(close.len(), 1);
        assert_eq!(close[0].id.as_str(), "close");
    }

    #[test]
    fn test_pin_list_replaces_proximity_filter() {
        let feed = feed(vec![EventId::new("far")]);
        let events = vec![event("near", 85.3, 28.2), event("far", 0.0, 0.0)];
        let narrowed = feed.narrow(&nepal(), events);
        assert_eq!(narrowed.len(), 1);
        assert_eq!(narrowed[0].id.as_str(), "far");
    }

    #[tokio::test]
    async fn test_cache_hit_short_circuits_network() {
        // The provider endpoint is unreachable; a warm cache must satisfy
        // the refresh anyway.
        let mut config = QuakelensConfig::default();
        config.endpoint = "http://127.0.0.1:9".to_string();
        let feed = EventFeed::new(&config, MemoryStore::new());
        feed.cache
            .store("nepal", &[event("cached", 85.2, 28.1)])
            .unwrap();

        let mut store = EventStore::new();
        let merged = feed.refresh(&nepal(), &mut store, true).await.unwrap();

        assert_eq!(merged.len(), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(0).unwrap().id.as_str(), "cached");
    }

    #[tokio::test]
    async fn test_fetch_failure_downgrades_to_no_data() {
        let mut config = QuakelensConfig::default();
        config.endpoint = "http://127.0.0.1:9".to_string();
        let feed = EventFeed::new(&config, MemoryStore::new());

        let mut store = EventStore::new();
        // Seed prior state; a failed refresh must not clobber it.
        let ticket = store.begin_fetch();
        store.complete_fetch(ticket, vec![event("prior", 85.2, 28.1)]);

        let merged = feed.refresh(&nepal(), &mut store, false).await.unwrap();

        assert!(merged.is_empty());
        assert_eq!(store.len(), 1);
    }
}
