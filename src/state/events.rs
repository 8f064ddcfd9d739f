//! Seismic event collection and selection state.

use std::collections::BTreeSet;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use super::STORE_CHANNEL_CAPACITY;
use crate::models::SeismicEvent;
use crate::{Error, Result};

/// Sequence token tying a fetch completion to the request that started it.
///
/// Tickets are issued in monotonically increasing order; only the most
/// recently issued ticket may merge its response, so a slow fetch that
/// resolves after a newer one was started is discarded instead of
/// overwriting fresher state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[must_use]
pub struct FetchTicket(u64);

/// Change notification published by [`EventStore`].
#[derive(Debug, Clone)]
pub enum EventChange {
    /// A completed fetch replaced the event collection.
    Replaced {
        /// Number of events now held.
        count: usize,
    },
    /// An index was toggled into or out of the selection.
    Toggled {
        /// The toggled index.
        index: usize,
        /// Whether the index is now selected.
        selected: bool,
    },
}

/// Owns the current event collection and its index-based multi-selection.
#[derive(Debug)]
pub struct EventStore {
    events: Vec<SeismicEvent>,
    selected: BTreeSet<usize>,
    latest_ticket: u64,
    sender: broadcast::Sender<EventChange>,
}

impl EventStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _receiver) = broadcast::channel(STORE_CHANNEL_CAPACITY);
        Self {
            events: Vec::new(),
            selected: BTreeSet::new(),
            latest_ticket: 0,
            sender,
        }
    }

    /// Cloned view of the current events.
    #[must_use]
    pub fn snapshot(&self) -> Vec<SeismicEvent> {
        self.events.clone()
    }

    /// The event at `index`, if in range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&SeismicEvent> {
        self.events.get(index)
    }

    /// Number of events held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Currently selected indexes, ascending.
    #[must_use]
    pub fn selected(&self) -> Vec<usize> {
        self.selected.iter().copied().collect()
    }

    /// The events behind the current selection, in index order.
    #[must_use]
    pub fn selected_events(&self) -> Vec<&SeismicEvent> {
        self.selected
            .iter()
            .filter_map(|&index| self.events.get(index))
            .collect()
    }

    /// Subscribes to change notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<EventChange> {
        self.sender.subscribe()
    }

    /// Toggles the selection state of `index`.
    ///
    /// Selecting an already-selected index (or deselecting an unselected
    /// one) is a no-op and publishes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when `index` is out of range.
    pub fn toggle(&mut self, index: usize, on: bool) -> Result<()> {
        if index >= self.events.len() {
            return Err(Error::Validation(format!(
                "selection index {index} out of range ({} events)",
                self.events.len()
            )));
        }
        let changed = if on {
            self.selected.insert(index)
        } else {
            self.selected.remove(&index)
        };
        if changed {
            self.publish(EventChange::Toggled {
                index,
                selected: on,
            });
        }
        Ok(())
    }

    /// Issues a ticket for a fetch that is about to start.
    ///
    /// Issuing a new ticket invalidates all earlier ones.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.latest_ticket += 1;
        FetchTicket(self.latest_ticket)
    }

    /// Merges a completed fetch, if `ticket` is still the latest issued.
    ///
    /// Returns whether the merge was applied. A stale ticket leaves the
    /// store untouched. Merging replaces the collection and drops
    /// selection indexes that no longer point at an event.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, events: Vec<SeismicEvent>) -> bool {
        if ticket.0 != self.latest_ticket {
            warn!(
                ticket = ticket.0,
                latest = self.latest_ticket,
                "discarding stale fetch response"
            );
            return false;
        }
        let count = events.len();
        self.events = events;
        self.selected.retain(|&index| index < count);
        debug!(count, "event collection replaced");
        self.publish(EventChange::Replaced { count });
        true
    }

    fn publish(&self, change: EventChange) {
        // Best effort; no subscribers is fine.
        let _ = self.sender.send(change);
    }
}

impl Default for EventStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventId, GeoPoint};
    use chrono::{TimeZone, Utc};

    fn events(n: usize) -> Vec<SeismicEvent> {
        (0..n)
            .map(|i| SeismicEvent {
                id: EventId::new(format!("ev{i}")),
                magnitude: 5.5,
                occurred_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
                location: GeoPoint::new(85.2, 28.1),
                description: String::new(),
            })
            .collect()
    }

    fn filled(n: usize) -> EventStore {
        let mut store = EventStore::new();
        let ticket = store.begin_fetch();
        assert!(store.complete_fetch(ticket, events(n)));
        store
    }

    #[test]
    fn test_toggle_on_then_off() {
        let mut store = filled(3);
        store.toggle(1, true).unwrap();
        assert_eq!(store.selected(), vec![1]);
        store.toggle(1, false).unwrap();
        assert!(store.selected().is_empty());
    }

    #[test]
    fn test_duplicate_toggle_on_is_noop() {
        let mut store = filled(3);
        let mut rx = store.subscribe();
        store.toggle(2, true).unwrap();
        store.toggle(2, true).unwrap();
        assert_eq!(store.selected(), vec![2]);

        assert!(matches!(
            rx.try_recv(),
            Ok(EventChange::Toggled {
                index: 2,
                selected: true
            })
        ));
        // Second toggle published nothing.
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_toggle_off_absent_index_is_noop() {
        let mut store = filled(3);
        store.toggle(0, false).unwrap();
        assert!(store.selected().is_empty());
    }

    #[test]
    fn test_toggle_out_of_range_is_rejected() {
        let mut store = filled(2);
        assert!(store.toggle(2, true).is_err());
        assert!(store.toggle(usize::MAX, true).is_err());
    }

    #[test]
    fn test_stale_ticket_is_discarded() {
        let mut store = EventStore::new();
        let old = store.begin_fetch();
        let new = store.begin_fetch();

        assert!(store.complete_fetch(new, events(2)));
        // The slow first fetch resolves late and must not clobber state.
        assert!(!store.complete_fetch(old, events(5)));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_latest_ticket_wins_regardless_of_resolve_order() {
        let mut store = EventStore::new();
        let _old = store.begin_fetch();
        let new = store.begin_fetch();
        assert!(store.complete_fetch(new, events(1)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_replace_trims_out_of_range_selection() {
        let mut store = filled(5);
        store.toggle(0, true).unwrap();
        store.toggle(4, true).unwrap();

        let ticket = store.begin_fetch();
        assert!(store.complete_fetch(ticket, events(2)));

        assert_eq!(store.selected(), vec![0]);
    }

    #[test]
    fn test_selected_events_follow_index_order() {
        let mut store = filled(3);
        store.toggle(2, true).unwrap();
        store.toggle(0, true).unwrap();
        let ids: Vec<&str> = store
            .selected_events()
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(ids, vec!["ev0", "ev2"]);
    }
}
