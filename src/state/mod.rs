//! Unidirectional state stores.
//!
//! Each store owns its collection outright and exposes a defined set of
//! mutation operations plus a `snapshot()`/`subscribe()` read contract;
//! nothing outside a store mutates its fields directly. Change
//! notifications go out over a tokio broadcast channel, best effort: a
//! publish with no live subscribers is dropped silently.

mod auth;
mod events;
mod layers;

pub use auth::AuthState;
pub use events::{EventChange, EventStore, FetchTicket};
pub use layers::{LAYERS_KEY, LayerRegistry, RegistryChange};

/// Buffer capacity of each store's broadcast channel.
const STORE_CHANNEL_CAPACITY: usize = 64;
