//! Orchestration services.
//!
//! Services tie providers, stores, and the cache together into the
//! dashboard's data flow: fetch events and narrow them to a region,
//! request analyses for selected events, and sync layer payloads into the
//! registry. Per the downgrade policy, transport and decode failures
//! become "no data" outcomes with a warning, never raised failures.

mod analysis_desk;
mod event_feed;
mod layer_sync;

pub use analysis_desk::AnalysisDesk;
pub use event_feed::EventFeed;
pub use layer_sync::LayerSync;
