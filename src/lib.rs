//! # Quakelens
//!
//! Client-side core for a geospatial earthquake monitoring dashboard.
//!
//! Quakelens fetches recent seismic events from a geospatial backend,
//! narrows them to the ones near a selected region with a great-circle
//! proximity filter, requests derived raster analyses (interferograms,
//! change detection), and reconciles the georeferenced result images onto
//! an abstract map rendering surface.
//!
//! ## Features
//!
//! - Haversine proximity filter over provider event feeds
//! - Overlay reconciliation keyed by stable per-layer identifiers
//! - Durable layer registry snapshot that survives restarts
//! - Time-boxed (24 h) region-keyed event cache
//! - Map surface abstraction substitutable with a recording fake in tests
//!
//! ## Example
//!
//! ```rust,ignore
//! use quakelens::geo::filter_nearby;
//! use quakelens::models::GeoPoint;
//!
//! let reference = GeoPoint::new(37.8, 34.5);
//! let nearby = filter_nearby(reference, &events, 900.0);
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
// multiple_crate_versions is inherently crate-level (detects duplicate transitive dependencies).
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod cli;
pub mod config;
pub mod geo;
pub mod map;
pub mod models;
pub mod observability;
pub mod providers;
pub mod services;
pub mod state;
pub mod storage;

// Re-exports for convenience
pub use config::{QuakelensConfig, Region};
pub use geo::{filter_nearby, haversine_km};
pub use map::{MapSurface, OverlayReconciler, ProbeOutcome};
pub use models::{
    AnalysisKind, AnalysisRequest, CornerQuad, EventId, GeoBounds, GeoPoint, ImageHandle, Layer,
    SeismicEvent, Task, TaskStatus,
};
pub use services::{AnalysisDesk, EventFeed, LayerSync};
pub use state::{AuthState, EventStore, LayerRegistry};
pub use storage::{DurableStore, EventCache, FileStore, MemoryStore};

/// Error type for quakelens operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait implementations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `Transport` | Network fetch failed or returned a non-success status |
/// | `Decode` | Response payload missing expected fields, or a raster/GeoJSON body failed to parse |
/// | `Validation` | Malformed corner quad, coordinate out of range, bad filename or region name |
/// | `Storage` | Durable store read/write failed |
/// | `Config` | Configuration file could not be read or parsed |
#[derive(Debug, ThisError)]
pub enum Error {
    /// A network operation failed.
    ///
    /// Raised when:
    /// - The HTTP request could not be sent (timeout, connect failure)
    /// - The backend returned a non-success status code
    #[error("transport failure in '{operation}': {cause}")]
    Transport {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// A payload could not be decoded.
    ///
    /// Raised when:
    /// - A response body is missing `png_base64` or `geojson`
    /// - Base64 or JSON decoding fails
    /// - An event feature lacks usable coordinates
    #[error("failed to decode {what}: {cause}")]
    Decode {
        /// What was being decoded.
        what: String,
        /// The underlying cause.
        cause: String,
    },

    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - A coordinate falls outside valid longitude/latitude ranges
    /// - A corner ring does not yield exactly four points
    /// - A selection index is out of range
    /// - A filename or storage key contains invalid characters
    #[error("validation failed: {0}")]
    Validation(String),

    /// A durable store operation failed.
    ///
    /// Raised when:
    /// - The snapshot file cannot be written
    /// - Filesystem I/O errors occur
    #[error("storage operation '{operation}' failed: {cause}")]
    Storage {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// Configuration could not be loaded.
    #[error("config operation '{operation}' failed: {cause}")]
    Config {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

/// Result type alias for quakelens operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Returns the current Unix timestamp in seconds.
///
/// Centralized so cache envelopes and store events agree on a clock.
/// Uses `SystemTime::now()` with a fallback to 0 if the system clock is
/// before the Unix epoch.
#[must_use]
pub fn current_timestamp() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
