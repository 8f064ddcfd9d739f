//! Data models for quakelens.
//!
//! This module contains the core data structures used throughout the system.

mod event;
mod geo;
mod geojson;
mod layer;
mod task;

pub use event::{EventId, SeismicEvent};
pub use geo::{CornerQuad, GeoBounds, GeoPoint};
pub use geojson::{Feature, FeatureCollection, Geometry};
pub use layer::{ImageHandle, Layer, SelectionSet};
pub use task::{
    AnalysisKind, AnalysisRequest, EVENT_KIND_EARTHQUAKE, FilenameParts, Task, TaskStatus,
    build_filename, parse_filename,
};
