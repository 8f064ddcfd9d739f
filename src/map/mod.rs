//! Map surface abstraction and overlay placement.

mod probe;
mod reconcile;
mod surface;

pub use probe::{DecodeProbe, ImageDecodeProbe, PendingProbe, ProbeOutcome};
pub use reconcile::OverlayReconciler;
pub use surface::{
    LayerSpec, MapSurface, OVERLAY_OPACITY, RasterPaint, RecordingSurface, SourceSpec, SurfaceOp,
    TILE_MAX_ZOOM, TILE_MIN_ZOOM, TILE_SIZE,
};
