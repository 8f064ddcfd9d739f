//! Minimal capability interface of the map rendering engine.
//!
//! Overlay placement depends only on this trait, so it can run against a
//! real rendering engine binding or against the in-memory
//! [`RecordingSurface`] used in tests and headless runs.

use std::collections::HashMap;

use crate::models::ImageHandle;

/// Opacity applied to every raster overlay layer.
pub const OVERLAY_OPACITY: f64 = 0.7;

/// Pixel size of raster tiles in tiled sources.
pub const TILE_SIZE: u32 = 256;

/// Lowest zoom level tiled sources are rendered at.
pub const TILE_MIN_ZOOM: u8 = 5;

/// Highest zoom level tiled sources are rendered at.
pub const TILE_MAX_ZOOM: u8 = 8;

/// Definition of a raster source to register on the surface.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceSpec {
    /// A single georeferenced image bound at four corner coordinates.
    Image {
        /// Decoded raster content.
        image: ImageHandle,
        /// Corner binding in render order
        /// `[lower_left, lower_right, upper_right, upper_left]`.
        coordinates: [[f64; 2]; 4],
    },
    /// A tiled raster pyramid addressed by a URL template.
    RasterTiles {
        /// Template with `{z}/{x}/{y}` placeholders.
        url_template: String,
        /// Tile edge length in pixels.
        tile_size: u32,
        /// Minimum zoom the source covers.
        min_zoom: u8,
        /// Maximum zoom the source covers.
        max_zoom: u8,
    },
}

impl SourceSpec {
    /// Builds a tiled source with the standard tile geometry.
    #[must_use]
    pub fn tiles(url_template: impl Into<String>) -> Self {
        Self::RasterTiles {
            url_template: url_template.into(),
            tile_size: TILE_SIZE,
            min_zoom: TILE_MIN_ZOOM,
            max_zoom: TILE_MAX_ZOOM,
        }
    }
}

/// Paint properties for a raster layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterPaint {
    /// Blend factor of the overlay against the base map.
    pub raster_opacity: f64,
}

impl Default for RasterPaint {
    fn default() -> Self {
        Self {
            raster_opacity: OVERLAY_OPACITY,
        }
    }
}

/// Definition of a raster layer bound to a registered source.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSpec {
    /// Layer identifier.
    pub id: String,
    /// Identifier of the source this layer renders.
    pub source: String,
    /// Paint properties.
    pub paint: RasterPaint,
}

impl LayerSpec {
    /// Creates a raster layer spec with the default overlay paint.
    #[must_use]
    pub fn raster(id: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            paint: RasterPaint::default(),
        }
    }
}

/// The rendering-engine operations overlay placement needs.
///
/// All mutation calls are serialized by the single-writer reconciler; the
/// engine itself reports nothing back, so the methods are infallible.
pub trait MapSurface {
    /// Registers a source under `id`.
    fn add_source(&mut self, id: &str, spec: SourceSpec);

    /// Registers a layer.
    fn add_layer(&mut self, spec: LayerSpec);

    /// Whether a layer with `id` is currently registered.
    fn has_layer(&self, id: &str) -> bool;

    /// Removes the layer with `id`, if present.
    fn remove_layer(&mut self, id: &str);

    /// Removes the source with `id`, if present.
    fn remove_source(&mut self, id: &str);
}

/// One mutation applied to a [`RecordingSurface`], in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceOp {
    /// `add_source(id, ..)` was called.
    AddSource(String),
    /// `add_layer(..)` was called with this layer id.
    AddLayer(String),
    /// `remove_layer(id)` was called.
    RemoveLayer(String),
    /// `remove_source(id)` was called.
    RemoveSource(String),
}

/// In-memory [`MapSurface`] that records every mutation.
///
/// Stands in for the rendering engine in tests and headless runs; the
/// operation journal makes ordering assertions possible (teardown must
/// remove a layer before its source).
#[derive(Debug, Default)]
pub struct RecordingSurface {
    sources: HashMap<String, SourceSpec>,
    layers: HashMap<String, LayerSpec>,
    ops: Vec<SurfaceOp>,
}

impl RecordingSurface {
    /// Creates an empty surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered source ids, unordered.
    #[must_use]
    pub fn source_ids(&self) -> Vec<&str> {
        self.sources.keys().map(String::as_str).collect()
    }

    /// Registered layer ids, unordered.
    #[must_use]
    pub fn layer_ids(&self) -> Vec<&str> {
        self.layers.keys().map(String::as_str).collect()
    }

    /// Looks up a registered source.
    #[must_use]
    pub fn source(&self, id: &str) -> Option<&SourceSpec> {
        self.sources.get(id)
    }

    /// Looks up a registered layer.
    #[must_use]
    pub fn layer(&self, id: &str) -> Option<&LayerSpec> {
        self.layers.get(id)
    }

    /// Number of registered sources.
    #[must_use]
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Number of registered layers.
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// The mutation journal, in call order.
    #[must_use]
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }
}

impl MapSurface for RecordingSurface {
    fn add_source(&mut self, id: &str, spec: SourceSpec) {
        self.sources.insert(id.to_string(), spec);
        self.ops.push(SurfaceOp::AddSource(id.to_string()));
    }

    fn add_layer(&mut self, spec: LayerSpec) {
        self.ops.push(SurfaceOp::AddLayer(spec.id.clone()));
        self.layers.insert(spec.id.clone(), spec);
    }

    fn has_layer(&self, id: &str) -> bool {
        self.layers.contains_key(id)
    }

    fn remove_layer(&mut self, id: &str) {
        if self.layers.remove(id).is_some() {
            self.ops.push(SurfaceOp::RemoveLayer(id.to_string()));
        }
    }

    fn remove_source(&mut self, id: &str) {
        if self.sources.remove(id).is_some() {
            self.ops.push(SurfaceOp::RemoveSource(id.to_string()));
        }
    }
}
