//! Overlay reconciliation.
//!
//! Keeps the set of sources/layers registered on the map surface in
//! agreement with two independently changing inputs: the layer collection
//! (which images and metadata exist) and the selection set (which the user
//! wants visible). The reconciler is the single writer against the surface;
//! a pass never interleaves partial add/remove sequences.

use std::collections::HashMap;
use tracing::debug;

use super::probe::{DecodeProbe, ImageDecodeProbe};
use super::surface::{LayerSpec, MapSurface, SourceSpec};
use crate::models::{Layer, SelectionSet};

/// Derived surface identifiers for one overlay.
///
/// Keyed by filename so the ids survive reordering of the layer
/// collection; an overlay keeps its identity across reconcile passes.
#[derive(Debug, Clone, PartialEq, Eq)]
struct OverlayIds {
    source: String,
    layer: String,
}

impl OverlayIds {
    fn for_filename(filename: &str) -> Self {
        Self {
            source: format!("raster-source-{filename}"),
            layer: format!("raster-layer-{filename}"),
        }
    }
}

/// How overlay sources are materialized on the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
enum OverlayMode {
    /// Bind the fetched image at its corner quad.
    Image,
    /// Address a server-rendered tile pyramid per event.
    Tiles {
        /// Service base URL the tile template is derived from.
        endpoint: String,
    },
}

/// Brings the map surface in line with the layer collection and selection.
///
/// Owns the bookkeeping of which overlays it has registered; everything it
/// adds it can also tear down, so no dangling surface state survives a
/// map unmount.
#[derive(Debug)]
pub struct OverlayReconciler<P = ImageDecodeProbe> {
    probe: P,
    mode: OverlayMode,
    registered: HashMap<String, OverlayIds>,
}

impl OverlayReconciler<ImageDecodeProbe> {
    /// Creates an image-mode reconciler with the in-process decode probe.
    #[must_use]
    pub fn new() -> Self {
        Self::with_probe(ImageDecodeProbe::new())
    }

    /// Creates a tile-mode reconciler.
    ///
    /// Overlays are registered as raster tile sources addressed at
    /// `{endpoint}/geospatial/tiles` instead of corner-bound images.
    #[must_use]
    pub fn tiles(endpoint: impl Into<String>) -> Self {
        Self {
            probe: ImageDecodeProbe::new(),
            mode: OverlayMode::Tiles {
                endpoint: endpoint.into(),
            },
            registered: HashMap::new(),
        }
    }
}

impl Default for OverlayReconciler<ImageDecodeProbe> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: DecodeProbe> OverlayReconciler<P> {
    /// Creates an image-mode reconciler with a caller-supplied probe.
    #[must_use]
    pub fn with_probe(probe: P) -> Self {
        Self {
            probe,
            mode: OverlayMode::Image,
            registered: HashMap::new(),
        }
    }

    /// Reconciles the surface with the current layers and selection.
    ///
    /// Selected layers that are ready (valid corner quad, image that
    /// probes as decodable) are registered under stable filename-derived
    /// ids; registered overlays whose filename is no longer selected (or
    /// whose layer vanished) are unregistered, layer before source. A
    /// layer that is not ready is skipped, never an error; repeating the
    /// call with unchanged inputs registers nothing twice.
    pub fn reconcile(
        &mut self,
        layers: &[Layer],
        selection: &SelectionSet,
        surface: &mut dyn MapSurface,
    ) {
        for layer in layers {
            if !selection.contains(&layer.filename) {
                continue;
            }
            let ids = OverlayIds::for_filename(&layer.filename);
            if surface.has_layer(&ids.layer) {
                continue;
            }
            let Some(source_spec) = self.source_for(layer) else {
                continue;
            };
            surface.add_source(&ids.source, source_spec);
            surface.add_layer(LayerSpec::raster(&ids.layer, &ids.source));
            debug!(filename = %layer.filename, "registered overlay");
            self.registered.insert(layer.filename.clone(), ids);
        }

        let stale: Vec<String> = self
            .registered
            .keys()
            .filter(|filename| {
                !selection.contains(*filename)
                    || !layers.iter().any(|layer| &layer.filename == *filename)
            })
            .cloned()
            .collect();
        for filename in stale {
            self.unregister(&filename, surface);
        }
    }

    /// Removes every overlay this reconciler registered.
    ///
    /// Called when the surface is being torn down; afterwards the surface
    /// holds none of the reconciler's sources or layers.
    pub fn teardown(&mut self, surface: &mut dyn MapSurface) {
        let filenames: Vec<String> = self.registered.keys().cloned().collect();
        for filename in filenames {
            self.unregister(&filename, surface);
        }
    }

    /// Filenames currently registered on the surface.
    #[must_use]
    pub fn registered_filenames(&self) -> Vec<&str> {
        self.registered.keys().map(String::as_str).collect()
    }

    fn unregister(&mut self, filename: &str, surface: &mut dyn MapSurface) {
        if let Some(ids) = self.registered.remove(filename) {
            // Layer first: the engine refuses to drop a source that still
            // has a layer attached.
            surface.remove_layer(&ids.layer);
            surface.remove_source(&ids.source);
            debug!(filename = %filename, "unregistered overlay");
        }
    }

    fn source_for(&mut self, layer: &Layer) -> Option<SourceSpec> {
        match &self.mode {
            OverlayMode::Tiles { endpoint } => Some(SourceSpec::tiles(format!(
                "{endpoint}/geospatial/tiles?eventid={}&z={{z}}&x={{x}}&y={{y}}",
                layer.event_id
            ))),
            OverlayMode::Image => {
                let quad = match layer.corner_quad() {
                    Ok(quad) => quad,
                    Err(error) => {
                        debug!(
                            filename = %layer.filename,
                            %error,
                            "skipping overlay with unusable footprint"
                        );
                        return None;
                    }
                };
                let image = layer.image.as_ref()?;
                if !self.probe.probe(image).is_valid() {
                    return None;
                }
                Some(SourceSpec::Image {
                    image: image.clone(),
                    coordinates: quad.registration_order(),
                })
            }
        }
    }
}
