//! Layer types: a raster analysis product tied to an event.

use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::Arc;

use std::collections::BTreeSet;

use super::event::EventId;
use super::geo::CornerQuad;
use super::geojson::FeatureCollection;
use crate::Result;

/// Filenames the user has toggled visible.
pub type SelectionSet = BTreeSet<String>;

/// Decoded raster bytes, cheaply clonable.
///
/// The bytes are shared; cloning a handle never copies the image.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageHandle {
    bytes: Arc<Vec<u8>>,
}

impl ImageHandle {
    /// Wraps raster bytes in a handle.
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Arc::new(bytes),
        }
    }

    /// Returns the raw bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the byte length.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the handle holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Hex-encoded SHA-256 digest of the content.
    ///
    /// Used as the decode-probe cache key and as the snapshot integrity
    /// check.
    #[must_use]
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.bytes.as_slice());
        hex::encode(hasher.finalize())
    }
}

impl fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageHandle")
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// A user-selected analysis product plus its georeferencing metadata.
///
/// Created when the user adds an analysis result to the working set; the
/// `image` and `metadata` fields are populated asynchronously once the
/// layer payload has been fetched. Layers are owned exclusively by the
/// [`crate::state::LayerRegistry`]; the map surface only ever holds a
/// derived, non-owning projection.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// The event this analysis belongs to.
    pub event_id: EventId,
    /// Stable registry key, from the filename convention.
    pub filename: String,
    /// Decoded raster image, absent until fetched.
    pub image: Option<ImageHandle>,
    /// Footprint metadata, absent until fetched.
    pub metadata: Option<FeatureCollection>,
}

impl Layer {
    /// Creates a pending layer with no image or metadata yet.
    #[must_use]
    pub fn new(event_id: EventId, filename: impl Into<String>) -> Self {
        Self {
            event_id,
            filename: filename.into(),
            image: None,
            metadata: None,
        }
    }

    /// Whether both image and metadata have arrived.
    #[must_use]
    pub const fn is_populated(&self) -> bool {
        self.image.is_some() && self.metadata.is_some()
    }

    /// Extracts the corner quad from the footprint metadata.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Validation`] when metadata is absent, has no
    /// polygon ring, or the ring yields fewer than four corners.
    pub fn corner_quad(&self) -> Result<CornerQuad> {
        let ring = self
            .metadata
            .as_ref()
            .and_then(FeatureCollection::first_polygon_ring)
            .ok_or_else(|| {
                crate::Error::Validation(format!(
                    "layer '{}' has no polygon footprint",
                    self.filename
                ))
            })?;
        CornerQuad::from_ring(ring)
    }
}
