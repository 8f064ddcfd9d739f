//! Layer registry: the canonical layer collection, selection set, and its
//! durable snapshot.
//!
//! The registry is the single writer for layer state. Each mutation
//! persists the full snapshot synchronously, so a reload restores exactly
//! what the last mutation left behind. Raster bytes are stored base64 in
//! the snapshot with a content digest; an entry whose image no longer
//! matches its digest comes back without the image rather than poisoning
//! the whole collection.

use base64::Engine;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use super::STORE_CHANNEL_CAPACITY;
use crate::models::{EventId, FeatureCollection, ImageHandle, Layer, SelectionSet};
use crate::storage::DurableStore;
use crate::{Error, Result};

/// Durable store key the registry snapshot lives under.
pub const LAYERS_KEY: &str = "layers";

/// Serializable layer format for the durable snapshot.
#[derive(Debug, Serialize, Deserialize)]
struct StoredLayer {
    #[serde(rename = "eventid")]
    event_id: String,
    filename: String,
    #[serde(default)]
    image_base64: Option<String>,
    #[serde(default)]
    image_digest: Option<String>,
    #[serde(default)]
    metadata: Option<FeatureCollection>,
}

impl From<&Layer> for StoredLayer {
    fn from(layer: &Layer) -> Self {
        Self {
            event_id: layer.event_id.as_str().to_string(),
            filename: layer.filename.clone(),
            image_base64: layer
                .image
                .as_ref()
                .map(|image| base64::engine::general_purpose::STANDARD.encode(image.as_bytes())),
            image_digest: layer.image.as_ref().map(ImageHandle::digest),
            metadata: layer.metadata.clone(),
        }
    }
}

impl StoredLayer {
    fn into_layer(self) -> Layer {
        let image = self.image_base64.and_then(|encoded| {
            let bytes = match base64::engine::general_purpose::STANDARD.decode(&encoded) {
                Ok(bytes) => bytes,
                Err(error) => {
                    warn!(filename = %self.filename, %error, "dropping undecodable snapshot image");
                    return None;
                }
            };
            let handle = ImageHandle::new(bytes);
            if let Some(expected) = &self.image_digest {
                if handle.digest() != *expected {
                    warn!(filename = %self.filename, "dropping snapshot image with digest mismatch");
                    return None;
                }
            }
            Some(handle)
        });
        Layer {
            event_id: EventId::new(self.event_id),
            filename: self.filename,
            image,
            metadata: self.metadata,
        }
    }
}

/// Full snapshot format persisted under [`LAYERS_KEY`].
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredRegistry {
    layers: Vec<StoredLayer>,
    #[serde(default)]
    selected: Vec<String>,
}

/// Change notification published by [`LayerRegistry`].
#[derive(Debug, Clone)]
pub enum RegistryChange {
    /// A layer was appended to the collection.
    Added {
        /// Filename of the new layer.
        filename: String,
    },
    /// A fetch merged image and metadata into an existing layer.
    ImageUpdated {
        /// Filename of the updated layer.
        filename: String,
    },
    /// A filename entered or left the selection set.
    SelectionChanged {
        /// The toggled filename.
        filename: String,
        /// Whether the filename is now selected.
        selected: bool,
    },
}

/// Owns the canonical layer collection across the session.
#[derive(Debug)]
pub struct LayerRegistry<S> {
    store: S,
    layers: Vec<Layer>,
    selected: SelectionSet,
    sender: broadcast::Sender<RegistryChange>,
}

impl<S: DurableStore> LayerRegistry<S> {
    /// Creates an empty registry on top of `store`.
    pub fn new(store: S) -> Self {
        let (sender, _receiver) = broadcast::channel(STORE_CHANNEL_CAPACITY);
        Self {
            store,
            layers: Vec::new(),
            selected: SelectionSet::new(),
            sender,
        }
    }

    /// Creates a registry restored from the durable snapshot.
    ///
    /// A missing or unreadable snapshot yields an empty collection, never
    /// an error; the condition is logged and the next mutation overwrites
    /// the bad snapshot.
    pub fn load(store: S) -> Self {
        let mut registry = Self::new(store);
        match registry.store.get(LAYERS_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<StoredRegistry>(&raw) {
                Ok(stored) => {
                    registry.layers = stored
                        .layers
                        .into_iter()
                        .map(StoredLayer::into_layer)
                        .collect();
                    registry.selected = stored.selected.into_iter().collect();
                    debug!(count = registry.layers.len(), "restored layer snapshot");
                }
                Err(error) => {
                    warn!(%error, "layer snapshot unreadable, starting empty");
                }
            },
            Ok(None) => {}
            Err(error) => {
                warn!(%error, "layer snapshot unavailable, starting empty");
            }
        }
        registry
    }

    /// Cloned view of the current layers.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Layer> {
        self.layers.clone()
    }

    /// Cloned view of the selection set.
    #[must_use]
    pub fn selection(&self) -> SelectionSet {
        self.selected.clone()
    }

    /// The layer with `filename`, if present.
    #[must_use]
    pub fn get(&self, filename: &str) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.filename == filename)
    }

    /// Number of layers held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Subscribes to change notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<RegistryChange> {
        self.sender.subscribe()
    }

    /// Appends `layer` unless its filename is already present.
    ///
    /// Returns whether the layer was added; the duplicate case is a no-op
    /// (logged), matching add-to-working-set semantics.
    pub fn add(&mut self, layer: Layer) -> Result<bool> {
        if self.get(&layer.filename).is_some() {
            debug!(filename = %layer.filename, "layer already in working set");
            return Ok(false);
        }
        let filename = layer.filename.clone();
        self.layers.push(layer);
        self.persist()?;
        self.publish(RegistryChange::Added { filename });
        Ok(true)
    }

    /// Merges fetched image and metadata into the entry for `filename`.
    ///
    /// Last writer wins per filename. An unknown filename is a no-op with
    /// a warning, not an error: the layer may have been removed while the
    /// fetch was in flight.
    pub fn update_image(
        &mut self,
        filename: &str,
        image: ImageHandle,
        metadata: FeatureCollection,
    ) -> Result<bool> {
        let Some(layer) = self
            .layers
            .iter_mut()
            .find(|layer| layer.filename == filename)
        else {
            warn!(%filename, "dropping fetched image for unknown layer");
            return Ok(false);
        };
        layer.image = Some(image);
        layer.metadata = Some(metadata);
        self.persist()?;
        self.publish(RegistryChange::ImageUpdated {
            filename: filename.to_string(),
        });
        Ok(true)
    }

    /// Adds `filename` to the selection set.
    ///
    /// Selecting an already-selected filename is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when no layer with `filename` exists.
    pub fn select(&mut self, filename: &str) -> Result<bool> {
        if self.get(filename).is_none() {
            return Err(Error::Validation(format!(
                "cannot select unknown layer: {filename}"
            )));
        }
        if !self.selected.insert(filename.to_string()) {
            return Ok(false);
        }
        self.persist()?;
        self.publish(RegistryChange::SelectionChanged {
            filename: filename.to_string(),
            selected: true,
        });
        Ok(true)
    }

    /// Removes `filename` from the selection set; absent is a no-op.
    pub fn deselect(&mut self, filename: &str) -> Result<bool> {
        if !self.selected.remove(filename) {
            return Ok(false);
        }
        self.persist()?;
        self.publish(RegistryChange::SelectionChanged {
            filename: filename.to_string(),
            selected: false,
        });
        Ok(true)
    }

    /// Writes the full snapshot through the durable store.
    fn persist(&self) -> Result<()> {
        let stored = StoredRegistry {
            layers: self.layers.iter().map(StoredLayer::from).collect(),
            selected: self.selected.iter().cloned().collect(),
        };
        let json = serde_json::to_string(&stored).map_err(|e| Error::Storage {
            operation: "serialize_layer_snapshot".to_string(),
            cause: e.to_string(),
        })?;
        self.store.set(LAYERS_KEY, &json)
    }

    fn publish(&self, change: RegistryChange) {
        // Best effort; no subscribers is fine.
        let _ = self.sender.send(change);
    }
}
