//! On-demand layer payload sync.

use tracing::{debug, warn};

use crate::config::QuakelensConfig;
use crate::providers::{LayerDataProvider, ProviderConfig};
use crate::state::LayerRegistry;
use crate::storage::DurableStore;
use crate::{Error, Result};

/// Fetches raster payloads for working-set layers that lack them.
///
/// A layer enters the working set without image bytes; the sync fills them
/// in when the layer is first needed. Fetches that fail leave the entry
/// pending so a later attempt can retry.
#[derive(Debug)]
pub struct LayerSync {
    provider: LayerDataProvider,
}

impl LayerSync {
    /// Creates a sync from the configuration.
    #[must_use]
    pub fn new(config: &QuakelensConfig) -> Self {
        Self {
            provider: LayerDataProvider::new(&ProviderConfig::new(&config.endpoint)),
        }
    }

    /// Ensures the layer with `filename` carries its image and footprint.
    ///
    /// Returns whether a fetch populated the entry. An already-populated
    /// layer is never re-fetched. Transport and decode failures downgrade
    /// to `Ok(false)` with a warning; the entry stays pending.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when no layer with `filename` exists.
    pub async fn ensure_fetched<S: DurableStore>(
        &self,
        registry: &mut LayerRegistry<S>,
        filename: &str,
    ) -> Result<bool> {
        let Some(layer) = registry.get(filename) else {
            return Err(Error::Validation(format!(
                "cannot sync unknown layer: {filename}"
            )));
        };
        if layer.is_populated() {
            debug!(%filename, "layer already populated, skipping fetch");
            return Ok(false);
        }

        let event_id = layer.event_id.clone();
        let payload = match self.provider.fetch_layer(&event_id, filename).await {
            Ok(payload) => payload,
            Err(error) => {
                // Downgrade: the entry stays pending for a later retry.
                warn!(%filename, %error, "layer fetch failed, entry stays pending");
                return Ok(false);
            }
        };
        registry.update_image(filename, payload.image, payload.metadata)
    }

    /// Ensures every selected layer is populated.
    ///
    /// Returns the number of layers a fetch populated. Individual failures
    /// are downgraded per [`Self::ensure_fetched`].
    pub async fn sync_selected<S: DurableStore>(
        &self,
        registry: &mut LayerRegistry<S>,
    ) -> Result<usize> {
        let mut fetched = 0;
        for filename in registry.selection() {
            if self.ensure_fetched(registry, &filename).await? {
                fetched += 1;
            }
        }
        Ok(fetched)
    }
}
