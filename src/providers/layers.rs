//! Layer payload download.
//!
//! The service publishes each finished analysis as a base64 PNG plus a
//! GeoJSON footprint; this client decodes the transport encoding and hands
//! back raster bytes with their metadata. Whether the bytes actually decode
//! as an image is the decode probe's job, not this client's.

use base64::Engine;
use serde::Deserialize;
use tracing::info;

use super::{ProviderConfig, build_http_client, check_status, request_id, transport_error};
use crate::models::{EventId, FeatureCollection, ImageHandle};
use crate::{Error, Result};

/// Wire shape of the `get-files` response.
#[derive(Debug, Deserialize)]
struct FilesResponse {
    #[serde(default)]
    png_base64: Option<String>,
    #[serde(default)]
    geojson: Option<FeatureCollection>,
}

/// A fetched analysis product: raster bytes plus georeferencing metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerPayload {
    /// Filename the product was requested under.
    pub filename: String,
    /// Decoded raster bytes.
    pub image: ImageHandle,
    /// Footprint metadata carrying the corner quad.
    pub metadata: FeatureCollection,
}

/// Client for `GET /geospatial/get-files`.
#[derive(Debug, Clone)]
pub struct LayerDataProvider {
    endpoint: String,
    client: reqwest::Client,
}

impl LayerDataProvider {
    /// Creates a provider against `config.endpoint`.
    #[must_use]
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            client: build_http_client(config),
        }
    }

    /// Downloads the image and footprint for one analysis product.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] when the response is missing `png_base64`
    /// or `geojson`, or when the base64 payload does not decode.
    pub async fn fetch_layer(&self, event_id: &EventId, filename: &str) -> Result<LayerPayload> {
        let url = format!("{}/geospatial/get-files", self.endpoint);
        info!(%url, %event_id, %filename, "fetching layer payload");

        let response = self
            .client
            .get(&url)
            .header("x-request-id", request_id())
            .query(&[("eventid", event_id.as_str()), ("filename", filename)])
            .send()
            .await
            .map_err(|e| transport_error("fetch_layer", &e))?;
        let response = check_status(response, "fetch_layer").await?;

        let body: FilesResponse = response.json().await.map_err(|e| Error::Decode {
            what: "layer payload".to_string(),
            cause: e.to_string(),
        })?;
        Self::decode_payload(filename, body)
    }

    fn decode_payload(filename: &str, body: FilesResponse) -> Result<LayerPayload> {
        let encoded = body.png_base64.ok_or_else(|| Error::Decode {
            what: "layer payload".to_string(),
            cause: "missing png_base64".to_string(),
        })?;
        let metadata = body.geojson.ok_or_else(|| Error::Decode {
            what: "layer payload".to_string(),
            cause: "missing geojson".to_string(),
        })?;

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|e| Error::Decode {
                what: "layer payload".to_string(),
                cause: format!("png_base64 is not valid base64: {e}"),
            })?;
        info!(%filename, bytes = bytes.len(), "layer payload decoded");

        Ok(LayerPayload {
            filename: filename.to_string(),
            image: ImageHandle::new(bytes),
            metadata,
        })
    }
}
