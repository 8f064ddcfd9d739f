//! Minimal GeoJSON types.
//!
//! Only the shapes the providers actually emit are modeled: point features
//! for seismic events and polygon features for raster footprints. Unknown
//! geometry kinds fail deserialization, which callers downgrade to a
//! skipped item.

use serde::{Deserialize, Serialize};

/// A GeoJSON feature collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    /// The contained features.
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// Returns the outer ring of the first polygon feature, if present.
    ///
    /// Raster footprint metadata carries its corner coordinates in
    /// `features[0].geometry.coordinates[0]`.
    #[must_use]
    pub fn first_polygon_ring(&self) -> Option<&[Vec<f64>]> {
        match self.features.first()?.geometry.as_ref()? {
            Geometry::Polygon { coordinates } => coordinates.first().map(Vec::as_slice),
            Geometry::Point { .. } => None,
        }
    }
}

/// A GeoJSON feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Feature identifier, when the provider assigns one.
    #[serde(default)]
    pub id: Option<String>,
    /// Geometry, absent for null-geometry features.
    #[serde(default)]
    pub geometry: Option<Geometry>,
    /// Free-form properties bag.
    #[serde(default)]
    pub properties: serde_json::Value,
}

/// A GeoJSON geometry, tagged by its `type` member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    /// A single position: `[lon, lat, depth?]`.
    Point {
        /// The position.
        coordinates: Vec<f64>,
    },
    /// A polygon: rings of positions, outer ring first.
    Polygon {
        /// The rings.
        coordinates: Vec<Vec<Vec<f64>>>,
    },
}
