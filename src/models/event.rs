//! Seismic event types and identifiers.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::geo::GeoPoint;
use super::geojson::{Feature, Geometry};
use crate::{Error, Result};

/// Unique identifier for a seismic event, as assigned by the event provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    /// Creates a new event ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for EventId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EventId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A seismic event reported by the event data provider.
///
/// Immutable once fetched; identity is [`SeismicEvent::id`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeismicEvent {
    /// Provider-assigned identifier.
    pub id: EventId,
    /// Moment magnitude.
    pub magnitude: f64,
    /// When the event occurred.
    pub occurred_at: DateTime<Utc>,
    /// Epicenter.
    pub location: GeoPoint,
    /// Human-readable place description.
    pub description: String,
}

impl SeismicEvent {
    /// Builds an event from a provider GeoJSON feature.
    ///
    /// Expects `properties.mag` (float), `properties.time` (epoch
    /// milliseconds), `properties.place` (string, optional) and a point
    /// geometry in `[lon, lat, depth]` order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] when the feature lacks an id, usable
    /// coordinates, or a timestamp.
    pub fn from_feature(feature: &Feature) -> Result<Self> {
        let id = feature
            .id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| decode_error("feature has no id"))?;

        let location = match feature.geometry.as_ref() {
            Some(Geometry::Point { coordinates }) => GeoPoint::from_position(coordinates)
                .ok_or_else(|| decode_error("point coordinates are not [lon, lat]"))?,
            _ => return Err(decode_error("feature geometry is not a point")),
        };

        let magnitude = feature
            .properties
            .get("mag")
            .and_then(serde_json::Value::as_f64)
            .ok_or_else(|| decode_error("properties.mag missing or not a number"))?;

        let millis = feature
            .properties
            .get("time")
            .and_then(serde_json::Value::as_i64)
            .ok_or_else(|| decode_error("properties.time missing or not an integer"))?;
        let occurred_at = Utc
            .timestamp_millis_opt(millis)
            .single()
            .ok_or_else(|| decode_error("properties.time outside representable range"))?;

        let description = feature
            .properties
            .get("place")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_string();

        Ok(Self {
            id: EventId::new(id),
            magnitude,
            occurred_at,
            location,
            description,
        })
    }
}

fn decode_error(cause: &str) -> Error {
    Error::Decode {
        what: "event feature".to_string(),
        cause: cause.to_string(),
    }
}
