//! Geographic value types.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A geographic coordinate in degrees, GeoJSON axis order (longitude first).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Longitude in degrees, `[-180, 180]`.
    pub longitude: f64,
    /// Latitude in degrees, `[-90, 90]`.
    pub latitude: f64,
}

impl GeoPoint {
    /// Creates a new point from longitude and latitude in degrees.
    #[must_use]
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Creates a point from a GeoJSON position (`[lon, lat, ...]`).
    ///
    /// Trailing members (elevation, depth) are ignored.
    #[must_use]
    pub fn from_position(position: &[f64]) -> Option<Self> {
        match position {
            [longitude, latitude, ..] => Some(Self::new(*longitude, *latitude)),
            _ => None,
        }
    }

    /// Checks that both components fall inside valid degree ranges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when the longitude is outside
    /// `[-180, 180]` or the latitude is outside `[-90, 90]`.
    pub fn validate(&self) -> Result<()> {
        if !(-180.0..=180.0).contains(&self.longitude) || !self.longitude.is_finite() {
            return Err(Error::Validation(format!(
                "longitude {} outside [-180, 180]",
                self.longitude
            )));
        }
        if !(-90.0..=90.0).contains(&self.latitude) || !self.latitude.is_finite() {
            return Err(Error::Validation(format!(
                "latitude {} outside [-90, 90]",
                self.latitude
            )));
        }
        Ok(())
    }

    /// Returns the point as a `[longitude, latitude]` pair for render APIs.
    #[must_use]
    pub const fn as_lon_lat(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

/// A latitude/longitude bounding box for a monitored region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    /// Southern edge latitude.
    pub min_latitude: f64,
    /// Northern edge latitude.
    pub max_latitude: f64,
    /// Western edge longitude.
    pub min_longitude: f64,
    /// Eastern edge longitude.
    pub max_longitude: f64,
}

impl GeoBounds {
    /// Creates a bounding box from edge coordinates.
    #[must_use]
    pub const fn new(
        min_latitude: f64,
        max_latitude: f64,
        min_longitude: f64,
        max_longitude: f64,
    ) -> Self {
        Self {
            min_latitude,
            max_latitude,
            min_longitude,
            max_longitude,
        }
    }

    /// Renders the provider query form: `minlat,maxlat,minlon,maxlon`.
    #[must_use]
    pub fn coordinates_query(&self) -> String {
        format!(
            "{},{},{},{}",
            self.min_latitude, self.max_latitude, self.min_longitude, self.max_longitude
        )
    }
}

/// The four geographic corner points that georeference a raster image.
///
/// Stored in the metadata order `[lower_left, upper_left, upper_right,
/// lower_right]`. Render APIs expect a rotated order; see
/// [`CornerQuad::registration_order`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CornerQuad {
    corners: [GeoPoint; 4],
}

impl CornerQuad {
    /// Builds a quad from the first four positions of a polygon ring.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when the ring holds fewer than four
    /// positions or a position is not a `[lon, lat, ...]` pair.
    pub fn from_ring(ring: &[Vec<f64>]) -> Result<Self> {
        if ring.len() < 4 {
            return Err(Error::Validation(format!(
                "corner ring has {} positions, need 4",
                ring.len()
            )));
        }
        let mut corners = [GeoPoint::new(0.0, 0.0); 4];
        for (slot, position) in corners.iter_mut().zip(ring.iter()) {
            *slot = GeoPoint::from_position(position).ok_or_else(|| {
                Error::Validation("corner position is not a [lon, lat] pair".to_string())
            })?;
        }
        Ok(Self { corners })
    }

    /// The lower-left corner.
    #[must_use]
    pub const fn lower_left(&self) -> GeoPoint {
        self.corners[0]
    }

    /// The upper-left corner.
    #[must_use]
    pub const fn upper_left(&self) -> GeoPoint {
        self.corners[1]
    }

    /// The upper-right corner.
    #[must_use]
    pub const fn upper_right(&self) -> GeoPoint {
        self.corners[2]
    }

    /// The lower-right corner.
    #[must_use]
    pub const fn lower_right(&self) -> GeoPoint {
        self.corners[3]
    }

    /// Corner pairs in the order the render API binds them:
    /// `[lower_left, lower_right, upper_right, upper_left]`.
    ///
    /// This is a rotation of the stored order, required by the image-source
    /// corner-to-render mapping.
    #[must_use]
    pub const fn registration_order(&self) -> [[f64; 2]; 4] {
        [
            self.corners[0].as_lon_lat(),
            self.corners[3].as_lon_lat(),
            self.corners[2].as_lon_lat(),
            self.corners[1].as_lon_lat(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_validate_ranges() {
        assert!(GeoPoint::new(37.8, 34.5).validate().is_ok());
        assert!(GeoPoint::new(-180.0, 90.0).validate().is_ok());
        assert!(GeoPoint::new(181.0, 0.0).validate().is_err());
        assert!(GeoPoint::new(0.0, -90.5).validate().is_err());
        assert!(GeoPoint::new(f64::NAN, 0.0).validate().is_err());
    }

    #[test]
    fn test_point_from_position_ignores_depth() {
        let p = GeoPoint::from_position(&[85.2, 28.1, 10.0]);
        assert_eq!(p, Some(GeoPoint::new(85.2, 28.1)));
        assert_eq!(GeoPoint::from_position(&[85.2]), None);
    }

    #[test]
    fn test_bounds_query_order() {
        let bounds = GeoBounds::new(26.3, 30.4, 80.0, 88.2);
        assert_eq!(bounds.coordinates_query(), "26.3,30.4,80,88.2");
    }

    #[test]
    fn test_quad_takes_first_four() {
        // Closed ring: fifth position repeats the first and is ignored.
        let ring = vec![
            vec![1.0, 1.0],
            vec![1.0, 2.0],
            vec![2.0, 2.0],
            vec![2.0, 1.0],
            vec![1.0, 1.0],
        ];
        let quad = CornerQuad::from_ring(&ring).unwrap();
        assert_eq!(quad.lower_left(), GeoPoint::new(1.0, 1.0));
        assert_eq!(quad.upper_left(), GeoPoint::new(1.0, 2.0));
        assert_eq!(quad.upper_right(), GeoPoint::new(2.0, 2.0));
        assert_eq!(quad.lower_right(), GeoPoint::new(2.0, 1.0));
    }

    #[test]
    fn test_quad_rejects_short_ring() {
        let ring = vec![vec![1.0, 1.0], vec![1.0, 2.0], vec![2.0, 2.0]];
        assert!(CornerQuad::from_ring(&ring).is_err());
    }

    #[test]
    fn test_registration_order_is_rotation() {
        let ring = vec![
            vec![1.0, 1.0],
            vec![1.0, 2.0],
            vec![2.0, 2.0],
            vec![2.0, 1.0],
        ];
        let quad = CornerQuad::from_ring(&ring).unwrap();
        assert_eq!(
            quad.registration_order(),
            [[1.0, 1.0], [2.0, 1.0], [2.0, 2.0], [1.0, 2.0]]
        );
    }
}
