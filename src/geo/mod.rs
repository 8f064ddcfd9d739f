//! Great-circle geometry and proximity filtering.
//!
//! Distances use the haversine formula on a spherical Earth model, which is
//! accurate to roughly 0.5% and more than enough for a coarse "is this event
//! near the region center" cut.

use crate::models::{GeoPoint, SeismicEvent};

/// Mean Earth radius in kilometers for the spherical model.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points, in kilometers.
#[must_use]
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Keeps the events within `radius_km` of `reference`, preserving input
/// order.
///
/// The radius test is inclusive, so an event exactly on the boundary is
/// kept and a zero radius keeps events at the reference point itself. A
/// negative radius matches nothing and returns an empty list.
#[must_use]
pub fn filter_nearby(
    reference: GeoPoint,
    events: &[SeismicEvent],
    radius_km: f64,
) -> Vec<SeismicEvent> {
    if radius_km < 0.0 {
        return Vec::new();
    }
    events
        .iter()
        .filter(|event| haversine_km(reference, event.location) <= radius_km)
        .cloned()
        .collect()
}
