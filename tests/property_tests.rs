//! Property-based tests for the geometry and naming invariants.
//!
//! Uses proptest to verify invariants across random inputs:
//! - Haversine distance is a pseudometric (identity, symmetry, bounds)
//! - Proximity filtering returns an order-preserving subset
//! - Growing the radius never loses events
//! - Corner registration order is a rotation of the stored corners
//! - Analysis filenames round-trip through the naming convention

// Property tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use chrono::{TimeZone, Utc};
use proptest::prelude::*;

use quakelens::models::{
    AnalysisKind, CornerQuad, EventId, GeoPoint, SeismicEvent, build_filename, parse_filename,
};
use quakelens::geo::EARTH_RADIUS_KM;
use quakelens::{filter_nearby, haversine_km};

fn arb_point() -> impl Strategy<Value = GeoPoint> {
    (-180.0f64..=180.0, -90.0f64..=90.0).prop_map(|(lon, lat)| GeoPoint::new(lon, lat))
}

fn arb_events() -> impl Strategy<Value = Vec<SeismicEvent>> {
    prop::collection::vec((-180.0f64..=180.0, -90.0f64..=90.0), 0..32).prop_map(|positions| {
        positions
            .into_iter()
            .enumerate()
            .map(|(i, (lon, lat))| SeismicEvent {
                id: EventId::new(format!("ev{i}")),
                magnitude: 5.5,
                occurred_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
                location: GeoPoint::new(lon, lat),
                description: String::new(),
            })
            .collect()
    })
}

proptest! {
    /// Property: the distance from a point to itself is zero.
    #[test]
    fn prop_haversine_identity(p in arb_point()) {
        prop_assert!(haversine_km(p, p).abs() < 1e-6);
    }

    /// Property: distance is symmetric in its arguments.
    #[test]
    fn prop_haversine_symmetry(a in arb_point(), b in arb_point()) {
        let forward = haversine_km(a, b);
        let backward = haversine_km(b, a);
        prop_assert!((forward - backward).abs() < 1e-6);
    }

    /// Property: distances are non-negative and never exceed half the
    /// circumference of the sphere.
    #[test]
    fn prop_haversine_bounds(a in arb_point(), b in arb_point()) {
        let d = haversine_km(a, b);
        prop_assert!(d >= 0.0);
        prop_assert!(d <= std::f64::consts::PI * EARTH_RADIUS_KM + 1e-6);
    }

    /// Property: the filter keeps a subset of the input in input order.
    #[test]
    fn prop_filter_is_order_preserving_subset(
        reference in arb_point(),
        events in arb_events(),
        radius in 0.0f64..25_000.0,
    ) {
        let kept = filter_nearby(reference, &events, radius);
        prop_assert!(kept.len() <= events.len());

        // Every kept event appears in the input, and kept order matches
        // the input's relative order.
        let input_ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        let mut cursor = 0;
        for event in &kept {
            let position = input_ids[cursor..]
                .iter()
                .position(|id| *id == event.id.as_str());
            prop_assert!(position.is_some());
            cursor += position.unwrap() + 1;
        }
    }

    /// Property: every kept event is actually inside the radius, and every
    /// dropped event is outside it.
    #[test]
    fn prop_filter_partitions_by_distance(
        reference in arb_point(),
        events in arb_events(),
        radius in 0.0f64..25_000.0,
    ) {
        let kept = filter_nearby(reference, &events, radius);
        let kept_ids: Vec<&str> = kept.iter().map(|e| e.id.as_str()).collect();
        for event in &events {
            let inside = haversine_km(reference, event.location) <= radius;
            prop_assert_eq!(inside, kept_ids.contains(&event.id.as_str()));
        }
    }

    /// Property: growing the radius never loses events.
    #[test]
    fn prop_filter_is_monotone_in_radius(
        reference in arb_point(),
        events in arb_events(),
        radius in 0.0f64..12_000.0,
        extra in 0.0f64..12_000.0,
    ) {
        let narrow = filter_nearby(reference, &events, radius);
        let wide = filter_nearby(reference, &events, radius + extra);
        let wide_ids: Vec<&str> = wide.iter().map(|e| e.id.as_str()).collect();
        for event in &narrow {
            prop_assert!(wide_ids.contains(&event.id.as_str()));
        }
    }

    /// Property: the registration order is a rotation of the stored
    /// corners, anchored at the lower-left.
    #[test]
    fn prop_registration_order_is_rotation(
        ring in prop::collection::vec((-180.0f64..=180.0, -90.0f64..=90.0), 4..6),
    ) {
        let ring: Vec<Vec<f64>> = ring.into_iter().map(|(lon, lat)| vec![lon, lat]).collect();
        let quad = CornerQuad::from_ring(&ring).unwrap();
        let order = quad.registration_order();
        prop_assert_eq!(order[0], quad.lower_left().as_lon_lat());
        prop_assert_eq!(order[1], quad.lower_right().as_lon_lat());
        prop_assert_eq!(order[2], quad.upper_right().as_lon_lat());
        prop_assert_eq!(order[3], quad.upper_left().as_lon_lat());
    }

    /// Property: filenames built by the convention parse back to the same
    /// event id and analysis kind, even when the id itself has hyphens.
    #[test]
    fn prop_filename_round_trips(
        id in "[a-z0-9]{2,8}(-[a-z0-9]{1,6}){0,2}",
        intf in any::<bool>(),
    ) {
        let kind = if intf {
            AnalysisKind::Interferogram
        } else {
            AnalysisKind::ChangeDetection
        };
        let event_id = EventId::new(&id);
        let filename = build_filename(&event_id, kind);
        let parts = parse_filename(&filename).unwrap();
        prop_assert_eq!(parts.event_id.as_str(), id.as_str());
        prop_assert_eq!(parts.event_kind, "earthquake");
        prop_assert_eq!(parts.analysis, Some(kind));
    }

    /// Property: `EventId` preserves its input string exactly.
    #[test]
    fn prop_event_id_preserves_string(s in "[a-zA-Z0-9_-]{1,64}") {
        let id = EventId::new(&s);
        prop_assert_eq!(id.as_str(), s.as_str());
        prop_assert_eq!(id.to_string(), s);
    }
}
