//! Benchmarks for the proximity filter hot path.
//!
//! The filter runs on every event refresh over the full provider result,
//! so both the single-distance cost and the whole-collection scan matter.

// Criterion macros generate items without docs - this is expected for benchmarks
#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

use chrono::{TimeZone, Utc};
use quakelens::models::{EventId, GeoPoint, SeismicEvent};
use quakelens::{filter_nearby, haversine_km};

/// Nepal region center from the built-in catalog.
const REFERENCE: GeoPoint = GeoPoint::new(85.2, 28.1);

/// Deterministic synthetic events scattered over the globe.
fn synthetic_events(count: usize) -> Vec<SeismicEvent> {
    (0..count)
        .map(|i| {
            let spread = i as f64;
            SeismicEvent {
                id: EventId::new(format!("ev{i}")),
                magnitude: 5.0 + (spread % 40.0) / 10.0,
                occurred_at: Utc.timestamp_opt(1_700_000_000 + i as i64, 0).unwrap(),
                location: GeoPoint::new(
                    (spread * 37.0).rem_euclid(360.0) - 180.0,
                    (spread * 13.0).rem_euclid(180.0) - 90.0,
                ),
                description: String::new(),
            }
        })
        .collect()
}

fn bench_haversine(c: &mut Criterion) {
    let near = GeoPoint::new(85.3, 27.7);
    let far = GeoPoint::new(-119.0, 37.0);

    let mut group = c.benchmark_group("haversine");
    group.bench_function("near_pair", |b| {
        b.iter(|| haversine_km(black_box(REFERENCE), black_box(near)));
    });
    group.bench_function("far_pair", |b| {
        b.iter(|| haversine_km(black_box(REFERENCE), black_box(far)));
    });
    group.finish();
}

fn bench_filter_nearby(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_nearby");

    for count in [100usize, 1_000, 10_000] {
        let events = synthetic_events(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &events, |b, events| {
            b.iter(|| filter_nearby(black_box(REFERENCE), black_box(events), black_box(900.0)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_haversine, bench_filter_nearby);
criterion_main!(benches);
