//! End-to-end cycle tests: fixes in, scored snapshots out.

use anyhow::Result;
use chrono::{Duration, Utc};
use clearway_core::{PositionFix, SamplePoint, SearchRules};
use clearway_elevation::{ElevationProvider, ElevationResult};
use clearway_engine::ClearanceEngine;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Answers every point with a fixed terrain elevation.
struct FlatTerrain {
    calls: Arc<AtomicUsize>,
    elevation_m: f64,
}

impl ElevationProvider for FlatTerrain {
    async fn lookup(&self, locations: &[SamplePoint]) -> Result<Vec<ElevationResult>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(locations
            .iter()
            .map(|p| ElevationResult {
                latitude: p.lat,
                longitude: p.lon,
                elevation: self.elevation_m,
            })
            .collect())
    }
}

fn engine_over_flat_terrain(
    elevation_m: f64,
) -> (ClearanceEngine<FlatTerrain>, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let provider = FlatTerrain {
        calls: Arc::clone(&calls),
        elevation_m,
    };
    // Coarser grid keeps the sample set small for tests.
    let rules = SearchRules {
        grid_precision: 3,
        ..SearchRules::default()
    };
    (ClearanceEngine::new(provider, rules), calls)
}

fn eastbound_fix(step: i64, altitude_m: f64) -> PositionFix {
    let start = Utc::now();
    PositionFix::new(
        37.0,
        -122.0 + step as f64 * 0.001,
        start + Duration::seconds(3 * step),
    )
    .with_motion(altitude_m, 15.0)
}

#[tokio::test]
async fn second_cycle_scores_points_resolved_by_the_first() {
    let (mut engine, calls) = engine_over_flat_terrain(10.0);

    assert!(engine.on_position(eastbound_fix(0, 500.0)).is_none());

    let first = engine.on_position(eastbound_fix(1, 500.0)).unwrap();
    assert!(first.snapshot.points.is_empty());
    assert!(!first.unresolved.is_empty());

    // Await the resolve pass the runtime would normally spawn.
    let merged = engine.resolver().resolve(first.unresolved).await.unwrap();
    assert!(merged > 0);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let second = engine.on_position(eastbound_fix(2, 500.0)).unwrap();
    assert!(!second.snapshot.points.is_empty());
    // Level flight 490m above flat terrain: everything clears the margin.
    assert!(second.snapshot.points.iter().all(|p| p.weight == 1.0));

    // The cone moved ~111m east, so most cells are already cached.
    let moved = engine.resolver().resolve(second.unresolved).await.unwrap();
    assert!(moved < merged);
}

#[tokio::test]
async fn high_terrain_scores_unreachable() {
    let (mut engine, _calls) = engine_over_flat_terrain(450.0);

    engine.on_position(eastbound_fix(0, 500.0));
    let cycle = engine.on_position(eastbound_fix(1, 500.0)).unwrap();
    engine.resolver().resolve(cycle.unresolved).await.unwrap();

    // 500m observer over 450m terrain leaves only 50m of clearance.
    let cycle = engine.on_position(eastbound_fix(2, 500.0)).unwrap();
    assert!(!cycle.snapshot.points.is_empty());
    assert!(cycle.snapshot.points.iter().all(|p| p.weight == 0.0));
}

#[tokio::test]
async fn direction_segment_points_along_heading() {
    let (mut engine, _calls) = engine_over_flat_terrain(0.0);

    engine.on_position(eastbound_fix(0, 500.0));
    let cycle = engine.on_position(eastbound_fix(1, 500.0)).unwrap();

    let segment = cycle.snapshot.segment;
    assert!((segment.start_lat - 37.0).abs() < 1e-9);
    // Heading east: endpoint shifts in longitude, stays on the parallel.
    assert!(segment.end_lon > segment.start_lon);
    assert!((segment.end_lat - segment.start_lat).abs() < 1e-5);

    // 0.1km ahead ~ 0.00113 deg of longitude at 37N.
    let d_lon = segment.end_lon - segment.start_lon;
    assert!((d_lon - 0.00113).abs() < 2e-4, "got {d_lon}");
}

#[tokio::test]
async fn pressure_samples_feed_the_barometric_altitude() {
    let (mut engine, _calls) = engine_over_flat_terrain(0.0);
    assert!(engine.pressure_altitude().is_none());

    engine.on_pressure(clearway_core::PressureSample {
        pressure_hpa: 950.0,
        relative_altitude_m: 12.0,
    });
    let altitude = engine.pressure_altitude().unwrap();
    assert!(altitude > 500.0 && altitude < 600.0, "got {altitude}");
}

#[tokio::test]
async fn invalid_fix_produces_no_cycle() {
    let (mut engine, calls) = engine_over_flat_terrain(0.0);

    engine.on_position(eastbound_fix(0, 500.0));
    engine.on_position(eastbound_fix(1, 500.0));

    let mut bad = eastbound_fix(2, 500.0);
    bad.lat = f64::NAN;
    assert!(engine.on_position(bad).is_none());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}
