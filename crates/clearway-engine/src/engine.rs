//! Per-cycle orchestration: history, bearing, geometry, scoring.

use crate::resolver::ElevationResolver;
use crate::store::ElevationStore;
use chrono::Utc;
use clearway_core::{
    destination_point, pressure_altitude_m, score_points, BearingTracker, ClearanceSnapshot,
    DirectionSegment, PositionFix, PositionHistory, PressureSample, SamplePoint, SearchCone,
    SearchRules,
};
use clearway_elevation::ElevationProvider;
use std::sync::Arc;

/// Result of one position-update cycle.
pub struct CycleOutput {
    /// Renderer snapshot for this cycle. Samples without a cached elevation
    /// are excluded; they appear in later cycles once resolved.
    pub snapshot: ClearanceSnapshot,
    /// Sample points still needing an elevation lookup. Hand these to a
    /// spawned `ElevationResolver::resolve` pass.
    pub unresolved: Vec<SamplePoint>,
}

/// Owns the mutable engine state: position history, current bearing, and
/// the elevation store. Collaborators feed it fixes and pressure samples;
/// it produces read-only snapshots.
pub struct ClearanceEngine<P> {
    rules: SearchRules,
    history: PositionHistory,
    bearing: BearingTracker,
    resolver: ElevationResolver<P>,
    last_pressure: Option<PressureSample>,
}

impl<P: ElevationProvider> ClearanceEngine<P> {
    pub fn new(provider: P, rules: SearchRules) -> Self {
        let store = ElevationStore::new(rules.grid_precision);
        Self {
            bearing: BearingTracker::new(rules.zero_bearing_is_invalid),
            history: PositionHistory::new(),
            resolver: ElevationResolver::new(Arc::new(provider), store),
            last_pressure: None,
            rules,
        }
    }

    pub fn rules(&self) -> &SearchRules {
        &self.rules
    }

    pub fn store(&self) -> &ElevationStore {
        self.resolver.store()
    }

    /// Cloneable handle for spawning resolve passes.
    pub fn resolver(&self) -> ElevationResolver<P> {
        self.resolver.clone()
    }

    /// Record a barometer reading. Display-only.
    pub fn on_pressure(&mut self, sample: PressureSample) {
        self.last_pressure = Some(sample);
    }

    /// Barometric altitude from the most recent pressure sample.
    pub fn pressure_altitude(&self) -> Option<f64> {
        self.last_pressure
            .map(|sample| pressure_altitude_m(sample.pressure_hpa))
    }

    /// Run one position-update cycle: record the fix, re-estimate the
    /// bearing, rebuild the search cone, and score whatever the cache
    /// already covers.
    ///
    /// Returns `None` while no usable heading exists (fewer than two fixes,
    /// or an invalid fix that was dropped).
    pub fn on_position(&mut self, fix: PositionFix) -> Option<CycleOutput> {
        if !fix.is_valid() {
            tracing::debug!("Dropping fix with unusable coordinates");
            return None;
        }
        self.history.record(fix);

        let bearing_deg = self.bearing.update(&self.history)?;
        let current = self.history.latest()?.clone();

        let cone = SearchCone {
            apex_lat: current.lat,
            apex_lon: current.lon,
            bearing_deg,
            half_angle_deg: self.rules.half_angle_deg,
            radius_m: self.rules.search_radius_m,
        };
        let samples = cone.sample_points(self.rules.grid_precision);
        let (resolved, unresolved) = self.store().partition(&samples);

        let vertical_speed = self.history.vertical_speed_mps();
        let points = score_points(&current, vertical_speed, &resolved, &self.rules);

        let (end_lat, end_lon) = destination_point(
            current.lat,
            current.lon,
            bearing_deg,
            self.rules.heading_segment_km,
        );

        tracing::debug!(
            bearing_deg,
            samples = samples.len(),
            scored = points.len(),
            unresolved = unresolved.len(),
            "position cycle"
        );

        Some(CycleOutput {
            snapshot: ClearanceSnapshot {
                heading_deg: bearing_deg,
                segment: DirectionSegment {
                    start_lat: current.lat,
                    start_lon: current.lon,
                    end_lat,
                    end_lon,
                },
                points,
                generated_at: Utc::now(),
            },
            unresolved,
        })
    }
}
