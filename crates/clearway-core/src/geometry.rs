//! Search-cone construction and sample-grid generation.

use crate::models::SamplePoint;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Round a coordinate to the grid precision (decimal places).
pub fn round_coord(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (value * factor).round() / factor
}

/// Integer-scaled rounded coordinate pair.
///
/// Serves as both the sample dedup key and the elevation cache key, so a
/// cached elevation is found again for any raw point that rounds onto the
/// same grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridKey {
    lat_scaled: i64,
    lon_scaled: i64,
}

impl GridKey {
    pub fn from_deg(lat: f64, lon: f64, precision: u32) -> Self {
        let factor = 10f64.powi(precision as i32);
        Self {
            lat_scaled: (lat * factor).round() as i64,
            lon_scaled: (lon * factor).round() as i64,
        }
    }

    pub fn to_point(self, precision: u32) -> SamplePoint {
        let factor = 10f64.powi(precision as i32);
        SamplePoint {
            lat: self.lat_scaled as f64 / factor,
            lon: self.lon_scaled as f64 / factor,
        }
    }
}

/// Ray angles of the cone edges, symmetric about the bearing.
pub fn cone_rays(bearing_deg: f64, half_angle_deg: f64) -> (f64, f64) {
    (bearing_deg + half_angle_deg, bearing_deg - half_angle_deg)
}

/// Length of each cone edge so the far edge sits `radius` out along the
/// bisector.
pub fn edge_length_km(radius_m: f64, half_angle_deg: f64) -> f64 {
    radius_m / half_angle_deg.to_radians().cos() / 1000.0
}

/// Destination point along a bearing on a spherical Earth.
pub fn destination_point(lat: f64, lon: f64, bearing_deg: f64, distance_km: f64) -> (f64, f64) {
    let bearing_rad = bearing_deg.to_radians();
    let lat1 = lat.to_radians();
    let lon1 = lon.to_radians();
    let angular = distance_km / EARTH_RADIUS_KM;

    let lat2 = (lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * bearing_rad.cos()).asin();
    let lon2 = lon1
        + (bearing_rad.sin() * angular.sin() * lat1.cos())
            .atan2(angular.cos() - lat1.sin() * lat2.sin());

    (lat2.to_degrees(), lon2.to_degrees())
}

/// Linear lat/lon interpolation, inclusive of both endpoints.
///
/// Not geodesic-correct, but fine at the ~1km scale the cone covers.
fn interpolate(start: (f64, f64), end: (f64, f64), steps: usize) -> Vec<(f64, f64)> {
    let mut points = Vec::with_capacity(steps + 1);
    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        points.push((
            start.0 + (end.0 - start.0) * t,
            start.1 + (end.1 - start.1) * t,
        ));
    }
    points
}

/// Forward-facing triangular search area, apex at the latest fix.
#[derive(Debug, Clone, Copy)]
pub struct SearchCone {
    pub apex_lat: f64,
    pub apex_lon: f64,
    pub bearing_deg: f64,
    pub half_angle_deg: f64,
    pub radius_m: f64,
}

impl SearchCone {
    pub fn edge_length_km(&self) -> f64 {
        edge_length_km(self.radius_m, self.half_angle_deg)
    }

    /// Endpoints of the two cone edges at full edge length.
    pub fn far_edge_endpoints(&self) -> ((f64, f64), (f64, f64)) {
        let (angle_a, angle_b) = cone_rays(self.bearing_deg, self.half_angle_deg);
        let len_km = self.edge_length_km();
        (
            destination_point(self.apex_lat, self.apex_lon, angle_a, len_km),
            destination_point(self.apex_lat, self.apex_lon, angle_b, len_km),
        )
    }

    /// Interpolation steps per edge, tied to the rounding precision so the
    /// raw fan is about as dense as the dedup grid.
    pub fn steps(&self, precision: u32) -> usize {
        let cell_m = 111_000.0 * 10f64.powi(-(precision as i32));
        (self.radius_m / cell_m).floor() as usize
    }

    /// Deduplicated sample grid filling the cone.
    ///
    /// Both edges are interpolated from the apex outward, then each pair of
    /// corresponding edge points is interpolated crosswise, producing a
    /// triangular fan. Every raw point is rounded onto the grid and
    /// deduplicated through its `GridKey`; the ordered set keeps the output
    /// deterministic and bounds later cache growth.
    pub fn sample_points(&self, precision: u32) -> Vec<SamplePoint> {
        let steps = self.steps(precision).max(1);
        let apex = (self.apex_lat, self.apex_lon);
        let (end_a, end_b) = self.far_edge_endpoints();

        let edge_a = interpolate(apex, end_a, steps);
        let edge_b = interpolate(apex, end_b, steps);

        let mut keys = BTreeSet::new();
        for (a, b) in edge_a.iter().zip(edge_b.iter()) {
            for (lat, lon) in interpolate(*a, *b, steps) {
                keys.insert(GridKey::from_deg(lat, lon, precision));
            }
        }

        keys.into_iter().map(|key| key.to_point(precision)).collect()
    }
}
