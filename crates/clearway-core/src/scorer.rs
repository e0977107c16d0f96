//! Reachability scoring against the altitude-decay model.

use crate::models::{PositionFix, SamplePoint, ScoredPoint};
use crate::rules::{SearchRules, ZeroSpeedPolicy};

/// Planar distance in kilometers via the equirectangular approximation.
///
/// 111 km per degree, longitude scaled by the cosine of the mean latitude.
/// Good enough over the ~1km search radius.
pub fn planar_distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let mean_lat_rad = ((lat1 + lat2) / 2.0).to_radians();
    let d_lat = (lat2 - lat1) * 111.0;
    let d_lon = (lon2 - lon1) * 111.0 * mean_lat_rad.cos();
    (d_lat * d_lat + d_lon * d_lon).sqrt()
}

/// Observer altitude projected along the path to a point `distance_km` away.
///
/// Linear decay model: the observer keeps the current ground speed and
/// climb/sink rate for the whole leg.
fn project_altitude_m(
    current_altitude_m: f64,
    distance_km: f64,
    speed_mps: f64,
    vertical_speed_mps: f64,
) -> f64 {
    let time_s = distance_km * 1000.0 / speed_mps;
    current_altitude_m - time_s * vertical_speed_mps
}

/// Score each sample point against its terrain elevation.
///
/// `samples` carries only points whose elevation is already resolved;
/// unresolved points are excluded from the cycle upstream. Output is
/// deterministic for fixed inputs and never contains a non-finite weight:
/// when the projection is degenerate (zero or missing ground speed, missing
/// current altitude) the configured `ZeroSpeedPolicy` decides between an
/// explicit weight of 0 and omitting the point.
pub fn score_points(
    current: &PositionFix,
    vertical_speed_mps: f64,
    samples: &[(SamplePoint, f64)],
    rules: &SearchRules,
) -> Vec<ScoredPoint> {
    let speed = current.speed_mps.filter(|s| s.is_finite() && *s > 0.0);
    let altitude = current.altitude_m.filter(|a| a.is_finite());

    let mut scored = Vec::with_capacity(samples.len());
    for (point, elevation_m) in samples {
        let weight = match (speed, altitude) {
            (Some(speed_mps), Some(altitude_m)) => {
                let distance_km = planar_distance_km(current.lat, current.lon, point.lat, point.lon);
                let projected =
                    project_altitude_m(altitude_m, distance_km, speed_mps, vertical_speed_mps);
                if projected.is_finite() && projected - elevation_m >= rules.clearance_margin_m {
                    1.0
                } else {
                    0.0
                }
            }
            _ => match rules.zero_speed_policy {
                ZeroSpeedPolicy::Unreachable => 0.0,
                ZeroSpeedPolicy::Skip => continue,
            },
        };
        scored.push(ScoredPoint {
            lat: point.lat,
            lon: point.lon,
            weight,
        });
    }
    scored
}
