//! Core data models for the clearance engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single timestamped position reading from the location collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionFix {
    pub lat: f64,
    pub lon: f64,
    /// Altitude above mean sea level; not every provider fix carries one.
    #[serde(default)]
    pub altitude_m: Option<f64>,
    /// Ground speed reported by the provider.
    #[serde(default)]
    pub speed_mps: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl PositionFix {
    /// Create a fix with only the required fields.
    pub fn new(lat: f64, lon: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            lat,
            lon,
            altitude_m: None,
            speed_mps: None,
            timestamp,
        }
    }

    /// Set altitude and ground speed.
    pub fn with_motion(mut self, altitude_m: f64, speed_mps: f64) -> Self {
        self.altitude_m = Some(altitude_m);
        self.speed_mps = Some(speed_mps);
        self
    }

    /// A fix is usable when both coordinates are finite and in range.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// A grid-rounded sample point inside the search cone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    pub lat: f64,
    pub lon: f64,
}

/// A sample point with its clearance weight.
///
/// Weight is 1.0 when the observer's projected altitude stays the safety
/// margin above terrain at this point, 0.0 otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredPoint {
    pub lat: f64,
    pub lon: f64,
    pub weight: f64,
}

/// Two-point polyline from the observer toward the current heading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionSegment {
    pub start_lat: f64,
    pub start_lon: f64,
    pub end_lat: f64,
    pub end_lon: f64,
}

/// Barometer reading from the pressure collaborator. Display-only; the
/// scoring core does not depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PressureSample {
    pub pressure_hpa: f64,
    pub relative_altitude_m: f64,
}

/// Pressure altitude from the international barometric formula.
pub fn pressure_altitude_m(pressure_hpa: f64) -> f64 {
    44_330.0 * (1.0 - (pressure_hpa / 1013.25).powf(1.0 / 5.255))
}

/// Renderer-facing output of one position cycle. Pure snapshot; the
/// renderer owns nothing upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearanceSnapshot {
    pub heading_deg: f64,
    pub segment: DirectionSegment,
    pub points: Vec<ScoredPoint>,
    pub generated_at: DateTime<Utc>,
}
