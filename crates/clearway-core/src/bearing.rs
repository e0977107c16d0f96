//! Heading estimation from recent position fixes.

use crate::history::PositionHistory;

/// Tracks the current heading derived from the last two fixes.
///
/// Holds the previously reported bearing so that the degenerate
/// exactly-zero result can fall back to the last known heading instead of
/// snapping to due north (see `SearchRules::zero_bearing_is_invalid`).
#[derive(Debug, Clone, Default)]
pub struct BearingTracker {
    last_bearing: Option<f64>,
    zero_is_invalid: bool,
}

impl BearingTracker {
    pub fn new(zero_is_invalid: bool) -> Self {
        Self {
            last_bearing: None,
            zero_is_invalid,
        }
    }

    /// Bearing most recently accepted by `update`, if any.
    pub fn current(&self) -> Option<f64> {
        self.last_bearing
    }

    /// Re-estimate the heading from the two newest fixes.
    ///
    /// Returns `None` with fewer than two fixes. A computed bearing of
    /// exactly 0 returns the previously held bearing unchanged (which is
    /// `None` if no bearing was ever stored).
    pub fn update(&mut self, history: &PositionHistory) -> Option<f64> {
        let (prev, last) = (history.previous()?, history.latest()?);
        let bearing = initial_bearing_deg(prev.lat, prev.lon, last.lat, last.lon);
        if bearing == 0.0 && self.zero_is_invalid {
            return self.last_bearing;
        }
        self.last_bearing = Some(bearing);
        Some(bearing)
    }
}

/// Great-circle initial bearing from point 1 to point 2, degrees in [0, 360).
pub fn initial_bearing_deg(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let y = delta_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();

    (y.atan2(x).to_degrees() + 360.0) % 360.0
}
