//! Search rules and thresholds for the clearance engine.

use serde::{Deserialize, Serialize};

/// How the scorer treats a sample when the projection is degenerate
/// (zero or missing ground speed, or no current altitude).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZeroSpeedPolicy {
    /// Emit the point with weight 0.
    #[default]
    Unreachable,
    /// Omit the point from the scored output.
    Skip,
}

/// Configuration for the search cone, sampling grid, and scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRules {
    /// Half-angle of the search cone either side of the bearing, degrees
    pub half_angle_deg: f64,
    /// Forward search radius in meters
    pub search_radius_m: f64,
    /// Decimal places of the rounding grid (4 -> ~10m, 3 -> ~100m, 2 -> ~1km)
    pub grid_precision: u32,
    /// Required height above terrain along the projected path, meters
    pub clearance_margin_m: f64,
    /// Length of the rendered heading segment in kilometers
    pub heading_segment_km: f64,
    /// Treat a computed bearing of exactly 0 as "no usable heading" and hold
    /// the previous bearing. This conflates true-north movement with the
    /// degenerate no-movement case; disable to report due-north headings.
    pub zero_bearing_is_invalid: bool,
    /// Fallback for samples whose travel time cannot be projected
    pub zero_speed_policy: ZeroSpeedPolicy,
}

impl Default for SearchRules {
    fn default() -> Self {
        Self {
            half_angle_deg: 22.5,
            search_radius_m: 1000.0,
            grid_precision: 4,
            clearance_margin_m: 100.0,
            heading_segment_km: 0.1,
            zero_bearing_is_invalid: true,
            zero_speed_policy: ZeroSpeedPolicy::Unreachable,
        }
    }
}
