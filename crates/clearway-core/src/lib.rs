pub mod bearing;
pub mod geometry;
pub mod history;
pub mod models;
pub mod rules;
pub mod scorer;

pub use bearing::{initial_bearing_deg, BearingTracker};
pub use geometry::{
    cone_rays, destination_point, edge_length_km, round_coord, GridKey, SearchCone,
    EARTH_RADIUS_KM,
};
pub use history::{PositionHistory, HISTORY_CAPACITY};
pub use models::{
    pressure_altitude_m, ClearanceSnapshot, DirectionSegment, PositionFix, PressureSample,
    SamplePoint, ScoredPoint,
};
pub use rules::{SearchRules, ZeroSpeedPolicy};
pub use scorer::{planar_distance_km, score_points};
