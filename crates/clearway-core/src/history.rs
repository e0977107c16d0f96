//! Bounded position history for heading and vertical-speed estimation.

use crate::models::PositionFix;
use std::collections::VecDeque;

/// Number of fixes retained; enough for a heading plus one fix of slack.
pub const HISTORY_CAPACITY: usize = 3;

/// Time-ordered window of the most recent position fixes.
#[derive(Debug, Clone, Default)]
pub struct PositionHistory {
    fixes: VecDeque<PositionFix>,
}

impl PositionHistory {
    pub fn new() -> Self {
        Self {
            fixes: VecDeque::with_capacity(HISTORY_CAPACITY + 1),
        }
    }

    /// Record a fix, evicting the oldest beyond capacity.
    ///
    /// Invalid fixes are dropped without error; fixes arrive on a steady
    /// external cadence, so the next one fills the gap.
    pub fn record(&mut self, fix: PositionFix) {
        if !fix.is_valid() {
            return;
        }
        self.fixes.push_back(fix);
        while self.fixes.len() > HISTORY_CAPACITY {
            self.fixes.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.fixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixes.is_empty()
    }

    /// Most recent fix.
    pub fn latest(&self) -> Option<&PositionFix> {
        self.fixes.back()
    }

    /// Second most recent fix.
    pub fn previous(&self) -> Option<&PositionFix> {
        let len = self.fixes.len();
        if len < 2 {
            return None;
        }
        self.fixes.get(len - 2)
    }

    /// Climb/sink rate over the last two fixes, meters per second.
    ///
    /// Returns 0.0 with fewer than two fixes, missing altitudes, or zero
    /// elapsed time.
    pub fn vertical_speed_mps(&self) -> f64 {
        let (Some(prev), Some(last)) = (self.previous(), self.latest()) else {
            return 0.0;
        };
        let (Some(prev_alt), Some(last_alt)) = (prev.altitude_m, last.altitude_m) else {
            return 0.0;
        };
        let dt_s = (last.timestamp - prev.timestamp).num_milliseconds() as f64 / 1000.0;
        if dt_s == 0.0 {
            return 0.0;
        }
        (last_alt - prev_alt) / dt_s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn history_keeps_only_newest_three() {
        let mut history = PositionHistory::new();
        let now = Utc::now();
        for i in 0..5 {
            history.record(PositionFix::new(
                37.0 + i as f64 * 0.001,
                -122.0,
                now + Duration::seconds(i),
            ));
        }
        assert_eq!(history.len(), 3);
        // Oldest surviving fix is #2
        let oldest = history.fixes.front().unwrap();
        assert!((oldest.lat - 37.002).abs() < 1e-12);
        assert!((history.latest().unwrap().lat - 37.004).abs() < 1e-12);
    }

    #[test]
    fn invalid_fixes_are_silently_dropped() {
        let mut history = PositionHistory::new();
        history.record(PositionFix::new(f64::NAN, -122.0, Utc::now()));
        history.record(PositionFix::new(95.0, -122.0, Utc::now()));
        assert!(history.is_empty());
    }

    #[test]
    fn vertical_speed_descent() {
        // 100m -> 90m over 5s = -2 m/s
        let mut history = PositionHistory::new();
        let now = Utc::now();
        history.record(PositionFix::new(37.0, -122.0, now).with_motion(100.0, 10.0));
        history.record(
            PositionFix::new(37.001, -122.0, now + Duration::seconds(5)).with_motion(90.0, 10.0),
        );
        assert!((history.vertical_speed_mps() + 2.0).abs() < 1e-12);
    }

    #[test]
    fn vertical_speed_degenerate_cases() {
        let mut history = PositionHistory::new();
        let now = Utc::now();
        assert_eq!(history.vertical_speed_mps(), 0.0);

        history.record(PositionFix::new(37.0, -122.0, now).with_motion(100.0, 10.0));
        assert_eq!(history.vertical_speed_mps(), 0.0);

        // Same timestamp -> zero dt
        history.record(PositionFix::new(37.001, -122.0, now).with_motion(90.0, 10.0));
        assert_eq!(history.vertical_speed_mps(), 0.0);

        // Missing altitude
        let mut history = PositionHistory::new();
        history.record(PositionFix::new(37.0, -122.0, now).with_motion(100.0, 10.0));
        history.record(PositionFix::new(37.001, -122.0, now + Duration::seconds(5)));
        assert_eq!(history.vertical_speed_mps(), 0.0);
    }
}
