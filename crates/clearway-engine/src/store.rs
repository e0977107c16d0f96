//! Append-only elevation store keyed by the rounding grid.

use clearway_core::{GridKey, SamplePoint};
use dashmap::DashMap;
use std::sync::Arc;

/// Grow-only memo of terrain elevations for the process lifetime.
///
/// Entries are never overwritten and never evicted; the rounding grid on
/// the sampling side is what bounds growth. Clones share the same map, so
/// in-flight resolve tasks and the engine see one store.
#[derive(Debug, Clone)]
pub struct ElevationStore {
    entries: Arc<DashMap<GridKey, f64>>,
    precision: u32,
}

impl ElevationStore {
    pub fn new(precision: u32) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            precision,
        }
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, point: &SamplePoint) -> Option<f64> {
        let key = GridKey::from_deg(point.lat, point.lon, self.precision);
        self.entries.get(&key).map(|entry| *entry.value())
    }

    /// Insert an elevation unless the cell is already cached.
    ///
    /// Cached values are immutable, which makes partial merges from a
    /// cancelled resolve pass harmless.
    pub fn insert_new(&self, key: GridKey, elevation_m: f64) {
        self.entries.entry(key).or_insert(elevation_m);
    }

    pub fn contains(&self, key: &GridKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Split a sample set into points with a cached elevation and points
    /// still needing a lookup.
    pub fn partition(&self, points: &[SamplePoint]) -> (Vec<(SamplePoint, f64)>, Vec<SamplePoint>) {
        let mut cached = Vec::new();
        let mut uncached = Vec::new();
        for point in points {
            match self.get(point) {
                Some(elevation_m) => cached.push((*point, elevation_m)),
                None => uncached.push(*point),
            }
        }
        (cached, uncached)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lon: f64) -> SamplePoint {
        SamplePoint { lat, lon }
    }

    #[test]
    fn cached_entries_are_never_overwritten() {
        let store = ElevationStore::new(4);
        let key = GridKey::from_deg(37.1234, -122.0001, 4);
        store.insert_new(key, 512.0);
        store.insert_new(key, 999.0);
        assert_eq!(store.get(&point(37.1234, -122.0001)), Some(512.0));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn lookup_matches_sub_resolution_points() {
        let store = ElevationStore::new(4);
        store.insert_new(GridKey::from_deg(37.1234, -122.0001, 4), 512.0);
        // A raw point rounding onto the same cell hits the cache.
        assert_eq!(store.get(&point(37.12341, -122.00012)), Some(512.0));
    }

    #[test]
    fn partition_splits_cached_and_uncached() {
        let store = ElevationStore::new(4);
        store.insert_new(GridKey::from_deg(37.1234, -122.0001, 4), 512.0);

        let points = vec![point(37.1234, -122.0001), point(37.2, -122.1)];
        let (cached, uncached) = store.partition(&points);
        assert_eq!(cached, vec![(point(37.1234, -122.0001), 512.0)]);
        assert_eq!(uncached, vec![point(37.2, -122.1)]);
    }
}
