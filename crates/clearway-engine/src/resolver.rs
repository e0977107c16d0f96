//! Coalescing elevation resolution over the external provider.

use crate::error::EngineError;
use crate::store::ElevationStore;
use clearway_core::{GridKey, SamplePoint};
use clearway_elevation::ElevationProvider;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Resolves uncached sample points through the elevation provider and
/// merges results into the store.
///
/// Resolve passes from overlapping position cycles are coalesced by the
/// pending key set: a point already carried by an in-flight request is
/// skipped, so the same grid cell is never fetched twice concurrently.
pub struct ElevationResolver<P> {
    provider: Arc<P>,
    store: ElevationStore,
    pending: Arc<Mutex<HashSet<GridKey>>>,
}

impl<P> Clone for ElevationResolver<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            store: self.store.clone(),
            pending: Arc::clone(&self.pending),
        }
    }
}

/// Claim on pending keys, released when the pass finishes or is cancelled.
struct PendingClaim {
    pending: Arc<Mutex<HashSet<GridKey>>>,
    keys: Vec<GridKey>,
}

impl Drop for PendingClaim {
    fn drop(&mut self) {
        if let Ok(mut pending) = self.pending.lock() {
            for key in &self.keys {
                pending.remove(key);
            }
        }
    }
}

impl<P: ElevationProvider> ElevationResolver<P> {
    pub fn new(provider: Arc<P>, store: ElevationStore) -> Self {
        Self {
            provider,
            store,
            pending: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn store(&self) -> &ElevationStore {
        &self.store
    }

    /// Resolve elevations for a sample set. Returns the number of newly
    /// cached entries.
    ///
    /// Points already cached or already in flight are skipped; with nothing
    /// left, no network request is issued. On provider failure the store is
    /// left unchanged and no retry is scheduled here; later cycles simply
    /// re-request whatever is still uncached.
    pub async fn resolve(&self, points: Vec<SamplePoint>) -> Result<usize, EngineError> {
        let precision = self.store.precision();
        let (_, uncached) = self.store.partition(&points);

        let claim = {
            let mut pending = self
                .pending
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            let mut claimed = Vec::new();
            for point in &uncached {
                let key = GridKey::from_deg(point.lat, point.lon, precision);
                if pending.insert(key) {
                    claimed.push(key);
                }
            }
            PendingClaim {
                pending: Arc::clone(&self.pending),
                keys: claimed,
            }
        };

        if claim.keys.is_empty() {
            return Ok(0);
        }

        let batch: Vec<SamplePoint> = claim
            .keys
            .iter()
            .map(|key| key.to_point(precision))
            .collect();

        tracing::debug!(
            cached = points.len() - uncached.len(),
            requested = batch.len(),
            "resolving elevations"
        );

        let results = self
            .provider
            .lookup(&batch)
            .await
            .map_err(EngineError::Provider)?;

        if results.is_empty() {
            tracing::warn!("Elevation provider returned no data for {} points", batch.len());
            return Ok(0);
        }

        // Partial results are fine; missing points stay unresolved until a
        // later pass requests them again.
        let mut merged = 0usize;
        for result in results {
            let key = GridKey::from_deg(result.latitude, result.longitude, precision);
            if !self.store.contains(&key) {
                merged += 1;
            }
            self.store.insert_new(key, result.elevation);
        }

        Ok(merged)
    }
}
