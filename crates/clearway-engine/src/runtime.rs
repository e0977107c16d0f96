//! Event-driven engine runtime.
//!
//! The core does not own a scheduler or any sensors; collaborators push
//! events into an mpsc channel and the renderer watches a snapshot channel.
//! The elevation round trip is the only suspension point, and it runs in
//! spawned resolve tasks so the event loop never blocks on the network.

use crate::engine::ClearanceEngine;
use crate::error::EngineError;
use clearway_core::{ClearanceSnapshot, PositionFix, PressureSample};
use clearway_elevation::ElevationProvider;
use tokio::sync::{mpsc, watch};

/// Events delivered by the position and pressure collaborators.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    Position(PositionFix),
    Pressure(PressureSample),
    /// Location permission revoked; terminal.
    PermissionDenied,
    Shutdown,
}

/// Drive the engine until shutdown, channel closure, or permission loss.
///
/// Within one position cycle the order is strict: bearing, geometry,
/// scoring, snapshot publish. The resolve pass for that cycle's uncached
/// points is spawned fire-and-forget; overlapping passes from consecutive
/// cycles are coalesced inside the resolver, and a pass still in flight at
/// shutdown is abandoned harmlessly (cache entries are idempotent).
pub async fn run_engine<P>(
    mut engine: ClearanceEngine<P>,
    mut events: mpsc::Receiver<EngineEvent>,
    snapshots: watch::Sender<Option<ClearanceSnapshot>>,
) -> Result<(), EngineError>
where
    P: ElevationProvider + 'static,
{
    while let Some(event) = events.recv().await {
        match event {
            EngineEvent::Position(fix) => {
                let Some(cycle) = engine.on_position(fix) else {
                    continue;
                };

                if snapshots.send(Some(cycle.snapshot)).is_err() {
                    tracing::debug!("No snapshot subscribers");
                }

                if !cycle.unresolved.is_empty() {
                    let resolver = engine.resolver();
                    tokio::spawn(async move {
                        match resolver.resolve(cycle.unresolved).await {
                            Ok(0) => {}
                            Ok(merged) => {
                                tracing::debug!("Cached {} new elevations", merged);
                            }
                            Err(err) => {
                                tracing::warn!("Elevation resolve failed: {}", err);
                            }
                        }
                    });
                }
            }
            EngineEvent::Pressure(sample) => {
                engine.on_pressure(sample);
                if let Some(altitude_m) = engine.pressure_altitude() {
                    tracing::debug!(
                        "Pressure {:.1} hPa (~{:.0} m)",
                        sample.pressure_hpa,
                        altitude_m
                    );
                }
            }
            EngineEvent::PermissionDenied => {
                tracing::error!("Location permission denied; stopping engine");
                return Err(EngineError::PermissionDenied);
            }
            EngineEvent::Shutdown => break,
        }
    }

    Ok(())
}
