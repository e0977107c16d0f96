//! Clearance engine simulator.
//!
//! Feeds a synthetic straight-line observer track into the engine runtime
//! and logs each snapshot the renderer would receive. Stands in for the
//! location and barometer collaborators during development.
//!
//! Usage:
//!   cargo run -p clearway-cli --bin clearance_sim -- --steps 20

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use clearway_core::{destination_point, PositionFix, SearchRules};
use clearway_elevation::{OpenElevationClient, DEFAULT_ENDPOINT};
use clearway_engine::{run_engine, ClearanceEngine, EngineEvent};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Simulated observer track parameters.
#[derive(Parser, Debug)]
#[command(author, version, about = "Terrain clearance simulator")]
struct Args {
    /// Starting latitude
    #[arg(long, default_value_t = 46.55)]
    lat: f64,

    /// Starting longitude
    #[arg(long, default_value_t = 8.56)]
    lon: f64,

    /// Starting altitude in meters AMSL
    #[arg(long, default_value_t = 2500.0)]
    altitude: f64,

    /// Ground speed in m/s
    #[arg(long, default_value_t = 12.0)]
    speed: f64,

    /// Track heading in degrees (0 = north)
    #[arg(long, default_value_t = 90.0)]
    heading: f64,

    /// Sink rate in m/s (positive = descending)
    #[arg(long, default_value_t = 1.5)]
    sink: f64,

    /// Seconds between position fixes
    #[arg(long, default_value_t = 3.0)]
    interval: f64,

    /// Number of fixes to emit
    #[arg(long, default_value_t = 10)]
    steps: u32,

    /// Elevation provider endpoint
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("clearance_sim=info".parse()?)
                .add_directive("clearway_engine=info".parse()?),
        )
        .init();

    let args = Args::parse();
    tracing::info!(
        "Simulating {} fixes from ({:.4}, {:.4}) heading {:.0} deg",
        args.steps,
        args.lat,
        args.lon,
        args.heading
    );

    let engine = ClearanceEngine::new(
        OpenElevationClient::new(&args.endpoint),
        SearchRules::default(),
    );

    let (events, rx) = mpsc::channel(32);
    let (snap_tx, mut snap_rx) = watch::channel(None);
    let runtime = tokio::spawn(run_engine(engine, rx, snap_tx));

    // Log each snapshot the renderer would receive.
    let reporter = tokio::spawn(async move {
        while snap_rx.changed().await.is_ok() {
            let Some(snapshot) = snap_rx.borrow_and_update().clone() else {
                continue;
            };
            let clear = snapshot
                .points
                .iter()
                .filter(|p| p.weight >= 1.0)
                .count();
            tracing::info!(
                "heading {:.1} deg, {} scored points, {} clear",
                snapshot.heading_deg,
                snapshot.points.len(),
                clear
            );
        }
    });

    let mut ticker = time::interval(Duration::from_secs_f64(args.interval.max(0.1)));
    for step in 0..args.steps {
        ticker.tick().await;

        let elapsed_s = step as f64 * args.interval;
        let distance_km = args.speed * elapsed_s / 1000.0;
        let (lat, lon) = destination_point(args.lat, args.lon, args.heading, distance_km);
        let altitude = args.altitude - args.sink * elapsed_s;

        let fix = PositionFix::new(lat, lon, Utc::now())
            .with_motion(altitude, args.speed);
        events.send(EngineEvent::Position(fix)).await?;
    }

    events.send(EngineEvent::Shutdown).await?;
    runtime.await??;
    reporter.abort();

    tracing::info!("Simulation complete");
    Ok(())
}
