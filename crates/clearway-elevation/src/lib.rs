pub mod client;

pub use client::{ElevationProvider, ElevationResult, OpenElevationClient, DEFAULT_ENDPOINT};
