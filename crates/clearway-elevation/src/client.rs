//! Elevation provider API HTTP client.

use anyhow::{Context, Result};
use clearway_core::SamplePoint;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://api.open-elevation.com/api/v1/lookup";

/// Terrain elevation at a requested coordinate, as echoed by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElevationResult {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
}

#[derive(Debug, Serialize)]
struct LocationQuery {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Serialize)]
struct LookupRequest {
    locations: Vec<LocationQuery>,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    results: Vec<ElevationResult>,
}

/// Batched point-elevation lookup.
///
/// The trait seam lets tests substitute a stub for the network; the engine
/// is generic over it.
pub trait ElevationProvider: Send + Sync {
    /// Look up elevations for a batch of (already grid-rounded) points.
    ///
    /// A response without usable results is an empty vec, not an error;
    /// errors are reserved for transport and protocol failures.
    fn lookup(
        &self,
        locations: &[SamplePoint],
    ) -> impl Future<Output = Result<Vec<ElevationResult>>> + Send;
}

/// HTTP client for an open-elevation style batch API.
pub struct OpenElevationClient {
    client: Client,
    endpoint: String,
}

impl OpenElevationClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to create HTTP client"),
            endpoint: endpoint.into(),
        }
    }
}

impl Default for OpenElevationClient {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

impl ElevationProvider for OpenElevationClient {
    async fn lookup(&self, locations: &[SamplePoint]) -> Result<Vec<ElevationResult>> {
        if locations.is_empty() {
            return Ok(Vec::new());
        }

        let request = LookupRequest {
            locations: locations
                .iter()
                .map(|point| LocationQuery {
                    latitude: point.lat,
                    longitude: point.lon,
                })
                .collect(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .context("Failed to send elevation lookup")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "Elevation lookup failed: {} {}",
                status,
                body
            ));
        }

        let payload: LookupResponse = response
            .json()
            .await
            .context("Failed to parse elevation response")?;

        if payload.results.is_empty() {
            tracing::debug!("Elevation provider returned no results");
        }

        Ok(payload.results)
    }
}
