//! Engine error taxonomy.

use thiserror::Error;

/// Errors surfaced by the engine runtime.
///
/// Only `PermissionDenied` is terminal. Provider failures are absorbed by
/// the resolve tasks (logged, cache untouched) and show up here only when a
/// caller awaits a resolve pass directly.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Location permission revoked or never granted; no further position
    /// processing is possible.
    #[error("location permission denied")]
    PermissionDenied,

    /// Elevation provider transport or protocol failure.
    #[error("elevation provider unavailable: {0}")]
    Provider(#[source] anyhow::Error),
}
