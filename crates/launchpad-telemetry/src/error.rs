//! Error types for telemetry setup.

use thiserror::Error;

/// Errors raised while wiring telemetry.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The global tracing subscriber could not be installed.
    #[error("failed to install tracing subscriber")]
    Init {
        /// Installation error detail.
        detail: String,
    },
}
