#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Telemetry plumbing for the Launchpad service: tracing subscriber setup,
//! `x-request-id` middleware layers, and request-scoped context.

pub mod context;
pub mod error;
pub mod init;

pub use context::{current_request_id, current_route, set_request_context, with_request_context};
pub use error::TelemetryError;
pub use init::{LogFormat, LoggingConfig, init_logging, service_version};

use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

/// Layer that stamps a fresh UUID onto requests lacking an `x-request-id`.
#[must_use]
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::x_request_id(MakeRequestUuid)
}

/// Layer that echoes the request's `x-request-id` onto the response.
#[must_use]
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::x_request_id()
}
