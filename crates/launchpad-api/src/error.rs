//! Server-level error types (bind/serve failures). Request-level errors
//! live in `http::errors`.

use std::io;

use thiserror::Error;

/// Errors raised while running the API server.
#[derive(Debug, Error)]
pub enum ApiServerError {
    /// The listener address could not be bound.
    #[error("failed to bind API listener")]
    Bind {
        /// Source IO error.
        source: io::Error,
    },
    /// The server loop terminated with an error.
    #[error("api server terminated unexpectedly")]
    Serve {
        /// Source IO error.
        source: io::Error,
    },
}
