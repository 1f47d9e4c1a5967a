//! HTTP surface for the Launchpad service: router construction, the health
//! endpoint, validated extractors, and the CRUD handlers.

pub mod error;
pub mod models;

mod http;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use launchpad_config::AppConfig;
use sqlx::MySqlPool;
use tokio::net::TcpListener;
use tracing::info;

use crate::error::ApiServerError;
use crate::state::ApiState;

/// Fully-wired API server, ready to bind.
pub struct ApiServer {
    router: Router,
}

impl ApiServer {
    /// Construct the server with its dependencies injected. The pool is the
    /// only process-wide state and is read-only after this point.
    #[must_use]
    pub fn new(config: AppConfig, pool: MySqlPool) -> Self {
        let state = Arc::new(ApiState::new(config, pool));
        Self {
            router: http::router::build_router(state),
        }
    }

    /// Consume the server and expose the underlying router, primarily for
    /// in-process tests driving it through `tower::ServiceExt`.
    #[must_use]
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Bind the listener and serve until shutdown.
    ///
    /// # Errors
    ///
    /// Returns an error when the address cannot be bound or the server
    /// terminates unexpectedly.
    pub async fn serve(self, addr: SocketAddr) -> Result<(), ApiServerError> {
        info!(addr = %addr, "starting API listener");
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ApiServerError::Bind { source })?;
        axum::serve(listener, self.router.into_make_service())
            .await
            .map_err(|source| ApiServerError::Serve { source })?;
        Ok(())
    }
}
