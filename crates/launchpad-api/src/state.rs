//! Shared request-handler state.

use std::time::Instant;

use launchpad_config::{AppConfig, AppEnv};
use sqlx::MySqlPool;

/// Dependencies shared by every handler. Constructed once at bootstrap;
/// nothing here is mutated afterwards.
pub(crate) struct ApiState {
    pub(crate) config: AppConfig,
    pub(crate) pool: MySqlPool,
    started_at: Instant,
}

impl ApiState {
    pub(crate) fn new(config: AppConfig, pool: MySqlPool) -> Self {
        Self {
            config,
            pool,
            started_at: Instant::now(),
        }
    }

    /// Runtime mode captured at startup.
    pub(crate) const fn env(&self) -> AppEnv {
        self.config.env
    }

    /// Whole seconds elapsed since the server state was constructed.
    pub(crate) fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
