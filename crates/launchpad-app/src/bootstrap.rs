//! Boot sequence: load `.env`, validate the environment, install
//! telemetry, connect the database, and launch the API listener.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use launchpad_api::ApiServer;
use launchpad_config::{AppConfig, AppEnv, ConfigError};
use launchpad_telemetry::{LogFormat, LoggingConfig};
use tracing::info;

use crate::error::{AppError, AppResult};

/// Entry point for the Launchpad application boot sequence.
///
/// A failed environment validation prints the diagnostic report and exits
/// the process with a non-zero status before any listener is opened; there
/// is no fallback to defaults.
///
/// # Errors
///
/// Returns an error if telemetry, database, or server startup fails after
/// configuration has validated.
pub async fn run_app() -> AppResult<()> {
    // Values already present in the process environment win over `.env`.
    dotenvy::dotenv().ok();

    let config = match launchpad_config::load() {
        Ok(config) => config,
        Err(error @ ConfigError::Validation { .. }) => {
            eprint!("{}", error.report());
            std::process::exit(1);
        }
    };

    run_app_with(config).await
}

/// Boot sequence that relies on an already-validated configuration to
/// simplify testing.
async fn run_app_with(config: AppConfig) -> AppResult<()> {
    launchpad_telemetry::init_logging(&logging_config(config.env))
        .map_err(|err| AppError::telemetry("telemetry.init", err))?;

    info!(env = %config.env, "Launchpad application bootstrap starting");

    let pool = launchpad_data::connect(&config.database_url)
        .await
        .map_err(|err| AppError::data("pool.connect", err))?;
    launchpad_data::run_migrations(&pool)
        .await
        .map_err(|err| AppError::data("migrations.run", err))?;

    let api = ApiServer::new(config.clone(), pool);
    let addr = listen_addr(config.port);
    info!(addr = %addr, "Launching API listener");

    api.serve(addr)
        .await
        .map_err(|err| AppError::api_server("api_server.serve", err))?;

    info!("API server shutdown complete");
    Ok(())
}

fn logging_config(env: AppEnv) -> LoggingConfig<'static> {
    LoggingConfig {
        format: if env.is_production() {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        },
        ..LoggingConfig::default()
    }
}

const fn listen_addr(port: u16) -> SocketAddr {
    SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port)
}
