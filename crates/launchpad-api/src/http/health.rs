//! Health endpoint: re-checks datastore reachability and configuration
//! validity on every request, independent of the startup-time decision.

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use launchpad_config::validate::FIELD_APP_ENV;
use launchpad_config::{AppEnv, EnvReport, inspect_env};
use serde::Serialize;
use tokio::time::timeout;
use tracing::warn;

use crate::state::ApiState;

/// Upper bound on the datastore round trip; a probe that exceeds this is
/// reported as unhealthy rather than left hanging on the driver's default.
const DATABASE_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

const STATUS_OK: &str = "ok";
const STATUS_ERROR: &str = "error";

#[derive(Debug, Serialize)]
pub(crate) struct HealthCheck {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ConfigurationCheck {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    missing: Option<Vec<&'static str>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct HealthChecks {
    database: HealthCheck,
    configuration: ConfigurationCheck,
}

#[derive(Debug, Serialize)]
pub(crate) struct HealthReport {
    status: &'static str,
    timestamp: DateTime<Utc>,
    environment: &'static str,
    checks: HealthChecks,
    uptime: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    platform: Option<&'static str>,
}

pub(crate) async fn health(State(state): State<Arc<ApiState>>) -> Response {
    let database = probe_database(&state).await;
    let configuration = configuration_check(&inspect_env());

    let environment = live_environment(&state);
    let healthy = database.status == STATUS_OK && configuration.status == STATUS_OK;
    let debug_metadata = environment.is_development();

    let body = HealthReport {
        status: if healthy { STATUS_OK } else { STATUS_ERROR },
        timestamp: Utc::now(),
        environment: environment.as_str(),
        checks: HealthChecks {
            database,
            configuration,
        },
        uptime: state.uptime_secs(),
        version: debug_metadata.then(launchpad_telemetry::service_version),
        platform: debug_metadata.then_some(std::env::consts::OS),
    };

    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status_code, Json(body)).into_response()
}

async fn probe_database(state: &ApiState) -> HealthCheck {
    match timeout(DATABASE_PROBE_TIMEOUT, launchpad_data::ping(&state.pool)).await {
        Ok(Ok(())) => HealthCheck {
            status: STATUS_OK,
            message: None,
        },
        Ok(Err(err)) => {
            warn!(error = %err, "health probe failed to reach database");
            HealthCheck {
                status: STATUS_ERROR,
                message: Some(describe(&err)),
            }
        }
        Err(_) => {
            warn!(
                timeout_secs = DATABASE_PROBE_TIMEOUT.as_secs(),
                "health probe timed out"
            );
            HealthCheck {
                status: STATUS_ERROR,
                message: Some(format!(
                    "database probe timed out after {}s",
                    DATABASE_PROBE_TIMEOUT.as_secs()
                )),
            }
        }
    }
}

fn configuration_check(report: &EnvReport) -> ConfigurationCheck {
    if report.is_ok() {
        ConfigurationCheck {
            status: STATUS_OK,
            message: None,
            missing: None,
        }
    } else {
        ConfigurationCheck {
            status: STATUS_ERROR,
            message: Some(report.detail()),
            missing: Some(report.missing.clone()),
        }
    }
}

/// Runtime mode as the environment currently reports it, falling back to
/// the startup snapshot when the live value is absent or malformed.
fn live_environment(state: &ApiState) -> AppEnv {
    std::env::var(FIELD_APP_ENV)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or_else(|| state.env())
}

fn describe(error: &dyn Error) -> String {
    error.source().map_or_else(
        || error.to_string(),
        |source| format!("{error}: {source}"),
    )
}
