//! Typed configuration models.
//!
//! # Design
//! - Pure data carriers produced by `validate.rs`.
//! - A setting is either fully typed here or reported as a single
//!   [`crate::ValidationError`]; partially-parsed values never escape.

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fully-validated runtime configuration assembled from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// TCP port the API server binds to.
    pub port: u16,
    /// Runtime mode the service operates in.
    pub env: AppEnv,
    /// MySQL connection string handed to the pool builder.
    pub database_url: String,
}

/// Runtime mode recorded in `APP_ENV`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnv {
    /// Local development: pretty logs, debug metadata on health responses.
    Development,
    /// Production: JSON logs, internal error details withheld from clients.
    Production,
    /// Automated test runs.
    Test,
}

impl FromStr for AppEnv {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" => Ok(Self::Development),
            "production" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            other => Err(anyhow!("invalid app env '{other}'")),
        }
    }
}

impl AppEnv {
    #[must_use]
    /// Render the mode as its lowercase string representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Test => "test",
        }
    }

    #[must_use]
    /// Whether the service is running in production mode.
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    /// Whether the service is running in development mode.
    pub const fn is_development(self) -> bool {
        matches!(self, Self::Development)
    }
}

impl fmt::Display for AppEnv {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
