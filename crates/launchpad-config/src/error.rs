//! Error types for configuration validation and the startup diagnostic
//! report rendered before the process exits.

use std::fmt::Write;

use thiserror::Error;

use crate::validate::ValidationError;

/// Primary error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// One or more environment settings failed validation.
    #[error("environment variable validation failed")]
    Validation {
        /// Every failed rule, in setting declaration order.
        errors: Vec<ValidationError>,
    },
}

impl ConfigError {
    /// Render the fixed diagnostic block emitted to stderr when startup
    /// validation fails. Kept byte-stable so operators and scripts can rely
    /// on its shape.
    #[must_use]
    pub fn report(&self) -> String {
        let Self::Validation { errors } = self;
        let mut out = String::from("❌ Environment variable validation failed:\n\n");
        for error in errors {
            let _ = writeln!(out, "  - {}: {}", error.field, error.message);
        }
        out.push_str(
            "\nPlease check your .env file and ensure all required variables are set. \
             See .env.example for reference.\n",
        );
        out
    }
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;
