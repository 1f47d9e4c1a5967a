//! Request-level error type mapped onto the fixed error envelope.

use std::fmt::Display;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use launchpad_config::AppEnv;
use launchpad_telemetry::current_request_id;
use tracing::error;
use uuid::Uuid;

use crate::models::{ErrorBody, FieldError};

/// Structured API error; converts into the `{error, message?, errorId?,
/// details?}` envelope.
#[derive(Debug)]
pub(crate) struct ApiError {
    pub(crate) status: StatusCode,
    error: &'static str,
    message: Option<String>,
    error_id: Option<String>,
    details: Option<Vec<FieldError>>,
}

impl ApiError {
    const fn new(status: StatusCode, error: &'static str) -> Self {
        Self {
            status,
            error,
            message: None,
            error_id: None,
            details: None,
        }
    }

    fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub(crate) fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "bad_request").with_message(message)
    }

    /// Field-level validation failure; carries one detail entry per rule.
    pub(crate) fn validation(details: Vec<FieldError>) -> Self {
        let mut error = Self::new(StatusCode::BAD_REQUEST, "validation_failed")
            .with_message("request validation failed");
        error.details = Some(details);
        error
    }

    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found").with_message(message)
    }

    /// Internal fault: assigns a correlation identifier, logs the full
    /// detail server-side, and withholds the message from the client in
    /// production.
    pub(crate) fn internal(env: AppEnv, operation: &'static str, source: impl Display) -> Self {
        let error_id = Uuid::new_v4().to_string();
        let request_id = current_request_id().unwrap_or_default();
        error!(
            error_id = %error_id,
            request_id = %request_id,
            operation,
            error = %source,
            "request failed with internal error"
        );
        let mut error = Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal_server_error");
        if !env.is_production() {
            error.message = Some(source.to_string());
        }
        error.error_id = Some(error_id);
        error
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.error.to_string(),
            message: self.message,
            error_id: self.error_id,
            details: self.details,
        };
        (self.status, Json(body)).into_response()
    }
}
