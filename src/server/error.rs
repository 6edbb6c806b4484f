//! Error-to-HTTP response conversion.
//!
//! Implements `IntoResponse` for [`crate::error::Error`] via a wrapper so
//! that route handlers can return `Result<T, AppError>` and use `?` on
//! anything producing the crate error.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::error::Error;

/// Wrapper so we can implement `IntoResponse` for the crate error type.
pub struct AppError(Error);

impl From<Error> for AppError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(
                status = %status,
                error = %self.0,
                "Server error in API handler"
            );
        }

        let code = match &self.0 {
            Error::NotFound { .. } => "not_found",
            Error::Validation(_) => "validation_error",
            Error::ProcessStart { .. } => "process_start_error",
            Error::JobFailed { .. } => "job_failed",
            Error::Io { .. } => "io_error",
            Error::Internal(_) => "internal_error",
        };

        // Surface captured diagnostics: this is an operator-facing tool, so
        // stderr detail goes straight into the response body.
        let details = match &self.0 {
            Error::JobFailed { details } => Some(details.clone()),
            Error::ProcessStart { message, .. } => Some(message.clone()),
            Error::Io { source } => Some(source.to_string()),
            _ => None,
        };

        let body = json!({
            "error": self.0.to_string(),
            "code": code,
            "details": details,
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_produces_404() {
        let err = AppError::from(Error::not_found("folder", "abc"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn validation_produces_400() {
        let err = AppError::from(Error::Validation("folder parameter is required".into()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn job_failure_produces_500() {
        let err = AppError::from(Error::JobFailed {
            details: "Traceback".into(),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
