//! Maps domain errors and share access denials to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use nimbus_core::error::{AppError, ErrorKind};
use nimbus_service::AccessDenial;

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// Error type returned by all handlers.
///
/// Wraps the domain `AppError` and, for the public share endpoints, the
/// typed access denial so each denial keeps its own error code on the wire.
#[derive(Debug)]
pub enum ApiError {
    /// A domain error.
    App(AppError),
    /// A share access denial.
    Denial(AccessDenial),
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl From<AccessDenial> for ApiError {
    fn from(denial: AccessDenial) -> Self {
        Self::Denial(denial)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            Self::App(err) => {
                let (status, code) = match err.kind {
                    ErrorKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
                    ErrorKind::Authentication => (StatusCode::UNAUTHORIZED, "AUTHENTICATION"),
                    ErrorKind::Authorization => (StatusCode::FORBIDDEN, "FORBIDDEN"),
                    ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                    ErrorKind::Gone => (StatusCode::GONE, "GONE"),
                    ErrorKind::Conflict => (StatusCode::CONFLICT, "CONFLICT"),
                    ErrorKind::ServiceUnavailable => {
                        (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE")
                    }
                    ErrorKind::Internal
                    | ErrorKind::Database
                    | ErrorKind::Storage
                    | ErrorKind::Configuration
                    | ErrorKind::Serialization => {
                        tracing::error!(error = %err, "Internal server error");
                        (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
                    }
                };
                // Internal details stay in the logs.
                let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
                    "An internal error occurred".to_string()
                } else {
                    err.message
                };
                (status, code, message)
            }
            Self::Denial(denial) => {
                let status = match denial {
                    AccessDenial::ShareNotFound => StatusCode::NOT_FOUND,
                    AccessDenial::ShareRevoked | AccessDenial::ShareExpired => StatusCode::GONE,
                    AccessDenial::PasswordRequired | AccessDenial::InvalidPassword => {
                        StatusCode::UNAUTHORIZED
                    }
                    AccessDenial::InsufficientPermission => StatusCode::FORBIDDEN,
                };
                (status, denial.as_str(), denial.into_error().message)
            }
        };

        let body = ApiErrorResponse {
            error: error_code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}
