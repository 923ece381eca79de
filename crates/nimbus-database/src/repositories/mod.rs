//! Concrete repository implementations.

pub mod access_log;
pub mod file;
pub mod share;
pub mod user;

use nimbus_core::error::{AppError, ErrorKind};

/// Map an sqlx error into an `AppError`.
///
/// Pool timeouts surface as `ServiceUnavailable` so callers can treat them
/// as retryable transients instead of denials.
pub(crate) fn map_sqlx_error(context: &str, err: sqlx::Error) -> AppError {
    match err {
        sqlx::Error::PoolTimedOut => AppError::with_source(
            ErrorKind::ServiceUnavailable,
            format!("{context}: database pool timed out"),
            err,
        ),
        _ => AppError::with_source(ErrorKind::Database, context.to_string(), err),
    }
}
