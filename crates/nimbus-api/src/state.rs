//! Application state shared across all handlers.

use std::sync::Arc;

use sqlx::PgPool;

use nimbus_auth::jwt::JwtDecoder;
use nimbus_core::config::AppConfig;
use nimbus_service::{AuthService, FileService, ShareAccessService, ShareService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool, used directly by the health endpoint.
    pub db_pool: PgPool,
    /// JWT token decoder and validator.
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Account registration and login.
    pub auth_service: Arc<AuthService>,
    /// File metadata and blob handling.
    pub file_service: Arc<FileService>,
    /// Owner-facing share management.
    pub share_service: Arc<ShareService>,
    /// Token-addressed share access pipeline.
    pub access_service: Arc<ShareAccessService>,
}
