//! Route definitions for the Nimbus HTTP API.
//!
//! All routes are mounted under `/api`. The public share routes under
//! `/api/s` require no authentication; everything else except health and
//! the auth endpoints expects a Bearer token.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let max_upload = state.config.storage.max_upload_size_bytes as usize;

    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(file_routes())
        .merge(share_routes())
        .merge(public_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Auth endpoints: register, login, me
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/me", get(handlers::auth::me))
}

/// File CRUD, upload, download
fn file_routes() -> Router<AppState> {
    Router::new()
        .route("/files", get(handlers::file::list_files))
        .route("/files/upload", post(handlers::file::upload_file))
        .route("/files/{id}", get(handlers::file::get_file))
        .route("/files/{id}", delete(handlers::file::delete_file))
        .route("/files/{id}/download", get(handlers::file::download_file))
}

/// Owner-facing share management
fn share_routes() -> Router<AppState> {
    Router::new()
        .route("/shares", get(handlers::share::list_shares))
        .route("/shares", post(handlers::share::create_share))
        .route("/shares/{id}", get(handlers::share::get_share))
        .route("/shares/{id}", delete(handlers::share::revoke_share))
        .route("/shares/{id}/logs", get(handlers::share::list_access_logs))
}

/// Public token-addressed share access
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/s/{token}", get(handlers::shared::view_shared))
        .route("/s/{token}/download", get(handlers::shared::download_shared))
}

/// Health check (no auth required)
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health_check))
}
