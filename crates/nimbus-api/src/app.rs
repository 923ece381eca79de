//! Application builder: wires services, router, and middleware into an
//! Axum app and runs the HTTP server.

use std::sync::Arc;

use axum::Router;
use sqlx::PgPool;
use tower_http::cors::CorsLayer;

use nimbus_auth::jwt::{JwtDecoder, JwtEncoder};
use nimbus_auth::password::{PasswordHasher, PasswordValidator};
use nimbus_core::config::AppConfig;
use nimbus_core::config::app::CorsConfig;
use nimbus_core::error::AppError;
use nimbus_database::repositories::access_log::AccessLogRepository;
use nimbus_database::repositories::file::FileRepository;
use nimbus_database::repositories::share::ShareRepository;
use nimbus_database::repositories::user::UserRepository;
use nimbus_service::{
    AccessLogger, AuthService, FileService, ShareAccessService, ShareEvaluator, ShareService,
    TokenGenerator,
};
use nimbus_storage::local::BlobStore;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState, cors_config: &CorsConfig) -> Router {
    let cors = build_cors_layer(cors_config);
    build_router(state).layer(cors)
}

/// Constructs the full application state from configuration and a pool.
pub async fn build_state(config: AppConfig, db_pool: PgPool) -> Result<AppState, AppError> {
    let blobs = Arc::new(BlobStore::new(&config.storage.root_path).await?);

    let user_repo = UserRepository::new(db_pool.clone());
    let file_repo = Arc::new(FileRepository::new(db_pool.clone()));
    let share_repo = Arc::new(ShareRepository::new(db_pool.clone()));
    let log_repo = Arc::new(AccessLogRepository::new(db_pool.clone()));

    let password_hasher = Arc::new(PasswordHasher::new());
    let password_validator = PasswordValidator::new(&config.auth);
    let jwt_encoder = JwtEncoder::new(&config.auth);
    let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));

    let auth_service = Arc::new(AuthService::new(
        user_repo,
        Arc::clone(&password_hasher),
        password_validator,
        jwt_encoder,
    ));
    let file_service = Arc::new(FileService::new(
        FileRepository::new(db_pool.clone()),
        Arc::clone(&blobs),
    ));

    let logger = AccessLogger::new(log_repo as Arc<dyn nimbus_service::share::AccessLogStore>);
    let evaluator = ShareEvaluator::new(Arc::clone(&password_hasher));
    let access_service = Arc::new(ShareAccessService::new(
        Arc::clone(&share_repo) as Arc<dyn nimbus_service::share::ShareStore>,
        evaluator,
        logger.clone(),
    ));
    let share_service = Arc::new(ShareService::new(
        share_repo as Arc<dyn nimbus_service::share::ShareStore>,
        file_repo as Arc<dyn nimbus_service::share::FileLookup>,
        logger,
        TokenGenerator::new(),
        Arc::clone(&password_hasher),
    ));

    Ok(AppState {
        config: Arc::new(config),
        db_pool,
        jwt_decoder,
        auth_service,
        file_service,
        share_service,
        access_service,
    })
}

/// Runs the Nimbus server with the given configuration and database pool.
pub async fn run_server(config: AppConfig, db_pool: PgPool) -> Result<(), AppError> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let cors_config = config.server.cors.clone();

    let state = build_state(config, db_pool).await?;
    let app = build_app(state, &cors_config);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Nimbus server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    Ok(())
}

/// Build CORS layer from configuration.
fn build_cors_layer(cors_config: &CorsConfig) -> CorsLayer {
    use tower_http::cors::Any;

    let mut cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(cors_config.max_age_seconds));

    if cors_config.allowed_origins.contains(&"*".to_string()) {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<http::HeaderValue> = cors_config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    cors
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
    }
}
