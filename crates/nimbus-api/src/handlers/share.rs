//! Owner-facing share handlers: create, list, inspect, audit, revoke.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use nimbus_core::types::pagination::PageResponse;
use nimbus_entity::share::access_log::ShareAccessLog;
use nimbus_service::CreateShareInput;

use crate::dto::request::CreateShareRequest;
use crate::dto::response::{ApiResponse, ShareResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// POST /api/shares
pub async fn create_share(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateShareRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ShareResponse>>), ApiError> {
    let is_public = req.shared_with.is_none();
    let share = state
        .share_service
        .create_share(
            auth.user_id,
            CreateShareInput {
                file_id: req.file_id,
                shared_with: req.shared_with,
                is_public,
                permission: req.permission,
                password: req.password,
                expires_at: req.expires_at,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(share.into()))))
}

/// GET /api/shares
pub async fn list_shares(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<ShareResponse>>>, ApiError> {
    let page = state
        .share_service
        .list_shares(auth.user_id, &params.into_page_request())
        .await?;

    let items = page.items.into_iter().map(ShareResponse::from).collect();
    Ok(Json(ApiResponse::ok(PageResponse {
        items,
        page: page.page,
        page_size: page.page_size,
        total_items: page.total_items,
        total_pages: page.total_pages,
        has_next: page.has_next,
        has_previous: page.has_previous,
    })))
}

/// GET /api/shares/{id}
pub async fn get_share(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ShareResponse>>, ApiError> {
    let share = state.share_service.get_share(auth.user_id, id).await?;
    Ok(Json(ApiResponse::ok(share.into())))
}

/// GET /api/shares/{id}/logs
pub async fn list_access_logs(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<ShareAccessLog>>>, ApiError> {
    let page = state
        .share_service
        .list_access_logs(auth.user_id, id, &params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// DELETE /api/shares/{id}
pub async fn revoke_share(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    state.share_service.revoke_share(auth.user_id, id).await?;
    Ok(Json(ApiResponse::ok(
        serde_json::json!({ "message": "Share revoked" }),
    )))
}
