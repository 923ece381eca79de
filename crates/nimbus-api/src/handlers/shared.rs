//! Public share access handlers, addressed by token. No login required.
//!
//! Each handler authorizes first, performs the downstream work, and only
//! then records the access. A failed download never counts.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::Response;

use nimbus_entity::share::permission::SharePermission;

use crate::dto::request::ShareAccessQuery;
use crate::dto::response::{ApiResponse, SharedFileResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ClientInfo};
use crate::handlers::file::stream_download;
use crate::state::AppState;

/// Logged-in visitors are attributed by email; everyone else by transport.
fn actor_for(auth: &Option<AuthUser>, client: &ClientInfo) -> nimbus_service::ShareActor {
    match auth {
        Some(user) => user.actor(),
        None => client.actor(),
    }
}

/// GET /api/s/{token}, view shared file metadata
pub async fn view_shared(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Query(query): Query<ShareAccessQuery>,
    auth: Option<AuthUser>,
    client: ClientInfo,
) -> Result<Json<ApiResponse<SharedFileResponse>>, ApiError> {
    let actor = actor_for(&auth, &client);
    let (share, grant) = state
        .access_service
        .authorize(
            &token,
            query.password.as_deref(),
            SharePermission::View,
            &actor,
        )
        .await??;

    let meta = state.file_service.get_shared(grant.file_id).await?;
    let response = SharedFileResponse::new(&meta, grant.permission);

    state
        .access_service
        .record_access(share.id, &actor, SharePermission::View)
        .await;

    Ok(Json(ApiResponse::ok(response)))
}

/// GET /api/s/{token}/download, download shared file bytes
pub async fn download_shared(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Query(query): Query<ShareAccessQuery>,
    auth: Option<AuthUser>,
    client: ClientInfo,
) -> Result<Response, ApiError> {
    let actor = actor_for(&auth, &client);
    let (share, grant) = state
        .access_service
        .authorize(
            &token,
            query.password.as_deref(),
            SharePermission::Download,
            &actor,
        )
        .await??;

    let download = state.file_service.download_shared(grant.file_id).await?;
    let response = stream_download(download)?;

    // The blob is open and handed to the response body; count the access.
    state
        .access_service
        .record_access(share.id, &actor, SharePermission::Download)
        .await;

    Ok(response)
}
