//! File handlers: list, upload, metadata, download, delete.

use axum::Json;
use axum::body::Body;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use uuid::Uuid;

use nimbus_core::error::AppError;
use nimbus_core::types::pagination::PageResponse;
use nimbus_entity::file::model::FileMeta;
use nimbus_service::{FileDownload, UploadInput};

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// GET /api/files
pub async fn list_files(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<FileMeta>>>, ApiError> {
    let page = state
        .file_service
        .list(auth.user_id, &params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// POST /api/files/upload (multipart)
pub async fn upload_file(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<FileMeta>>), ApiError> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Invalid multipart body: {e}")))?
        .ok_or_else(|| AppError::validation("Missing file field"))?;

    let name = field
        .file_name()
        .map(String::from)
        .ok_or_else(|| AppError::validation("Missing file name"))?;
    let mime_type = field.content_type().map(String::from);
    let data = field
        .bytes()
        .await
        .map_err(|e| AppError::validation(format!("Failed to read upload: {e}")))?;

    let meta = state
        .file_service
        .upload(
            auth.user_id,
            UploadInput {
                name,
                mime_type,
                data,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(meta))))
}

/// GET /api/files/{id}
pub async fn get_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<FileMeta>>, ApiError> {
    let meta = state.file_service.get_owned(auth.user_id, id).await?;
    Ok(Json(ApiResponse::ok(meta)))
}

/// GET /api/files/{id}/download
pub async fn download_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let download = state.file_service.download_owned(auth.user_id, id).await?;
    Ok(stream_download(download)?)
}

/// DELETE /api/files/{id}
pub async fn delete_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    state.file_service.delete(auth.user_id, id).await?;
    Ok(Json(ApiResponse::ok(
        serde_json::json!({ "message": "File deleted" }),
    )))
}

/// Build a streaming attachment response from an opened download.
pub(crate) fn stream_download(download: FileDownload) -> Result<Response, AppError> {
    let content_type = download
        .meta
        .mime_type
        .as_deref()
        .unwrap_or("application/octet-stream")
        .to_string();

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", download.meta.name),
        )
        .header(header::CONTENT_LENGTH, download.meta.size_bytes)
        .body(Body::from_stream(download.stream))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))
}
