//! File metadata repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use nimbus_core::result::AppResult;
use nimbus_core::types::pagination::{PageRequest, PageResponse};
use nimbus_entity::file::model::{CreateFileMeta, FileMeta};

use super::map_sqlx_error;

/// Repository for file metadata records.
#[derive(Debug, Clone)]
pub struct FileRepository {
    pool: PgPool,
}

impl FileRepository {
    /// Create a new file repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a file by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<FileMeta>> {
        sqlx::query_as::<_, FileMeta>("SELECT * FROM files WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to find file", e))
    }

    /// List files owned by a user.
    pub async fn find_by_owner(
        &self,
        owner_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<FileMeta>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM files WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to count files", e))?;

        let files = sqlx::query_as::<_, FileMeta>(
            "SELECT * FROM files WHERE owner_id = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(owner_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to list files", e))?;

        Ok(PageResponse::new(
            files,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Create a new file metadata record.
    pub async fn create(&self, data: &CreateFileMeta) -> AppResult<FileMeta> {
        sqlx::query_as::<_, FileMeta>(
            "INSERT INTO files (owner_id, name, storage_path, mime_type, size_bytes) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(data.owner_id)
        .bind(&data.name)
        .bind(&data.storage_path)
        .bind(&data.mime_type)
        .bind(data.size_bytes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to create file record", e))
    }

    /// Delete a file metadata record. Returns `true` if a row was removed.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to delete file record", e))?;
        Ok(result.rows_affected() > 0)
    }
}
