//! Share access log repository implementation.
//!
//! The log is append-only: this repository exposes insert and read
//! operations, nothing that mutates or deletes existing rows.

use sqlx::PgPool;
use uuid::Uuid;

use nimbus_core::result::AppResult;
use nimbus_core::types::pagination::{PageRequest, PageResponse};
use nimbus_entity::share::access_log::{CreateShareAccessLog, ShareAccessLog};

use super::map_sqlx_error;

/// Repository for share access log entries.
#[derive(Debug, Clone)]
pub struct AccessLogRepository {
    pool: PgPool,
}

impl AccessLogRepository {
    /// Create a new access log repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append one access log entry.
    pub async fn create(&self, data: &CreateShareAccessLog) -> AppResult<ShareAccessLog> {
        sqlx::query_as::<_, ShareAccessLog>(
            "INSERT INTO share_access_log \
             (share_id, accessed_by, ip_address, user_agent, action, success, failure_reason) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(data.share_id)
        .bind(&data.accessed_by)
        .bind(&data.ip_address)
        .bind(&data.user_agent)
        .bind(data.action)
        .bind(data.success)
        .bind(&data.failure_reason)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to append access log entry", e))
    }

    /// List log entries for a share, newest first.
    pub async fn find_by_share(
        &self,
        share_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ShareAccessLog>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM share_access_log WHERE share_id = $1")
                .bind(share_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("Failed to count access log entries", e))?;

        let entries = sqlx::query_as::<_, ShareAccessLog>(
            "SELECT * FROM share_access_log WHERE share_id = $1 \
             ORDER BY accessed_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(share_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to list access log entries", e))?;

        Ok(PageResponse::new(
            entries,
            page.page,
            page.page_size,
            total as u64,
        ))
    }
}
