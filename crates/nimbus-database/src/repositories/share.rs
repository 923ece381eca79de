//! Share repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use nimbus_core::error::AppError;
use nimbus_core::result::AppResult;
use nimbus_core::types::pagination::{PageRequest, PageResponse};
use nimbus_entity::share::model::{CreateShare, Share};

use super::map_sqlx_error;

/// Repository for share CRUD, token lookup, and counter operations.
#[derive(Debug, Clone)]
pub struct ShareRepository {
    pool: PgPool,
}

impl ShareRepository {
    /// Create a new share repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a share by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Share>> {
        sqlx::query_as::<_, Share>("SELECT * FROM shares WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to find share", e))
    }

    /// Find a share by token, regardless of its active/expiry state.
    ///
    /// Interpreting `is_active` and `expires_at` is the access evaluator's
    /// job; filtering here would scatter that policy across layers.
    pub async fn find_by_token(&self, token: &str) -> AppResult<Option<Share>> {
        sqlx::query_as::<_, Share>("SELECT * FROM shares WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to find share by token", e))
    }

    /// List shares created by a user.
    pub async fn find_by_owner(
        &self,
        owner_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Share>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shares WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to count shares", e))?;

        let shares = sqlx::query_as::<_, Share>(
            "SELECT * FROM shares WHERE owner_id = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(owner_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to list shares", e))?;

        Ok(PageResponse::new(
            shares,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Create a new share.
    ///
    /// Fails with a conflict when the token already exists. The token
    /// generator makes this effectively impossible, but the unique index is
    /// the backstop and must be surfaced distinctly.
    pub async fn create(&self, data: &CreateShare) -> AppResult<Share> {
        sqlx::query_as::<_, Share>(
            "INSERT INTO shares (file_id, owner_id, token, shared_with, is_public, permission, \
             password_hash, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(data.file_id)
        .bind(data.owner_id)
        .bind(&data.token)
        .bind(&data.shared_with)
        .bind(data.is_public)
        .bind(data.permission)
        .bind(&data.password_hash)
        .bind(data.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.is_unique_violation() {
                    return AppError::conflict("Share token already exists");
                }
            }
            map_sqlx_error("Failed to create share", e)
        })
    }

    /// Atomically increment the access counter and stamp the access time.
    ///
    /// A single UPDATE so that concurrent successful accesses never lose
    /// updates; callers must not read-modify-write.
    pub async fn increment_access(&self, share_id: Uuid) -> AppResult<i64> {
        let row: (i64,) = sqlx::query_as(
            "UPDATE shares SET access_count = access_count + 1, last_accessed_at = NOW(), \
             updated_at = NOW() WHERE id = $1 RETURNING access_count",
        )
        .bind(share_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to increment access count", e))?;
        Ok(row.0)
    }

    /// Deactivate a share on behalf of its owner. Idempotent and terminal:
    /// there is no operation anywhere that sets `is_active` back to true.
    ///
    /// Fails with an authorization error when the requester is not the
    /// share's owner.
    pub async fn deactivate(&self, share_id: Uuid, owner_id: Uuid) -> AppResult<()> {
        let share = self
            .find_by_id(share_id)
            .await?
            .ok_or_else(|| AppError::not_found("Share not found"))?;

        if share.owner_id != owner_id {
            return Err(AppError::authorization(
                "Only the share owner can revoke it",
            ));
        }

        sqlx::query("UPDATE shares SET is_active = FALSE, updated_at = NOW() WHERE id = $1")
            .bind(share_id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to deactivate share", e))?;

        Ok(())
    }
}
