//! Store traits consumed by the share access pipeline.
//!
//! The persistence layer is a collaborator of the access-control logic, not
//! part of it. These traits pin down exactly what the pipeline needs so the
//! decision path can be exercised without a database; the Postgres
//! repositories are the production implementations.

use async_trait::async_trait;
use uuid::Uuid;

use nimbus_core::result::AppResult;
use nimbus_core::types::pagination::{PageRequest, PageResponse};
use nimbus_database::repositories::access_log::AccessLogRepository;
use nimbus_database::repositories::file::FileRepository;
use nimbus_database::repositories::share::ShareRepository;
use nimbus_entity::file::model::FileMeta;
use nimbus_entity::share::access_log::{CreateShareAccessLog, ShareAccessLog};
use nimbus_entity::share::model::{CreateShare, Share};

/// Persistent store for share records.
#[async_trait]
pub trait ShareStore: Send + Sync + 'static {
    /// Persist a new share. Must fail with a conflict on duplicate tokens.
    async fn create(&self, data: &CreateShare) -> AppResult<Share>;

    /// Find a share by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Share>>;

    /// Find a share by token, regardless of active/expiry state.
    async fn find_by_token(&self, token: &str) -> AppResult<Option<Share>>;

    /// List shares created by a user.
    async fn find_by_owner(
        &self,
        owner_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Share>>;

    /// Atomically increment the access counter and stamp the access time.
    async fn increment_access(&self, share_id: Uuid) -> AppResult<i64>;

    /// Set `is_active = false` on behalf of the owner. Idempotent;
    /// fails with an authorization error for non-owners.
    async fn deactivate(&self, share_id: Uuid, owner_id: Uuid) -> AppResult<()>;
}

/// Append-only store for share access log entries.
#[async_trait]
pub trait AccessLogStore: Send + Sync + 'static {
    /// Append one immutable entry.
    async fn append(&self, entry: &CreateShareAccessLog) -> AppResult<ShareAccessLog>;

    /// List entries for a share, newest first.
    async fn find_by_share(
        &self,
        share_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ShareAccessLog>>;
}

/// Resolve file metadata for share creation ownership checks.
#[async_trait]
pub trait FileLookup: Send + Sync + 'static {
    /// Find a file by ID.
    async fn find_file(&self, id: Uuid) -> AppResult<Option<FileMeta>>;
}

#[async_trait]
impl ShareStore for ShareRepository {
    async fn create(&self, data: &CreateShare) -> AppResult<Share> {
        ShareRepository::create(self, data).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Share>> {
        ShareRepository::find_by_id(self, id).await
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<Share>> {
        ShareRepository::find_by_token(self, token).await
    }

    async fn find_by_owner(
        &self,
        owner_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Share>> {
        ShareRepository::find_by_owner(self, owner_id, page).await
    }

    async fn increment_access(&self, share_id: Uuid) -> AppResult<i64> {
        ShareRepository::increment_access(self, share_id).await
    }

    async fn deactivate(&self, share_id: Uuid, owner_id: Uuid) -> AppResult<()> {
        ShareRepository::deactivate(self, share_id, owner_id).await
    }
}

#[async_trait]
impl FileLookup for FileRepository {
    async fn find_file(&self, id: Uuid) -> AppResult<Option<FileMeta>> {
        FileRepository::find_by_id(self, id).await
    }
}

#[async_trait]
impl AccessLogStore for AccessLogRepository {
    async fn append(&self, entry: &CreateShareAccessLog) -> AppResult<ShareAccessLog> {
        AccessLogRepository::create(self, entry).await
    }

    async fn find_by_share(
        &self,
        share_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ShareAccessLog>> {
        AccessLogRepository::find_by_share(self, share_id, page).await
    }
}
