//! Owner-facing share management: create, list, inspect, and revoke.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use nimbus_auth::password::PasswordHasher;
use nimbus_core::error::{AppError, ErrorKind};
use nimbus_core::result::AppResult;
use nimbus_core::types::pagination::{PageRequest, PageResponse};
use nimbus_entity::share::access_log::ShareAccessLog;
use nimbus_entity::share::model::{CreateShare, Share};
use nimbus_entity::share::permission::SharePermission;

use super::audit::AccessLogger;
use super::store::{FileLookup, ShareStore};
use super::token::TokenGenerator;

/// Attempts at inserting a freshly generated token before giving up.
/// A collision on 256-bit tokens means the random source is broken, so
/// one retry is already generous.
const TOKEN_INSERT_ATTEMPTS: usize = 3;

/// Parameters for creating a share.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateShareInput {
    /// The file to share.
    pub file_id: Uuid,
    /// Recipient email, or `None` for a public link.
    pub shared_with: Option<String>,
    /// Whether anyone holding the link may access.
    pub is_public: bool,
    /// Granted permission level.
    pub permission: SharePermission,
    /// Optional share password, hashed before storage.
    pub password: Option<String>,
    /// Optional expiry instant. Must lie in the future.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Manages the lifecycle of shares on behalf of their owners.
#[derive(Clone)]
pub struct ShareService {
    shares: Arc<dyn ShareStore>,
    files: Arc<dyn FileLookup>,
    logger: AccessLogger,
    tokens: TokenGenerator,
    hasher: Arc<PasswordHasher>,
}

impl ShareService {
    /// Creates a new share service.
    pub fn new(
        shares: Arc<dyn ShareStore>,
        files: Arc<dyn FileLookup>,
        logger: AccessLogger,
        tokens: TokenGenerator,
        hasher: Arc<PasswordHasher>,
    ) -> Self {
        Self {
            shares,
            files,
            logger,
            tokens,
            hasher,
        }
    }

    /// Create a share for a file the owner must actually own.
    pub async fn create_share(&self, owner_id: Uuid, input: CreateShareInput) -> AppResult<Share> {
        let file = self
            .files
            .find_file(input.file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;
        if file.owner_id != owner_id {
            return Err(AppError::authorization("Only the file owner can share it"));
        }

        if let Some(expires_at) = input.expires_at {
            if expires_at <= Utc::now() {
                return Err(AppError::validation("Share expiry must be in the future"));
            }
        }

        let password_hash = match input.password.as_deref() {
            Some("") => return Err(AppError::validation("Share password must not be empty")),
            Some(password) => Some(self.hasher.hash_password(password)?),
            None => None,
        };

        // The unique index on the token column is the backstop against the
        // astronomically unlikely collision; retry with a fresh token.
        let mut last_conflict = None;
        for _ in 0..TOKEN_INSERT_ATTEMPTS {
            let data = CreateShare {
                file_id: input.file_id,
                owner_id,
                token: self.tokens.generate(),
                shared_with: input.shared_with.clone(),
                is_public: input.is_public,
                permission: input.permission,
                password_hash: password_hash.clone(),
                expires_at: input.expires_at,
            };
            match self.shares.create(&data).await {
                Ok(share) => {
                    info!(
                        share_id = %share.id,
                        file_id = %share.file_id,
                        permission = %share.permission,
                        "Share created"
                    );
                    return Ok(share);
                }
                Err(e) if e.kind == ErrorKind::Conflict => last_conflict = Some(e),
                Err(e) => return Err(e),
            }
        }
        Err(last_conflict
            .unwrap_or_else(|| AppError::internal("Share creation retry loop never ran")))
    }

    /// List shares created by the owner.
    pub async fn list_shares(
        &self,
        owner_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Share>> {
        self.shares.find_by_owner(owner_id, page).await
    }

    /// Fetch one share, visible only to its owner.
    pub async fn get_share(&self, owner_id: Uuid, share_id: Uuid) -> AppResult<Share> {
        let share = self.owned_share(owner_id, share_id).await?;
        Ok(share)
    }

    /// Revoke a share. Terminal and idempotent; revoking an already
    /// revoked share succeeds without effect.
    pub async fn revoke_share(&self, owner_id: Uuid, share_id: Uuid) -> AppResult<()> {
        self.shares.deactivate(share_id, owner_id).await?;
        info!(share_id = %share_id, "Share revoked");
        Ok(())
    }

    /// List the audit trail of a share, visible only to its owner.
    /// Works for revoked shares; the trail outlives the share's validity.
    pub async fn list_access_logs(
        &self,
        owner_id: Uuid,
        share_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ShareAccessLog>> {
        self.owned_share(owner_id, share_id).await?;
        self.logger.list(share_id, page).await
    }

    async fn owned_share(&self, owner_id: Uuid, share_id: Uuid) -> AppResult<Share> {
        let share = self
            .shares
            .find_by_id(share_id)
            .await?
            .ok_or_else(|| AppError::not_found("Share not found"))?;
        if share.owner_id != owner_id {
            return Err(AppError::authorization("Only the share owner can view it"));
        }
        Ok(share)
    }
}

impl std::fmt::Debug for ShareService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShareService").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Duration;

    use crate::share::testing::{active_share, owned_file, MemoryFileStore, MemoryLogStore, MemoryShareStore};
    use crate::share::{AccessLogger, ShareActor};

    /// Store double whose first `conflicts` inserts hit the unique token
    /// index, as if every generated token were already taken.
    struct CollidingShareStore {
        inner: MemoryShareStore,
        conflicts_left: Mutex<usize>,
        attempts: Mutex<usize>,
    }

    impl CollidingShareStore {
        fn new(conflicts: usize) -> Self {
            Self {
                inner: MemoryShareStore::default(),
                conflicts_left: Mutex::new(conflicts),
                attempts: Mutex::new(0),
            }
        }

        fn attempts(&self) -> usize {
            *self.attempts.lock().unwrap()
        }
    }

    #[async_trait]
    impl ShareStore for CollidingShareStore {
        async fn create(&self, data: &CreateShare) -> AppResult<Share> {
            *self.attempts.lock().unwrap() += 1;
            {
                let mut left = self.conflicts_left.lock().unwrap();
                if *left > 0 {
                    *left -= 1;
                    return Err(AppError::conflict("Share token already exists"));
                }
            }
            self.inner.create(data).await
        }

        async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Share>> {
            self.inner.find_by_id(id).await
        }

        async fn find_by_token(&self, token: &str) -> AppResult<Option<Share>> {
            self.inner.find_by_token(token).await
        }

        async fn find_by_owner(
            &self,
            owner_id: Uuid,
            page: &PageRequest,
        ) -> AppResult<PageResponse<Share>> {
            self.inner.find_by_owner(owner_id, page).await
        }

        async fn increment_access(&self, share_id: Uuid) -> AppResult<i64> {
            self.inner.increment_access(share_id).await
        }

        async fn deactivate(&self, share_id: Uuid, owner_id: Uuid) -> AppResult<()> {
            self.inner.deactivate(share_id, owner_id).await
        }
    }

    fn service_with(shares: Arc<CollidingShareStore>, files: Arc<MemoryFileStore>) -> ShareService {
        ShareService::new(
            shares,
            files,
            AccessLogger::new(Arc::new(MemoryLogStore::default())),
            TokenGenerator::new(),
            Arc::new(PasswordHasher::new()),
        )
    }

    struct Fixture {
        shares: Arc<MemoryShareStore>,
        files: Arc<MemoryFileStore>,
        logger: AccessLogger,
        service: ShareService,
    }

    fn fixture() -> Fixture {
        let shares = Arc::new(MemoryShareStore::default());
        let files = Arc::new(MemoryFileStore::default());
        let logs = Arc::new(MemoryLogStore::default());
        let logger = AccessLogger::new(logs);
        let service = ShareService::new(
            shares.clone(),
            files.clone(),
            logger.clone(),
            TokenGenerator::new(),
            Arc::new(PasswordHasher::new()),
        );
        Fixture {
            shares,
            files,
            logger,
            service,
        }
    }

    fn input(file_id: Uuid) -> CreateShareInput {
        CreateShareInput {
            file_id,
            shared_with: None,
            is_public: true,
            permission: SharePermission::View,
            password: None,
            expires_at: None,
        }
    }

    #[tokio::test]
    async fn test_create_share_for_owned_file() {
        let fx = fixture();
        let owner = Uuid::new_v4();
        let file = owned_file(owner);
        fx.files.insert(file.clone());

        let share = fx.service.create_share(owner, input(file.id)).await.unwrap();
        assert_eq!(share.file_id, file.id);
        assert_eq!(share.owner_id, owner);
        assert_eq!(share.token.len(), 64);
        assert!(share.is_active);
        assert_eq!(share.access_count, 0);
    }

    #[tokio::test]
    async fn test_create_share_retries_on_token_conflict() {
        let shares = Arc::new(CollidingShareStore::new(TOKEN_INSERT_ATTEMPTS - 1));
        let files = Arc::new(MemoryFileStore::default());
        let service = service_with(shares.clone(), files.clone());
        let owner = Uuid::new_v4();
        let file = owned_file(owner);
        files.insert(file.clone());

        let share = service.create_share(owner, input(file.id)).await.unwrap();
        assert_eq!(share.file_id, file.id);
        assert_eq!(shares.attempts(), TOKEN_INSERT_ATTEMPTS);
    }

    #[tokio::test]
    async fn test_create_share_gives_up_when_conflicts_persist() {
        let shares = Arc::new(CollidingShareStore::new(usize::MAX));
        let files = Arc::new(MemoryFileStore::default());
        let service = service_with(shares.clone(), files.clone());
        let owner = Uuid::new_v4();
        let file = owned_file(owner);
        files.insert(file.clone());

        let err = service.create_share(owner, input(file.id)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(shares.attempts(), TOKEN_INSERT_ATTEMPTS);
    }

    #[tokio::test]
    async fn test_create_share_rejects_foreign_file() {
        let fx = fixture();
        let file = owned_file(Uuid::new_v4());
        fx.files.insert(file.clone());

        let err = fx
            .service
            .create_share(Uuid::new_v4(), input(file.id))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
    }

    #[tokio::test]
    async fn test_create_share_rejects_missing_file() {
        let fx = fixture();
        let err = fx
            .service
            .create_share(Uuid::new_v4(), input(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_create_share_rejects_past_expiry() {
        let fx = fixture();
        let owner = Uuid::new_v4();
        let file = owned_file(owner);
        fx.files.insert(file.clone());

        let mut bad = input(file.id);
        bad.expires_at = Some(Utc::now() - Duration::minutes(1));
        let err = fx.service.create_share(owner, bad).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_create_share_hashes_password() {
        let fx = fixture();
        let owner = Uuid::new_v4();
        let file = owned_file(owner);
        fx.files.insert(file.clone());

        let mut gated = input(file.id);
        gated.password = Some("open-sesame".to_string());
        let share = fx.service.create_share(owner, gated).await.unwrap();

        let hash = share.password_hash.unwrap();
        assert_ne!(hash, "open-sesame");
        assert!(PasswordHasher::new()
            .verify_password("open-sesame", &hash)
            .unwrap());
    }

    #[tokio::test]
    async fn test_create_share_rejects_empty_password() {
        let fx = fixture();
        let owner = Uuid::new_v4();
        let file = owned_file(owner);
        fx.files.insert(file.clone());

        let mut gated = input(file.id);
        gated.password = Some(String::new());
        let err = fx.service.create_share(owner, gated).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_revoke_is_owner_only_and_idempotent() {
        let fx = fixture();
        let mut share = active_share(SharePermission::View);
        let owner = share.owner_id;
        share.access_count = 7;
        fx.shares.insert(share.clone());

        let err = fx
            .service
            .revoke_share(Uuid::new_v4(), share.id)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
        assert!(fx.shares.get(share.id).unwrap().is_active);

        fx.service.revoke_share(owner, share.id).await.unwrap();
        let revoked = fx.shares.get(share.id).unwrap();
        assert!(!revoked.is_active);
        // revocation touches nothing but the active flag
        assert_eq!(revoked.access_count, 7);

        // second revocation is a no-op, not an error
        fx.service.revoke_share(owner, share.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_access_logs_are_owner_only() {
        let fx = fixture();
        let share = active_share(SharePermission::View);
        fx.shares.insert(share.clone());
        fx.logger
            .log_success(share.id, &ShareActor::default(), SharePermission::View)
            .await;

        let page = PageRequest::default();
        let err = fx
            .service
            .list_access_logs(Uuid::new_v4(), share.id, &page)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);

        let logs = fx
            .service
            .list_access_logs(share.owner_id, share.id, &page)
            .await
            .unwrap();
        assert_eq!(logs.total_items, 1);
    }

    #[tokio::test]
    async fn test_access_logs_survive_revocation() {
        let fx = fixture();
        let share = active_share(SharePermission::View);
        fx.shares.insert(share.clone());
        fx.logger
            .log_success(share.id, &ShareActor::default(), SharePermission::View)
            .await;

        fx.service.revoke_share(share.owner_id, share.id).await.unwrap();

        let logs = fx
            .service
            .list_access_logs(share.owner_id, share.id, &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(logs.total_items, 1);
    }
}
