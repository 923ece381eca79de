//! In-memory store implementations backing the service unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use nimbus_core::error::AppError;
use nimbus_core::result::AppResult;
use nimbus_core::types::pagination::{PageRequest, PageResponse};
use nimbus_entity::file::model::FileMeta;
use nimbus_entity::share::access_log::{CreateShareAccessLog, ShareAccessLog};
use nimbus_entity::share::model::{CreateShare, Share};

use super::store::{AccessLogStore, FileLookup, ShareStore};

#[derive(Default)]
pub(crate) struct MemoryShareStore {
    shares: Mutex<HashMap<Uuid, Share>>,
}

impl MemoryShareStore {
    pub(crate) fn insert(&self, share: Share) {
        self.shares.lock().unwrap().insert(share.id, share);
    }

    pub(crate) fn get(&self, id: Uuid) -> Option<Share> {
        self.shares.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl ShareStore for MemoryShareStore {
    async fn create(&self, data: &CreateShare) -> AppResult<Share> {
        let mut shares = self.shares.lock().unwrap();
        if shares.values().any(|s| s.token == data.token) {
            return Err(AppError::conflict("Share token already exists"));
        }
        let now = Utc::now();
        let share = Share {
            id: Uuid::new_v4(),
            file_id: data.file_id,
            owner_id: data.owner_id,
            token: data.token.clone(),
            shared_with: data.shared_with.clone(),
            is_public: data.is_public,
            permission: data.permission,
            password_hash: data.password_hash.clone(),
            is_active: true,
            expires_at: data.expires_at,
            access_count: 0,
            last_accessed_at: None,
            created_at: now,
            updated_at: now,
        };
        shares.insert(share.id, share.clone());
        Ok(share)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Share>> {
        Ok(self.shares.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<Share>> {
        Ok(self
            .shares
            .lock()
            .unwrap()
            .values()
            .find(|s| s.token == token)
            .cloned())
    }

    async fn find_by_owner(
        &self,
        owner_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Share>> {
        let items: Vec<Share> = self
            .shares
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.owner_id == owner_id)
            .cloned()
            .collect();
        let total = items.len() as u64;
        Ok(PageResponse::new(items, page.page, page.page_size, total))
    }

    async fn increment_access(&self, share_id: Uuid) -> AppResult<i64> {
        let mut shares = self.shares.lock().unwrap();
        let share = shares
            .get_mut(&share_id)
            .ok_or_else(|| AppError::not_found("Share not found"))?;
        share.access_count += 1;
        share.last_accessed_at = Some(Utc::now());
        Ok(share.access_count)
    }

    async fn deactivate(&self, share_id: Uuid, owner_id: Uuid) -> AppResult<()> {
        let mut shares = self.shares.lock().unwrap();
        let share = shares
            .get_mut(&share_id)
            .ok_or_else(|| AppError::not_found("Share not found"))?;
        if share.owner_id != owner_id {
            return Err(AppError::authorization("Only the share owner can revoke it"));
        }
        share.is_active = false;
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct MemoryLogStore {
    entries: Mutex<Vec<ShareAccessLog>>,
}

impl MemoryLogStore {
    pub(crate) fn entries(&self) -> Vec<ShareAccessLog> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl AccessLogStore for MemoryLogStore {
    async fn append(&self, entry: &CreateShareAccessLog) -> AppResult<ShareAccessLog> {
        let log = ShareAccessLog {
            id: Uuid::new_v4(),
            share_id: entry.share_id,
            accessed_by: entry.accessed_by.clone(),
            ip_address: entry.ip_address.clone(),
            user_agent: entry.user_agent.clone(),
            action: entry.action,
            success: entry.success,
            failure_reason: entry.failure_reason.clone(),
            accessed_at: Utc::now(),
        };
        self.entries.lock().unwrap().push(log.clone());
        Ok(log)
    }

    async fn find_by_share(
        &self,
        share_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ShareAccessLog>> {
        let mut items: Vec<ShareAccessLog> = self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.share_id == share_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.accessed_at.cmp(&a.accessed_at));
        let total = items.len() as u64;
        Ok(PageResponse::new(items, page.page, page.page_size, total))
    }
}

#[derive(Default)]
pub(crate) struct MemoryFileStore {
    files: Mutex<HashMap<Uuid, FileMeta>>,
}

impl MemoryFileStore {
    pub(crate) fn insert(&self, file: FileMeta) {
        self.files.lock().unwrap().insert(file.id, file);
    }
}

#[async_trait]
impl FileLookup for MemoryFileStore {
    async fn find_file(&self, id: Uuid) -> AppResult<Option<FileMeta>> {
        Ok(self.files.lock().unwrap().get(&id).cloned())
    }
}

/// A plain active public share for test setups.
pub(crate) fn active_share(permission: nimbus_entity::share::permission::SharePermission) -> Share {
    let now = Utc::now();
    Share {
        id: Uuid::new_v4(),
        file_id: Uuid::new_v4(),
        owner_id: Uuid::new_v4(),
        token: Uuid::new_v4().simple().to_string(),
        shared_with: None,
        is_public: true,
        permission,
        password_hash: None,
        is_active: true,
        expires_at: None,
        access_count: 0,
        last_accessed_at: None,
        created_at: now,
        updated_at: now,
    }
}

/// A file metadata row owned by `owner_id`.
pub(crate) fn owned_file(owner_id: Uuid) -> FileMeta {
    let now = Utc::now();
    FileMeta {
        id: Uuid::new_v4(),
        owner_id,
        name: "report.pdf".to_string(),
        storage_path: "ab/cd/test.pdf".to_string(),
        mime_type: Some("application/pdf".to_string()),
        size_bytes: 1024,
        created_at: now,
        updated_at: now,
    }
}
