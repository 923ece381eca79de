//! File service: metadata bookkeeping plus blob storage.
//!
//! The metadata row is authoritative. Uploads write the blob first and
//! insert the row second; if the insert fails, the orphaned blob is
//! removed. Downloads only ever start from a row.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};
use uuid::Uuid;

use nimbus_core::error::AppError;
use nimbus_core::result::AppResult;
use nimbus_core::types::pagination::{PageRequest, PageResponse};
use nimbus_database::repositories::file::FileRepository;
use nimbus_entity::file::model::{CreateFileMeta, FileMeta};
use nimbus_storage::local::{BlobStore, ByteStream};

/// Upload parameters.
#[derive(Debug, Clone)]
pub struct UploadInput {
    /// Original file name.
    pub name: String,
    /// MIME type, if the client declared one.
    pub mime_type: Option<String>,
    /// File contents.
    pub data: Bytes,
}

/// A file ready to be streamed to a client.
pub struct FileDownload {
    /// The file's metadata.
    pub meta: FileMeta,
    /// The blob contents.
    pub stream: ByteStream,
}

/// Manages file metadata and the backing blobs.
#[derive(Clone)]
pub struct FileService {
    files: FileRepository,
    blobs: Arc<BlobStore>,
}

impl FileService {
    /// Creates a new file service.
    pub fn new(files: FileRepository, blobs: Arc<BlobStore>) -> Self {
        Self { files, blobs }
    }

    /// Store an uploaded file for the given owner.
    pub async fn upload(&self, owner_id: Uuid, input: UploadInput) -> AppResult<FileMeta> {
        if input.name.trim().is_empty() {
            return Err(AppError::validation("File name must not be empty"));
        }

        let storage_path = self.blobs.allocate_path(&input.name);
        let size_bytes = input.data.len() as i64;
        self.blobs.write(&storage_path, input.data).await?;

        let created = self
            .files
            .create(&CreateFileMeta {
                owner_id,
                name: input.name,
                storage_path: storage_path.clone(),
                mime_type: input.mime_type,
                size_bytes,
            })
            .await;

        match created {
            Ok(meta) => {
                info!(file_id = %meta.id, size_bytes, "File uploaded");
                Ok(meta)
            }
            Err(e) => {
                if let Err(cleanup) = self.blobs.delete(&storage_path).await {
                    warn!(path = %storage_path, error = %cleanup, "Failed to remove orphaned blob");
                }
                Err(e)
            }
        }
    }

    /// List files owned by a user.
    pub async fn list(
        &self,
        owner_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<FileMeta>> {
        self.files.find_by_owner(owner_id, page).await
    }

    /// Fetch metadata for a file the caller owns.
    pub async fn get_owned(&self, owner_id: Uuid, file_id: Uuid) -> AppResult<FileMeta> {
        let meta = self.require(file_id).await?;
        if meta.owner_id != owner_id {
            return Err(AppError::authorization("Only the file owner can access it"));
        }
        Ok(meta)
    }

    /// Open a download for a file the caller owns.
    pub async fn download_owned(&self, owner_id: Uuid, file_id: Uuid) -> AppResult<FileDownload> {
        let meta = self.get_owned(owner_id, file_id).await?;
        self.open(meta).await
    }

    /// Open a download for a file resolved through a share grant. The
    /// caller has already passed the share access checks.
    pub async fn download_shared(&self, file_id: Uuid) -> AppResult<FileDownload> {
        let meta = self.require(file_id).await?;
        self.open(meta).await
    }

    /// Fetch metadata for a file resolved through a share grant.
    pub async fn get_shared(&self, file_id: Uuid) -> AppResult<FileMeta> {
        self.require(file_id).await
    }

    /// Delete a file and its blob. Owner only.
    pub async fn delete(&self, owner_id: Uuid, file_id: Uuid) -> AppResult<()> {
        let meta = self.get_owned(owner_id, file_id).await?;
        self.files.delete(meta.id).await?;
        self.blobs.delete(&meta.storage_path).await?;
        info!(file_id = %meta.id, "File deleted");
        Ok(())
    }

    async fn require(&self, file_id: Uuid) -> AppResult<FileMeta> {
        self.files
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))
    }

    async fn open(&self, meta: FileMeta) -> AppResult<FileDownload> {
        let stream = self.blobs.read(&meta.storage_path).await?;
        Ok(FileDownload { meta, stream })
    }
}

impl std::fmt::Debug for FileService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileService").finish_non_exhaustive()
    }
}
