//! File metadata entity model.
//!
//! The metadata record exclusively owns the reference to the stored bytes;
//! shares reference the file by id but never own it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Metadata for a file stored in Nimbus.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FileMeta {
    /// Unique file identifier.
    pub id: Uuid,
    /// The file owner.
    pub owner_id: Uuid,
    /// Original file name (including extension).
    pub name: String,
    /// Path of the blob within the storage root.
    pub storage_path: String,
    /// MIME type of the file.
    pub mime_type: Option<String>,
    /// File size in bytes.
    pub size_bytes: i64,
    /// When the file was uploaded.
    pub created_at: DateTime<Utc>,
    /// When the metadata was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new file metadata record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFileMeta {
    /// The file owner.
    pub owner_id: Uuid,
    /// Original file name.
    pub name: String,
    /// Path of the blob within the storage root.
    pub storage_path: String,
    /// MIME type.
    pub mime_type: Option<String>,
    /// File size in bytes.
    pub size_bytes: i64,
}
