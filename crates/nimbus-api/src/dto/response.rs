//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use nimbus_entity::file::model::FileMeta;
use nimbus_entity::share::model::Share;
use nimbus_entity::share::permission::SharePermission;
use nimbus_entity::user::model::User;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// User summary for responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// User ID.
    pub id: Uuid,
    /// Email address.
    pub email: String,
    /// Display name.
    pub display_name: Option<String>,
    /// Account creation time.
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
            created_at: user.created_at,
        }
    }
}

/// Login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Access token.
    pub access_token: String,
    /// Access token expiration.
    pub expires_at: DateTime<Utc>,
    /// User info.
    pub user: UserResponse,
}

/// Share details for the owner. Includes the token; only the owner ever
/// sees share records through this type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareResponse {
    /// Share ID.
    pub id: Uuid,
    /// Shared file ID.
    pub file_id: Uuid,
    /// Opaque access token.
    pub token: String,
    /// Recipient email, if not public.
    pub shared_with: Option<String>,
    /// Public flag.
    pub is_public: bool,
    /// Granted permission level.
    pub permission: SharePermission,
    /// Whether the share requires a password.
    pub password_protected: bool,
    /// Whether the share is active.
    pub is_active: bool,
    /// Expiry instant, if any.
    pub expires_at: Option<DateTime<Utc>>,
    /// Successful access count.
    pub access_count: i64,
    /// Last successful access.
    pub last_accessed_at: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl From<Share> for ShareResponse {
    fn from(share: Share) -> Self {
        Self {
            id: share.id,
            file_id: share.file_id,
            token: share.token.clone(),
            shared_with: share.shared_with.clone(),
            is_public: share.is_public,
            permission: share.permission,
            password_protected: share.is_password_protected(),
            is_active: share.is_active,
            expires_at: share.expires_at,
            access_count: share.access_count,
            last_accessed_at: share.last_accessed_at,
            created_at: share.created_at,
        }
    }
}

/// What an anonymous visitor sees on a valid share link: the file's
/// metadata and the granted level, never the share's internals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedFileResponse {
    /// File name.
    pub name: String,
    /// MIME type.
    pub mime_type: Option<String>,
    /// File size in bytes.
    pub size_bytes: i64,
    /// Granted permission level.
    pub permission: SharePermission,
    /// Whether the visitor may download the bytes.
    pub downloadable: bool,
}

impl SharedFileResponse {
    /// Build the public view of a shared file.
    pub fn new(meta: &FileMeta, permission: SharePermission) -> Self {
        Self {
            name: meta.name.clone(),
            mime_type: meta.mime_type.clone(),
            size_bytes: meta.size_bytes,
            permission,
            downloadable: permission.covers(SharePermission::Download),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Database connectivity.
    pub database: String,
}
