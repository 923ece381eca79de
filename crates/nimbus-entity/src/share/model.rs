//! Share entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::permission::SharePermission;

/// A share granting bounded access to one file, addressed by an opaque token.
///
/// A share is created by an authenticated owner, mutated only by access
/// counters or revocation, and never hard-deleted (the audit trail must
/// survive revocation). Revocation is terminal; a disabled share can never
/// be reactivated.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Share {
    /// Unique share identifier.
    pub id: Uuid,
    /// The shared file.
    pub file_id: Uuid,
    /// User who created the share.
    pub owner_id: Uuid,
    /// Opaque unguessable token, the external handle. Immutable.
    pub token: String,
    /// Recipient email, or `None` for a public share.
    pub shared_with: Option<String>,
    /// Whether anyone with the token (and password, if set) may access.
    pub is_public: bool,
    /// Permission level granted.
    pub permission: SharePermission,
    /// Argon2 hash of the share password, if the share is password-gated.
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    /// Whether the share is active. Once false, never true again.
    pub is_active: bool,
    /// Past this instant the share is treated as inactive.
    pub expires_at: Option<DateTime<Utc>>,
    /// Number of successful accesses. Only ever increases.
    pub access_count: i64,
    /// Last successful access time.
    pub last_accessed_at: Option<DateTime<Utc>>,
    /// When the share was created.
    pub created_at: DateTime<Utc>,
    /// When the share was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Share {
    /// Whether the share requires a password.
    pub fn is_password_protected(&self) -> bool {
        self.password_hash.is_some()
    }

    /// Whether the share has passed its expiry instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires| expires <= now)
    }
}

/// Data required to create a new share.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateShare {
    /// The file being shared.
    pub file_id: Uuid,
    /// User creating the share.
    pub owner_id: Uuid,
    /// Generated share token.
    pub token: String,
    /// Recipient email (None for public shares).
    pub shared_with: Option<String>,
    /// Public flag.
    pub is_public: bool,
    /// Permission level.
    pub permission: SharePermission,
    /// Password hash (None = no password gate).
    pub password_hash: Option<String>,
    /// Expiry time (None = never).
    pub expires_at: Option<DateTime<Utc>>,
}
