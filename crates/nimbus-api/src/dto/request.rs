//! Request DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use nimbus_entity::share::permission::SharePermission;

/// POST /api/auth/register
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Email address, used as the login name.
    pub email: String,
    /// Plain password.
    pub password: String,
    /// Optional display name.
    pub display_name: Option<String>,
}

/// POST /api/auth/login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Email address.
    pub email: String,
    /// Plain password.
    pub password: String,
}

/// POST /api/shares
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateShareRequest {
    /// The file to share.
    pub file_id: Uuid,
    /// Recipient email. `None` makes a public link.
    #[serde(default)]
    pub shared_with: Option<String>,
    /// Permission level: view, download, edit, upload, or manage.
    pub permission: SharePermission,
    /// Optional share password.
    #[serde(default)]
    pub password: Option<String>,
    /// Optional expiry instant.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Query parameters on the public share endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareAccessQuery {
    /// Share password, when the link is password-gated.
    #[serde(default)]
    pub password: Option<String>,
}
