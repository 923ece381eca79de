//! Share access log entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::permission::SharePermission;

/// One immutable row per attempted share access, successful or not.
///
/// Entries are append-only; nothing in the application mutates or deletes
/// them, and they survive share revocation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShareAccessLog {
    /// Unique log entry identifier.
    pub id: Uuid,
    /// The share that was accessed.
    pub share_id: Uuid,
    /// Actor identity: authenticated user email, or caller IP address.
    pub accessed_by: Option<String>,
    /// IP address of the caller.
    pub ip_address: Option<String>,
    /// User-Agent of the caller.
    pub user_agent: Option<String>,
    /// The action that was attempted.
    pub action: SharePermission,
    /// Whether the access was allowed.
    pub success: bool,
    /// Denial reason code when `success` is false.
    pub failure_reason: Option<String>,
    /// When the attempt occurred.
    pub accessed_at: DateTime<Utc>,
}

/// Data required to append a new access log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateShareAccessLog {
    /// The share that was accessed.
    pub share_id: Uuid,
    /// Actor identity.
    pub accessed_by: Option<String>,
    /// Caller IP address.
    pub ip_address: Option<String>,
    /// Caller User-Agent.
    pub user_agent: Option<String>,
    /// The attempted action.
    pub action: SharePermission,
    /// Outcome.
    pub success: bool,
    /// Denial reason code, if denied.
    pub failure_reason: Option<String>,
}
