//! Access audit logging.

use std::sync::Arc;

use tracing::error;
use uuid::Uuid;

use nimbus_core::result::AppResult;
use nimbus_core::types::pagination::{PageRequest, PageResponse};
use nimbus_entity::share::access_log::{CreateShareAccessLog, ShareAccessLog};
use nimbus_entity::share::permission::SharePermission;

use super::access::ShareActor;
use super::store::AccessLogStore;

/// Appends immutable access log entries.
///
/// Logging is an observation of the access decision, never an input to it:
/// a failed append is reported through tracing and otherwise swallowed so
/// that audit trouble can not turn a granted access into an error.
#[derive(Clone)]
pub struct AccessLogger {
    store: Arc<dyn AccessLogStore>,
}

impl AccessLogger {
    /// Creates a new access logger.
    pub fn new(store: Arc<dyn AccessLogStore>) -> Self {
        Self { store }
    }

    /// Record a successful access. Best effort.
    pub async fn log_success(&self, share_id: Uuid, actor: &ShareActor, action: SharePermission) {
        self.append(CreateShareAccessLog {
            share_id,
            accessed_by: actor.identity(),
            ip_address: actor.ip_address.clone(),
            user_agent: actor.user_agent.clone(),
            action,
            success: true,
            failure_reason: None,
        })
        .await;
    }

    /// Record a denied access with its reason code. Best effort.
    pub async fn log_denial(
        &self,
        share_id: Uuid,
        actor: &ShareActor,
        action: SharePermission,
        reason: &str,
    ) {
        self.append(CreateShareAccessLog {
            share_id,
            accessed_by: actor.identity(),
            ip_address: actor.ip_address.clone(),
            user_agent: actor.user_agent.clone(),
            action,
            success: false,
            failure_reason: Some(reason.to_string()),
        })
        .await;
    }

    /// List log entries for a share, newest first.
    pub async fn list(
        &self,
        share_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ShareAccessLog>> {
        self.store.find_by_share(share_id, page).await
    }

    async fn append(&self, entry: CreateShareAccessLog) {
        if let Err(e) = self.store.append(&entry).await {
            error!(
                share_id = %entry.share_id,
                action = %entry.action,
                success = entry.success,
                error = %e,
                "Failed to append share access log entry"
            );
        }
    }
}

impl std::fmt::Debug for AccessLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessLogger").finish_non_exhaustive()
    }
}
