//! The share access pipeline: lookup, evaluate, and account for accesses.
//!
//! `ShareAccessService` is the only path from a share token to a file.
//! Authorization and accounting are split on purpose: `authorize` decides
//! and logs denials, while `record_access` is called only after the
//! downstream work (serving metadata, streaming a download) has succeeded,
//! so the counter and the success log never run ahead of reality.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, warn};
use uuid::Uuid;

use nimbus_core::result::AppResult;
use nimbus_entity::share::model::Share;
use nimbus_entity::share::permission::SharePermission;

use super::audit::AccessLogger;
use super::evaluate::{AccessDenial, ShareEvaluator, ShareGrant};
use super::store::ShareStore;

/// Who is attempting the access. All fields are optional; an anonymous
/// visitor on a public link carries only what the transport reveals.
#[derive(Debug, Clone, Default)]
pub struct ShareActor {
    /// Authenticated user email, if any.
    pub email: Option<String>,
    /// Caller IP address.
    pub ip_address: Option<String>,
    /// Caller User-Agent.
    pub user_agent: Option<String>,
}

impl ShareActor {
    /// Anonymous actor known only by transport details.
    pub fn anonymous(ip_address: Option<String>, user_agent: Option<String>) -> Self {
        Self {
            email: None,
            ip_address,
            user_agent,
        }
    }

    /// Actor known by their account email as well as transport details.
    pub fn authenticated(
        email: String,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> Self {
        Self {
            email: Some(email),
            ip_address,
            user_agent,
        }
    }

    /// Best available identity string: email when authenticated,
    /// otherwise the IP address.
    pub fn identity(&self) -> Option<String> {
        self.email.clone().or_else(|| self.ip_address.clone())
    }
}

/// Coordinates the token-to-file access path.
#[derive(Clone)]
pub struct ShareAccessService {
    shares: Arc<dyn ShareStore>,
    evaluator: ShareEvaluator,
    logger: AccessLogger,
}

impl ShareAccessService {
    /// Creates a new share access service.
    pub fn new(shares: Arc<dyn ShareStore>, evaluator: ShareEvaluator, logger: AccessLogger) -> Self {
        Self {
            shares,
            evaluator,
            logger,
        }
    }

    /// Resolve a token and decide whether `action` may proceed.
    ///
    /// The outer `Result` carries store failures. A policy denial is data,
    /// not an error: it has already been appended to the audit log (except
    /// for unknown tokens, which have no share row to attach an entry to
    /// and are traced instead), and the caller maps it to its own surface.
    pub async fn authorize(
        &self,
        token: &str,
        password: Option<&str>,
        action: SharePermission,
        actor: &ShareActor,
    ) -> AppResult<Result<(Share, ShareGrant), AccessDenial>> {
        let share = self.shares.find_by_token(token).await?;

        match self
            .evaluator
            .evaluate(share.as_ref(), password, action, Utc::now())
        {
            Ok(grant) => {
                // evaluate only succeeds when a share was present
                let share = share.ok_or_else(|| {
                    nimbus_core::error::AppError::internal("Grant issued without a share record")
                })?;
                Ok(Ok((share, grant)))
            }
            Err(denial) => {
                match &share {
                    Some(share) => {
                        self.logger
                            .log_denial(share.id, actor, action, denial.as_str())
                            .await;
                    }
                    None => {
                        warn!(
                            ip_address = actor.ip_address.as_deref().unwrap_or("unknown"),
                            action = %action,
                            "Share access attempt with unknown token"
                        );
                    }
                }
                Ok(Err(denial))
            }
        }
    }

    /// Account for a completed access: append the success log entry and
    /// bump the atomic access counter. Both are best effort; the access
    /// itself has already succeeded and must not be failed retroactively.
    pub async fn record_access(&self, share_id: Uuid, actor: &ShareActor, action: SharePermission) {
        self.logger.log_success(share_id, actor, action).await;

        if let Err(e) = self.shares.increment_access(share_id).await {
            error!(share_id = %share_id, error = %e, "Failed to increment share access count");
        }
    }
}

impl std::fmt::Debug for ShareAccessService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShareAccessService").finish_non_exhaustive()
    }
}
