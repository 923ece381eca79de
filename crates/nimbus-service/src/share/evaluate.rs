//! Share access evaluation, the single authority deciding whether a
//! (token, password, action) tuple may proceed.
//!
//! Evaluation is a pure decision over an already-looked-up share record:
//! no store access, no logging, no counter updates. Side effects belong to
//! the caller pipeline so that a successful evaluation followed by a
//! downstream failure is never counted as a successful access.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use nimbus_auth::password::PasswordHasher;
use nimbus_core::error::AppError;
use nimbus_entity::share::model::Share;
use nimbus_entity::share::permission::SharePermission;

/// Why an access attempt was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessDenial {
    /// No share exists for the presented token.
    ShareNotFound,
    /// The share has been deactivated by its owner. Terminal.
    ShareRevoked,
    /// The share's expiry instant has passed. Terminal.
    ShareExpired,
    /// The share is password-gated and no password was supplied.
    /// Callers may re-prompt rather than treat this as a hard denial.
    PasswordRequired,
    /// A password was supplied but does not match.
    InvalidPassword,
    /// The share is valid but its granted level does not cover the action.
    InsufficientPermission,
}

impl AccessDenial {
    /// Stable machine-readable code, recorded in the access log.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ShareNotFound => "SHARE_NOT_FOUND",
            Self::ShareRevoked => "SHARE_REVOKED",
            Self::ShareExpired => "SHARE_EXPIRED",
            Self::PasswordRequired => "PASSWORD_REQUIRED",
            Self::InvalidPassword => "INVALID_PASSWORD",
            Self::InsufficientPermission => "INSUFFICIENT_PERMISSION",
        }
    }

    /// Map the denial to the application error taxonomy.
    ///
    /// Revoked and expired shares are reported distinctly from unknown
    /// tokens: tokens carry 256 bits of entropy, so enumerating which ones
    /// ever existed is not a practical disclosure channel, and clients can
    /// show "link expired" instead of a generic failure.
    pub fn into_error(self) -> AppError {
        match self {
            Self::ShareNotFound => AppError::not_found("Share not found"),
            Self::ShareRevoked => AppError::gone("Share link has been revoked"),
            Self::ShareExpired => AppError::gone("Share link has expired"),
            Self::PasswordRequired => AppError::authentication("Password required"),
            Self::InvalidPassword => AppError::authentication("Invalid share password"),
            Self::InsufficientPermission => {
                AppError::authorization("Insufficient permission for this action")
            }
        }
    }
}

impl std::fmt::Display for AccessDenial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The result of a successful evaluation: what was resolved and at which
/// effective level. Carrying the grant is the only way for callers to reach
/// the file, which keeps every access on the evaluated path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareGrant {
    /// The share that authorized the access.
    pub share_id: Uuid,
    /// The resolved file reference.
    pub file_id: Uuid,
    /// The share's granted permission level.
    pub permission: SharePermission,
}

/// Evaluates share access requests.
///
/// Checks run in a fixed order and short-circuit on the first failure:
/// lookup, revocation, expiry, password, permission. Revocation is checked
/// before expiry so a share that is both reports as revoked.
#[derive(Debug, Clone)]
pub struct ShareEvaluator {
    /// Password hasher for share password verification.
    hasher: Arc<PasswordHasher>,
}

impl ShareEvaluator {
    /// Creates a new evaluator.
    pub fn new(hasher: Arc<PasswordHasher>) -> Self {
        Self { hasher }
    }

    /// Decide whether the request may proceed.
    ///
    /// `share` is the result of the token lookup (`None` when the token is
    /// unknown); `now` is injected so expiry is deterministic under test.
    pub fn evaluate(
        &self,
        share: Option<&Share>,
        password: Option<&str>,
        action: SharePermission,
        now: DateTime<Utc>,
    ) -> Result<ShareGrant, AccessDenial> {
        let share = share.ok_or(AccessDenial::ShareNotFound)?;

        if !share.is_active {
            return Err(AccessDenial::ShareRevoked);
        }

        if share.is_expired_at(now) {
            return Err(AccessDenial::ShareExpired);
        }

        if let Some(ref hash) = share.password_hash {
            let password = password.ok_or(AccessDenial::PasswordRequired)?;
            // Argon2 verification compares digests in constant time. A
            // malformed stored hash fails closed as an invalid password.
            let valid = self.hasher.verify_password(password, hash).unwrap_or_else(|e| {
                warn!(share_id = %share.id, error = %e, "Share password hash could not be verified");
                false
            });
            if !valid {
                return Err(AccessDenial::InvalidPassword);
            }
        }

        if !share.permission.covers(action) {
            return Err(AccessDenial::InsufficientPermission);
        }

        Ok(ShareGrant {
            share_id: share.id,
            file_id: share.file_id,
            permission: share.permission,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn evaluator() -> ShareEvaluator {
        ShareEvaluator::new(Arc::new(PasswordHasher::new()))
    }

    fn share(permission: SharePermission) -> Share {
        Share {
            id: Uuid::new_v4(),
            file_id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            token: "0".repeat(64),
            shared_with: None,
            is_public: true,
            permission,
            password_hash: None,
            is_active: true,
            expires_at: None,
            access_count: 0,
            last_accessed_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_unknown_token_is_not_found() {
        let result = evaluator().evaluate(None, None, SharePermission::View, Utc::now());
        assert_eq!(result.unwrap_err(), AccessDenial::ShareNotFound);
    }

    #[test]
    fn test_revoked_share_denies_every_action() {
        let mut s = share(SharePermission::Manage);
        s.is_active = false;
        let eval = evaluator();
        for action in SharePermission::ALL {
            let result = eval.evaluate(Some(&s), Some("anything"), action, Utc::now());
            assert_eq!(result.unwrap_err(), AccessDenial::ShareRevoked);
        }
    }

    #[test]
    fn test_expired_share_denies() {
        let now = Utc::now();
        let mut s = share(SharePermission::Manage);
        s.expires_at = Some(now - Duration::seconds(1));
        let result = evaluator().evaluate(Some(&s), None, SharePermission::View, now);
        assert_eq!(result.unwrap_err(), AccessDenial::ShareExpired);
    }

    #[test]
    fn test_revoked_checked_before_expired() {
        let now = Utc::now();
        let mut s = share(SharePermission::View);
        s.is_active = false;
        s.expires_at = Some(now - Duration::hours(1));
        let result = evaluator().evaluate(Some(&s), None, SharePermission::View, now);
        assert_eq!(result.unwrap_err(), AccessDenial::ShareRevoked);
    }

    #[test]
    fn test_password_gate() {
        let eval = evaluator();
        let hasher = PasswordHasher::new();
        let mut s = share(SharePermission::Download);
        s.password_hash = Some(hasher.hash_password("abc123").unwrap());

        let missing = eval.evaluate(Some(&s), None, SharePermission::View, Utc::now());
        assert_eq!(missing.unwrap_err(), AccessDenial::PasswordRequired);

        let wrong = eval.evaluate(Some(&s), Some("wrong"), SharePermission::View, Utc::now());
        assert_eq!(wrong.unwrap_err(), AccessDenial::InvalidPassword);

        let right = eval.evaluate(Some(&s), Some("abc123"), SharePermission::View, Utc::now());
        assert!(right.is_ok());
    }

    #[test]
    fn test_malformed_hash_fails_closed() {
        let mut s = share(SharePermission::View);
        s.password_hash = Some("not-a-phc-hash".to_string());
        let result = evaluator().evaluate(Some(&s), Some("abc123"), SharePermission::View, Utc::now());
        assert_eq!(result.unwrap_err(), AccessDenial::InvalidPassword);
    }

    #[test]
    fn test_permission_bound() {
        let s = share(SharePermission::View);
        let result = evaluator().evaluate(Some(&s), None, SharePermission::Download, Utc::now());
        assert_eq!(result.unwrap_err(), AccessDenial::InsufficientPermission);

        let s = share(SharePermission::Manage);
        let grant = evaluator()
            .evaluate(Some(&s), None, SharePermission::Download, Utc::now())
            .unwrap();
        assert_eq!(grant.file_id, s.file_id);
        assert_eq!(grant.permission, SharePermission::Manage);
    }

    #[test]
    fn test_password_checked_before_permission() {
        // A password-gated view-only share asked for download must demand
        // the password first; permission is only revealed to holders of it.
        let hasher = PasswordHasher::new();
        let mut s = share(SharePermission::View);
        s.password_hash = Some(hasher.hash_password("abc123").unwrap());
        let result = evaluator().evaluate(Some(&s), None, SharePermission::Download, Utc::now());
        assert_eq!(result.unwrap_err(), AccessDenial::PasswordRequired);
    }
}
