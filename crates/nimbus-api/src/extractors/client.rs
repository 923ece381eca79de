//! `ClientInfo` extractor: transport details for access logging.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use nimbus_service::ShareActor;

use crate::error::ApiError;

/// IP address and User-Agent of the caller, available on every request.
#[derive(Debug, Clone)]
pub struct ClientInfo {
    /// Caller IP, from `X-Forwarded-For` when present.
    pub ip_address: String,
    /// Caller User-Agent.
    pub user_agent: Option<String>,
}

impl ClientInfo {
    /// The anonymous actor identity for share access logging.
    pub fn actor(&self) -> ShareActor {
        ShareActor::anonymous(Some(self.ip_address.clone()), self.user_agent.clone())
    }
}

pub(crate) fn client_info_from_parts(parts: &Parts) -> ClientInfo {
    // First hop of X-Forwarded-For; the proxy in front terminates TLS and
    // appends the real client address.
    let ip_address = parts
        .headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let user_agent = parts
        .headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    ClientInfo {
        ip_address,
        user_agent,
    }
}

impl<S: Send + Sync> FromRequestParts<S> for ClientInfo {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(client_info_from_parts(parts))
    }
}
