use crate::domain_model::{AccessToken, RefreshToken};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("refresh token not recognized")]
    TokenNotRecognized,
    #[error("token invalid")]
    TokenInvalid,
    #[error("token expired")]
    TokenExpired,
    #[error("store error: {0}")]
    Store(String),
    #[error("internal error: {0}")]
    InternalError(String),
}

impl AuthError {
    /// Client faults are answered with a structured failure; everything else is infra.
    pub fn is_client_fault(&self) -> bool {
        !matches!(self, AuthError::Store(_) | AuthError::InternalError(_))
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    pub access_token: AccessToken,
    pub refresh_token: RefreshToken,
    #[serde(skip)]
    pub access_token_expires_at: DateTime<Utc>,
    #[serde(skip)]
    pub refresh_token_expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshedAccess {
    pub access_token: AccessToken,
    #[serde(skip)]
    pub access_token_expires_at: DateTime<Utc>,
}

/// Login, refresh and logout over raw request payloads.
///
/// Every payload is shape-checked before any credential, store or token work happens.
#[async_trait::async_trait]
pub trait AuthenticationService: Send + Sync {
    async fn login(&self, payload: &Value) -> Result<AuthTokens, AuthError>;
    async fn refresh(&self, payload: &Value) -> Result<RefreshedAccess, AuthError>;
    async fn logout(&self, payload: &Value) -> Result<(), AuthError>;
}
