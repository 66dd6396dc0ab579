use super::AuthError;
use crate::domain_model::{AccessToken, RefreshToken, SubjectId};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TokenClaims {
    pub id: SubjectId,
}

impl TokenClaims {
    pub fn new(id: SubjectId) -> Self {
        TokenClaims { id }
    }
}

#[derive(Debug, Clone)]
pub struct VerifiedClaims {
    pub id: SubjectId,
    pub jti: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Signs and checks tokens. Implementations are pure and need no locking.
pub trait TokenManager: Send + Sync {
    fn generate_access_token(
        &self,
        claims: &TokenClaims,
    ) -> Result<(AccessToken, DateTime<Utc>), AuthError>;
    fn generate_refresh_token(
        &self,
        claims: &TokenClaims,
    ) -> Result<(RefreshToken, DateTime<Utc>), AuthError>;
    fn verify_access_token(&self, token: &AccessToken) -> Result<VerifiedClaims, AuthError>;
    fn verify_refresh_token(&self, token: &RefreshToken) -> Result<VerifiedClaims, AuthError>;
}
