use super::AuthError;
use crate::domain_model::SubjectId;

#[async_trait::async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Resolve the subject behind a username/password pair.
    /// Any mismatch is reported as `AuthError::InvalidCredentials`.
    async fn verify_user_credential(
        &self,
        username: &str,
        password: &str,
    ) -> Result<SubjectId, AuthError>;
}

#[async_trait::async_trait]
pub trait CredentialHasher: Send + Sync {
    async fn hash_password(&self, password: &str) -> Result<String, AuthError>;
    async fn verify_password(&self, password: &str, password_hash: &str)
    -> Result<bool, AuthError>;
}
