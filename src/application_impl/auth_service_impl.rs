use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::RefreshTokenStore;
use crate::logger::*;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct LoginInput {
    username: String,
    password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshTokenInput {
    refresh_token: RefreshToken,
}

fn parse_payload<T: DeserializeOwned>(payload: &Value) -> Result<T, AuthError> {
    T::deserialize(payload).map_err(|e| AuthError::Validation(e.to_string()))
}

pub struct RealAuthenticationService {
    credential_verifier: Arc<dyn CredentialVerifier>,
    token_manager: Arc<dyn TokenManager>,
    token_store: Arc<dyn RefreshTokenStore>,
    validator: Arc<dyn PayloadValidator>,
}

impl RealAuthenticationService {
    pub fn new(
        credential_verifier: Arc<dyn CredentialVerifier>,
        token_manager: Arc<dyn TokenManager>,
        token_store: Arc<dyn RefreshTokenStore>,
        validator: Arc<dyn PayloadValidator>,
    ) -> Self {
        Self {
            credential_verifier,
            token_manager,
            token_store,
            validator,
        }
    }

    /// Store membership is checked before the signature so revoked tokens are
    /// rejected the same way whether or not they are still cryptographically valid.
    async fn ensure_recognized(&self, token: &RefreshToken) -> Result<(), AuthError> {
        if !self.token_store.exists(token).await? {
            return Err(AuthError::TokenNotRecognized);
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl AuthenticationService for RealAuthenticationService {
    async fn login(&self, payload: &Value) -> Result<AuthTokens, AuthError> {
        self.validator.validate_post_authentication_payload(payload)?;
        let LoginInput { username, password } = parse_payload(payload)?;

        let subject_id = self
            .credential_verifier
            .verify_user_credential(&username, &password)
            .await?;

        let claims = TokenClaims::new(subject_id);
        let (access_token, access_exp) = self.token_manager.generate_access_token(&claims)?;
        let (refresh_token, refresh_exp) = self.token_manager.generate_refresh_token(&claims)?;

        self.token_store.add(&refresh_token, refresh_exp).await?;
        info!(subject = %claims.id, "refresh token issued");

        Ok(AuthTokens {
            access_token,
            refresh_token,
            access_token_expires_at: access_exp,
            refresh_token_expires_at: refresh_exp,
        })
    }

    async fn refresh(&self, payload: &Value) -> Result<RefreshedAccess, AuthError> {
        self.validator.validate_put_authentication_payload(payload)?;
        let RefreshTokenInput { refresh_token } = parse_payload(payload)?;

        self.ensure_recognized(&refresh_token).await?;
        let verified = self
            .token_manager
            .verify_refresh_token(&refresh_token)
            .inspect_err(|e| debug!("stored refresh token rejected: {}", e))?;

        // No rotation: the same refresh token stays usable until logout or expiry.
        let claims = TokenClaims::new(verified.id);
        let (access_token, access_exp) = self.token_manager.generate_access_token(&claims)?;
        debug!(subject = %claims.id, "access token refreshed");

        Ok(RefreshedAccess {
            access_token,
            access_token_expires_at: access_exp,
        })
    }

    async fn logout(&self, payload: &Value) -> Result<(), AuthError> {
        self.validator.validate_delete_authentication_payload(payload)?;
        let RefreshTokenInput { refresh_token } = parse_payload(payload)?;

        self.ensure_recognized(&refresh_token).await?;
        // A concurrent logout may have removed it since the check.
        if !self.token_store.delete(&refresh_token).await? {
            return Err(AuthError::TokenNotRecognized);
        }
        info!("refresh token revoked");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application_impl::{
        FakeCredentialVerifier, JsonPayloadValidator, JwtTokenManager, TokenConfig,
    };
    use chrono::{DateTime, Utc};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct UnavailableStore;

    #[async_trait::async_trait]
    impl RefreshTokenStore for UnavailableStore {
        async fn add(&self, _: &RefreshToken, _: DateTime<Utc>) -> Result<(), AuthError> {
            Err(AuthError::Store("connection refused".to_string()))
        }
        async fn exists(&self, _: &RefreshToken) -> Result<bool, AuthError> {
            Err(AuthError::Store("connection refused".to_string()))
        }
        async fn delete(&self, _: &RefreshToken) -> Result<bool, AuthError> {
            Err(AuthError::Store("connection refused".to_string()))
        }
        async fn purge_expired(&self, _: DateTime<Utc>) -> Result<u64, AuthError> {
            Err(AuthError::Store("connection refused".to_string()))
        }
    }

    #[derive(Default)]
    struct CountingVerifier {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl CredentialVerifier for CountingVerifier {
        async fn verify_user_credential(&self, _: &str, _: &str) -> Result<SubjectId, AuthError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(SubjectId::from("42"))
        }
    }

    fn token_manager() -> Arc<JwtTokenManager> {
        Arc::new(
            JwtTokenManager::try_new(TokenConfig {
                access_token_key: b"access".to_vec(),
                refresh_token_key: b"refresh".to_vec(),
                access_token_age: Duration::from_secs(60),
                refresh_token_age: Duration::from_secs(3600),
            })
            .unwrap(),
        )
    }

    fn service(
        verifier: Arc<dyn CredentialVerifier>,
        store: Arc<dyn RefreshTokenStore>,
    ) -> RealAuthenticationService {
        RealAuthenticationService::new(
            verifier,
            token_manager(),
            store,
            Arc::new(JsonPayloadValidator::new()),
        )
    }

    #[tokio::test]
    async fn store_failure_is_infra_not_auth() {
        let verifier =
            Arc::new(FakeCredentialVerifier::new().with_user("dicoding", "secret", "42".into()));
        let svc = service(verifier, Arc::new(UnavailableStore));

        let err = svc
            .login(&json!({ "username": "dicoding", "password": "secret" }))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Store(_)));
        assert!(!err.is_client_fault());

        let err = svc
            .refresh(&json!({ "refreshToken": "anything" }))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Store(_)));

        let err = svc
            .logout(&json!({ "refreshToken": "anything" }))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Store(_)));
    }

    #[tokio::test]
    async fn invalid_payload_skips_credential_check() {
        let verifier = Arc::new(CountingVerifier::default());
        let svc = service(verifier.clone(), Arc::new(UnavailableStore));

        let err = svc
            .login(&json!({ "username": "dicoding" }))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation(ref m) if m == "\"password\" is required"));
        assert!(err.is_client_fault());
        assert_eq!(verifier.calls.load(Ordering::SeqCst), 0);
    }
}
