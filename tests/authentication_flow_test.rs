//! Login / refresh / logout against the in-memory store and fake directory.

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tollgate::application_impl::{
    FakeCredentialVerifier, JsonPayloadValidator, JwtTokenManager, RealAuthenticationService,
    TokenConfig,
};
use tollgate::application_port::{AuthError, AuthenticationService, TokenClaims, TokenManager};
use tollgate::domain_model::{RefreshToken, SubjectId};
use tollgate::domain_port::RefreshTokenStore;
use tollgate::infra_memory::MemoryRefreshTokenStore;

fn test_config() -> TokenConfig {
    TokenConfig {
        access_token_key: b"test-access-key".to_vec(),
        refresh_token_key: b"test-refresh-key".to_vec(),
        access_token_age: Duration::from_secs(1800),
        refresh_token_age: Duration::from_secs(7 * 24 * 60 * 60),
    }
}

struct Harness {
    service: RealAuthenticationService,
    token_manager: Arc<JwtTokenManager>,
    store: Arc<MemoryRefreshTokenStore>,
}

fn setup() -> Harness {
    let token_manager = Arc::new(JwtTokenManager::try_new(test_config()).unwrap());
    let store = Arc::new(MemoryRefreshTokenStore::new());
    let verifier = Arc::new(
        FakeCredentialVerifier::new()
            .with_user("dicoding", "secret", SubjectId::from("42"))
            .with_user("other", "hunter2", SubjectId::from("43")),
    );
    let service = RealAuthenticationService::new(
        verifier,
        token_manager.clone(),
        store.clone(),
        Arc::new(JsonPayloadValidator::new()),
    );
    Harness {
        service,
        token_manager,
        store,
    }
}

fn login_payload() -> serde_json::Value {
    json!({ "username": "dicoding", "password": "secret" })
}

fn refresh_payload(token: &RefreshToken) -> serde_json::Value {
    json!({ "refreshToken": token.as_str() })
}

#[tokio::test]
async fn login_persists_refresh_token() {
    let h = setup();
    let tokens = h.service.login(&login_payload()).await.unwrap();

    assert!(h.store.exists(&tokens.refresh_token).await.unwrap());
    assert!(tokens.access_token_expires_at < tokens.refresh_token_expires_at);

    let access = h.token_manager.verify_access_token(&tokens.access_token).unwrap();
    assert_eq!(access.id, SubjectId::from("42"));
}

#[tokio::test]
async fn repeated_logins_issue_distinct_tokens() {
    let h = setup();
    let first = h.service.login(&login_payload()).await.unwrap();
    let second = h.service.login(&login_payload()).await.unwrap();

    assert_ne!(first.refresh_token, second.refresh_token);
    assert_eq!(h.store.len(), 2);
}

#[tokio::test]
async fn wrong_password_and_unknown_user_are_invalid_credentials() {
    let h = setup();
    for payload in [
        json!({ "username": "dicoding", "password": "nope" }),
        json!({ "username": "ghost", "password": "secret" }),
    ] {
        let err = h.service.login(&payload).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }
    assert!(h.store.is_empty());
}

#[tokio::test]
async fn malformed_login_issues_nothing() {
    let h = setup();
    let err = h
        .service
        .login(&json!({ "username": "dicoding" }))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::Validation(_)));
    assert!(h.store.is_empty());
}

#[tokio::test]
async fn full_lifecycle_for_subject_42() {
    let h = setup();
    let tokens = h.service.login(&login_payload()).await.unwrap();
    let refresh_token = tokens.refresh_token;
    assert!(h.store.exists(&refresh_token).await.unwrap());

    let refreshed = h
        .service
        .refresh(&refresh_payload(&refresh_token))
        .await
        .unwrap();
    let access = h
        .token_manager
        .verify_access_token(&refreshed.access_token)
        .unwrap();
    assert_eq!(access.id, SubjectId::from("42"));

    h.service
        .logout(&refresh_payload(&refresh_token))
        .await
        .unwrap();
    assert!(!h.store.exists(&refresh_token).await.unwrap());

    let err = h
        .service
        .refresh(&refresh_payload(&refresh_token))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::TokenNotRecognized));
}

#[tokio::test]
async fn refresh_does_not_rotate() {
    let h = setup();
    let tokens = h.service.login(&login_payload()).await.unwrap();

    for _ in 0..3 {
        h.service
            .refresh(&refresh_payload(&tokens.refresh_token))
            .await
            .unwrap();
        assert!(h.store.exists(&tokens.refresh_token).await.unwrap());
    }
    assert_eq!(h.store.len(), 1);
}

#[tokio::test]
async fn second_logout_is_not_recognized() {
    let h = setup();
    let tokens = h.service.login(&login_payload()).await.unwrap();
    let payload = refresh_payload(&tokens.refresh_token);

    h.service.logout(&payload).await.unwrap();
    let err = h.service.logout(&payload).await.unwrap_err();
    assert!(matches!(err, AuthError::TokenNotRecognized));
}

#[tokio::test]
async fn logout_only_revokes_its_own_token() {
    let h = setup();
    let a = h.service.login(&login_payload()).await.unwrap();
    let b = h.service.login(&login_payload()).await.unwrap();

    h.service
        .logout(&refresh_payload(&a.refresh_token))
        .await
        .unwrap();
    h.service
        .refresh(&refresh_payload(&b.refresh_token))
        .await
        .unwrap();
}

#[tokio::test]
async fn validly_signed_but_never_issued_token_is_not_recognized() {
    let h = setup();
    let forged = h
        .token_manager
        .generate_refresh_token(&TokenClaims::new(SubjectId::from("42")))
        .unwrap()
        .0;

    let err = h
        .service
        .refresh(&refresh_payload(&forged))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::TokenNotRecognized));

    let err = h
        .service
        .logout(&refresh_payload(&forged))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::TokenNotRecognized));
}

#[tokio::test]
async fn token_from_another_key_is_not_recognized() {
    let h = setup();
    let mut other_cfg = test_config();
    other_cfg.refresh_token_key = b"some-stale-key".to_vec();
    let other = JwtTokenManager::try_new(other_cfg).unwrap();
    let (stale, _) = other
        .generate_refresh_token(&TokenClaims::new(SubjectId::from("42")))
        .unwrap();

    let err = h
        .service
        .refresh(&refresh_payload(&stale))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::TokenNotRecognized));
}

#[tokio::test]
async fn stored_token_with_bad_signature_is_invalid() {
    let h = setup();
    let mut other_cfg = test_config();
    other_cfg.refresh_token_key = b"some-stale-key".to_vec();
    let other = JwtTokenManager::try_new(other_cfg).unwrap();
    let (stale, exp) = other
        .generate_refresh_token(&TokenClaims::new(SubjectId::from("42")))
        .unwrap();
    h.store.add(&stale, exp).await.unwrap();

    let err = h
        .service
        .refresh(&refresh_payload(&stale))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::TokenInvalid));
    assert!(h.store.exists(&stale).await.unwrap());
}

#[tokio::test]
async fn stored_but_expired_token_is_expired() {
    let h = setup();
    let issued = chrono::Utc::now() - chrono::Duration::hours(2);
    let raw = jsonwebtoken::encode(
        &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256),
        &json!({
            "id": "42",
            "iat": issued.timestamp(),
            "exp": (issued + chrono::Duration::minutes(1)).timestamp(),
            "jti": "expired-but-stored",
        }),
        &jsonwebtoken::EncodingKey::from_secret(&test_config().refresh_token_key),
    )
    .unwrap();
    let expired = RefreshToken(raw);
    h.store
        .add(&expired, chrono::Utc::now() + chrono::Duration::days(1))
        .await
        .unwrap();

    let err = h
        .service
        .refresh(&refresh_payload(&expired))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::TokenExpired));
    assert!(h.store.exists(&expired).await.unwrap());
}

#[tokio::test]
async fn malformed_refresh_and_logout_payloads() {
    let h = setup();
    for payload in [json!({}), json!({ "refreshToken": 1 }), json!("token")] {
        assert!(matches!(
            h.service.refresh(&payload).await,
            Err(AuthError::Validation(_))
        ));
        assert!(matches!(
            h.service.logout(&payload).await,
            Err(AuthError::Validation(_))
        ));
    }
}

#[tokio::test]
async fn racing_logouts_succeed_exactly_once() {
    let h = Arc::new(setup());
    let tokens = h.service.login(&login_payload()).await.unwrap();
    let payload = refresh_payload(&tokens.refresh_token);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let h = h.clone();
            let payload = payload.clone();
            tokio::spawn(async move { h.service.logout(&payload).await })
        })
        .collect();

    let mut ok = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(()) => ok += 1,
            Err(AuthError::TokenNotRecognized) => {}
            Err(e) => panic!("unexpected error: {:?}", e),
        }
    }
    assert_eq!(ok, 1);
    assert!(!h.store.exists(&tokens.refresh_token).await.unwrap());
}

#[tokio::test]
async fn refresh_racing_logout_ends_revoked() {
    let h = Arc::new(setup());
    let tokens = h.service.login(&login_payload()).await.unwrap();
    let payload = refresh_payload(&tokens.refresh_token);

    let refresh = {
        let h = h.clone();
        let payload = payload.clone();
        tokio::spawn(async move { h.service.refresh(&payload).await.map(|_| ()) })
    };
    let logout = {
        let h = h.clone();
        let payload = payload.clone();
        tokio::spawn(async move { h.service.logout(&payload).await })
    };

    logout.await.unwrap().unwrap();
    match refresh.await.unwrap() {
        Ok(()) | Err(AuthError::TokenNotRecognized) => {}
        Err(e) => panic!("unexpected error: {:?}", e),
    }
    assert!(!h.store.exists(&tokens.refresh_token).await.unwrap());
}
