use crate::application_port::*;
use crate::domain_model::*;
use anyhow::anyhow;
use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Clone)]
pub struct TokenConfig {
    pub access_token_key: Vec<u8>,
    pub refresh_token_key: Vec<u8>,
    pub access_token_age: Duration,
    pub refresh_token_age: Duration,
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("access_token_key", &"<redacted>")
            .field("refresh_token_key", &"<redacted>")
            .field("access_token_age", &self.access_token_age)
            .field("refresh_token_age", &self.refresh_token_age)
            .finish()
    }
}

impl TokenConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.access_token_key.is_empty() {
            return Err(anyhow!("access token key must not be empty"));
        }
        if self.refresh_token_key.is_empty() {
            return Err(anyhow!("refresh token key must not be empty"));
        }
        if self.access_token_key == self.refresh_token_key {
            return Err(anyhow!("access and refresh token keys must differ"));
        }
        if self.access_token_age.is_zero() {
            return Err(anyhow!("access token age must be positive"));
        }
        if self.refresh_token_age.is_zero() {
            return Err(anyhow!("refresh token age must be positive"));
        }
        let now = Utc::now();
        for (name, age) in [
            ("access", self.access_token_age),
            ("refresh", self.refresh_token_age),
        ] {
            expiry_after(now, age)
                .ok_or_else(|| anyhow!("{} token age is out of range: {:?}", name, age))?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct JwtClaims {
    id: String,
    iat: i64,
    exp: i64,
    jti: String, // keeps tokens from the same second distinct
}

fn expiry_after(now: DateTime<Utc>, ttl: Duration) -> Option<DateTime<Utc>> {
    let ttl = chrono::Duration::from_std(ttl).ok()?;
    now.checked_add_signed(ttl)
}

fn encode_claims(
    claims: &TokenClaims,
    key: &[u8],
    ttl: Duration,
    now: DateTime<Utc>,
) -> Result<(String, DateTime<Utc>), AuthError> {
    let exp_dt = expiry_after(now, ttl)
        .ok_or_else(|| AuthError::InternalError(format!("token age out of range: {:?}", ttl)))?;
    let jwt_claims = JwtClaims {
        id: claims.id.0.clone(),
        iat: now.timestamp(),
        exp: exp_dt.timestamp(),
        jti: uuid::Uuid::new_v4().to_string(),
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &jwt_claims,
        &EncodingKey::from_secret(key),
    )
    .map_err(|e| AuthError::InternalError(e.to_string()))?;
    Ok((token, exp_dt))
}

fn decode_claims(token: &str, key: &[u8]) -> Result<VerifiedClaims, AuthError> {
    let mut v = Validation::new(Algorithm::HS256);
    v.validate_exp = true;
    v.leeway = 0;
    let data = decode::<JwtClaims>(token, &DecodingKey::from_secret(key), &v).map_err(
        |e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::TokenInvalid,
        },
    )?;
    let claims = data.claims;
    Ok(VerifiedClaims {
        id: SubjectId(claims.id),
        jti: claims.jti,
        issued_at: timestamp(claims.iat)?,
        expires_at: timestamp(claims.exp)?,
    })
}

#[inline]
fn timestamp(secs: i64) -> Result<DateTime<Utc>, AuthError> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .ok_or(AuthError::TokenInvalid)
}

pub struct JwtTokenManager {
    cfg: TokenConfig,
}

impl JwtTokenManager {
    pub fn try_new(cfg: TokenConfig) -> anyhow::Result<Self> {
        cfg.validate()?;
        Ok(JwtTokenManager { cfg })
    }
}

impl TokenManager for JwtTokenManager {
    fn generate_access_token(
        &self,
        claims: &TokenClaims,
    ) -> Result<(AccessToken, DateTime<Utc>), AuthError> {
        let (token, exp_dt) = encode_claims(
            claims,
            &self.cfg.access_token_key,
            self.cfg.access_token_age,
            Utc::now(),
        )?;
        Ok((AccessToken(token), exp_dt))
    }

    fn generate_refresh_token(
        &self,
        claims: &TokenClaims,
    ) -> Result<(RefreshToken, DateTime<Utc>), AuthError> {
        let (token, exp_dt) = encode_claims(
            claims,
            &self.cfg.refresh_token_key,
            self.cfg.refresh_token_age,
            Utc::now(),
        )?;
        Ok((RefreshToken(token), exp_dt))
    }

    fn verify_access_token(&self, token: &AccessToken) -> Result<VerifiedClaims, AuthError> {
        decode_claims(token.as_str(), &self.cfg.access_token_key)
    }

    fn verify_refresh_token(&self, token: &RefreshToken) -> Result<VerifiedClaims, AuthError> {
        decode_claims(token.as_str(), &self.cfg.refresh_token_key)
    }
}
