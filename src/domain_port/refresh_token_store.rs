use crate::application_port::*;
use crate::domain_model::*;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

/// The set of refresh tokens that are still usable.
///
/// Revocation is enforced here: a token missing from the store is never
/// accepted, whatever its signature says. Each operation is atomic for a
/// given token value.
#[async_trait::async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Persist a token. Adding the same token twice is not an error.
    /// `expires_at` only bounds how long the entry is retained.
    async fn add(&self, token: &RefreshToken, expires_at: DateTime<Utc>)
    -> Result<(), AuthError>;
    /// True iff this exact token string is currently persisted.
    async fn exists(&self, token: &RefreshToken) -> Result<bool, AuthError>;
    /// Remove a token. Returns whether this call removed it.
    async fn delete(&self, token: &RefreshToken) -> Result<bool, AuthError>;
    /// Drop entries whose retention expiry is at or before `now`.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, AuthError>;
}

/// SHA-256 of the token text, used as a fixed-size lookup key.
pub fn token_digest(token: &RefreshToken) -> Vec<u8> {
    Sha256::digest(token.as_str().as_bytes()).to_vec()
}

pub fn token_digest_hex(token: &RefreshToken) -> String {
    hex::encode(token_digest(token))
}
