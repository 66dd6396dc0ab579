use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Utc};
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

/// Keys are `<prefix>:<sha256 hex>`; the value holds the full token so lookups
/// still compare the exact string. Entries expire with the token.
pub struct RedisRefreshTokenStore {
    conn: ConnectionManager,
    prefix: String,
}

impl RedisRefreshTokenStore {
    pub fn new(conn: ConnectionManager, prefix: impl Into<String>) -> Self {
        RedisRefreshTokenStore {
            conn,
            prefix: prefix.into(),
        }
    }

    fn key(&self, token: &RefreshToken) -> String {
        format!("{}:{}", self.prefix, token_digest_hex(token))
    }

    fn ttl_secs(until: DateTime<Utc>) -> u64 {
        let secs = (until - Utc::now()).num_seconds();
        if secs <= 0 { 1 } else { secs as u64 }
    }
}

#[async_trait::async_trait]
impl RefreshTokenStore for RedisRefreshTokenStore {
    async fn add(
        &self,
        token: &RefreshToken,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        let key = self.key(token);
        let mut conn = self.conn.clone();
        let _: () = conn
            .set_ex(&key, token.as_str(), Self::ttl_secs(expires_at))
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;
        Ok(())
    }

    async fn exists(&self, token: &RefreshToken) -> Result<bool, AuthError> {
        let key = self.key(token);
        let mut conn = self.conn.clone();
        let val: Option<String> = conn
            .get(&key)
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;
        Ok(val.as_deref() == Some(token.as_str()))
    }

    async fn delete(&self, token: &RefreshToken) -> Result<bool, AuthError> {
        let key = self.key(token);
        let mut conn = self.conn.clone();
        let removed: i64 = conn
            .del(&key)
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;
        Ok(removed > 0)
    }

    async fn purge_expired(&self, _now: DateTime<Utc>) -> Result<u64, AuthError> {
        // Redis drops keys on TTL.
        Ok(0)
    }
}
