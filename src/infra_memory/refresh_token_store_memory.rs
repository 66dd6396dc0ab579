use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

/// Sharded in-process store. Operations on one token never wait on unrelated tokens.
#[derive(Debug, Default)]
pub struct MemoryRefreshTokenStore {
    tokens: DashMap<String, DateTime<Utc>>,
}

impl MemoryRefreshTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait::async_trait]
impl RefreshTokenStore for MemoryRefreshTokenStore {
    async fn add(
        &self,
        token: &RefreshToken,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        self.tokens.insert(token.0.clone(), expires_at);
        Ok(())
    }

    async fn exists(&self, token: &RefreshToken) -> Result<bool, AuthError> {
        Ok(self.tokens.contains_key(token.as_str()))
    }

    async fn delete(&self, token: &RefreshToken) -> Result<bool, AuthError> {
        Ok(self.tokens.remove(token.as_str()).is_some())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, AuthError> {
        let mut removed = 0;
        self.tokens.retain(|_, expires_at| {
            let keep = *expires_at > now;
            if !keep {
                removed += 1;
            }
            keep
        });
        Ok(removed)
    }
}
