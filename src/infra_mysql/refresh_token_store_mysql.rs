use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Utc};
use sqlx::MySqlPool;

const SCHEMA: &str = include_str!("schema.sql");

/// Rows are keyed by the token's SHA-256; the full text is kept and compared
/// so membership stays an exact-string check.
pub struct MySqlRefreshTokenStore {
    pool: MySqlPool,
}

impl MySqlRefreshTokenStore {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlRefreshTokenStore { pool }
    }

    pub async fn ensure_schema(&self) -> Result<(), AuthError> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl RefreshTokenStore for MySqlRefreshTokenStore {
    async fn add(
        &self,
        token: &RefreshToken,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        sqlx::query(
            r#"
INSERT INTO authentications (token_hash, token, expires_at)
VALUES (?, ?, ?)
ON DUPLICATE KEY UPDATE expires_at = VALUES(expires_at)
"#,
        )
        .bind(token_digest(token))
        .bind(token.as_str())
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AuthError::Store(e.to_string()))?;

        Ok(())
    }

    async fn exists(&self, token: &RefreshToken) -> Result<bool, AuthError> {
        let found: Option<i64> = sqlx::query_scalar(
            r#"
SELECT 1
FROM authentications
WHERE token_hash = ? AND token = ?
"#,
        )
        .bind(token_digest(token))
        .bind(token.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::Store(e.to_string()))?;

        Ok(found.is_some())
    }

    async fn delete(&self, token: &RefreshToken) -> Result<bool, AuthError> {
        let result = sqlx::query(
            r#"
DELETE FROM authentications
WHERE token_hash = ? AND token = ?
"#,
        )
        .bind(token_digest(token))
        .bind(token.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| AuthError::Store(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, AuthError> {
        let result = sqlx::query(
            r#"
DELETE FROM authentications
WHERE expires_at <= ?
"#,
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AuthError::Store(e.to_string()))?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_fits_the_key_column() {
        let token = RefreshToken("a.b.c".to_string());
        assert_eq!(token_digest(&token).len(), 32);
        assert!(SCHEMA.contains("token_hash BINARY(32)"));
    }

    #[test]
    fn schema_can_run_on_every_start() {
        assert!(SCHEMA.trim_start().starts_with("CREATE TABLE IF NOT EXISTS authentications"));
    }
}
