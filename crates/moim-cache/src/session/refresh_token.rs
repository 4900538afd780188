//! Refresh token storage in Redis.
//!
//! Tokens rotate on every refresh: the presented token is consumed and a new
//! one stored, so a replayed token is rejected.

use crate::pool::{RedisPool, RedisResult};
use moim_core::Snowflake;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};

/// Key prefix for refresh tokens
const REFRESH_TOKEN_PREFIX: &str = "refresh_token:";

/// Default TTL for refresh tokens (7 days)
const DEFAULT_REFRESH_TOKEN_TTL: u64 = 7 * 24 * 60 * 60;

/// Stored refresh token data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenData {
    /// User ID this token belongs to
    pub user_id: Snowflake,
    /// Token creation timestamp (Unix epoch seconds)
    pub created_at: i64,
}

impl RefreshTokenData {
    /// Create new refresh token data
    #[must_use]
    pub fn new(user_id: Snowflake) -> Self {
        Self {
            user_id,
            created_at: chrono::Utc::now().timestamp(),
        }
    }
}

/// Refresh token store for managing authentication sessions
#[derive(Clone)]
pub struct RefreshTokenStore {
    pool: RedisPool,
    ttl_seconds: u64,
}

impl RefreshTokenStore {
    /// Create a new refresh token store
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self {
            pool,
            ttl_seconds: DEFAULT_REFRESH_TOKEN_TTL,
        }
    }

    /// Create with custom TTL
    #[must_use]
    pub fn with_ttl(pool: RedisPool, ttl_seconds: u64) -> Self {
        Self { pool, ttl_seconds }
    }

    fn key(token_id: &str) -> String {
        format!("{REFRESH_TOKEN_PREFIX}{token_id}")
    }

    fn user_set_key(user_id: Snowflake) -> String {
        format!("user_tokens:{user_id}")
    }

    /// Store a refresh token
    pub async fn store(&self, token_id: &str, data: &RefreshTokenData) -> RedisResult<()> {
        let key = Self::key(token_id);
        self.pool.set(&key, data, Some(self.ttl_seconds)).await?;

        // Track token in the user's set for revoke-all
        let user_set_key = Self::user_set_key(data.user_id);
        let mut conn = self.pool.get().await?;
        conn.sadd::<_, _, ()>(&user_set_key, token_id).await?;
        conn.expire::<_, ()>(&user_set_key, self.ttl_seconds as i64)
            .await?;

        tracing::debug!(
            token_id = %token_id,
            user_id = %data.user_id,
            "Stored refresh token"
        );

        Ok(())
    }

    /// Get refresh token data
    pub async fn get(&self, token_id: &str) -> RedisResult<Option<RefreshTokenData>> {
        let key = Self::key(token_id);
        self.pool.get_value(&key).await
    }

    /// Consume a token: return its data and delete it in one step.
    ///
    /// Returns `None` if the token is unknown or already used.
    pub async fn consume(&self, token_id: &str) -> RedisResult<Option<RefreshTokenData>> {
        let data = self.get(token_id).await?;
        if data.is_some() {
            self.revoke(token_id).await?;
        }
        Ok(data)
    }

    /// Revoke (delete) a refresh token
    pub async fn revoke(&self, token_id: &str) -> RedisResult<bool> {
        if let Some(data) = self.get(token_id).await? {
            let user_set_key = Self::user_set_key(data.user_id);
            let mut conn = self.pool.get().await?;
            conn.srem::<_, _, ()>(&user_set_key, token_id).await?;
        }

        let key = Self::key(token_id);
        let deleted = self.pool.delete(&key).await?;

        if deleted {
            tracing::debug!(token_id = %token_id, "Revoked refresh token");
        }

        Ok(deleted)
    }

    /// Revoke all tokens for a user (logout from all devices)
    pub async fn revoke_all_for_user(&self, user_id: Snowflake) -> RedisResult<u32> {
        let user_set_key = Self::user_set_key(user_id);
        let mut conn = self.pool.get().await?;

        let token_ids: Vec<String> = conn.smembers(&user_set_key).await?;
        let count = token_ids.len() as u32;

        if !token_ids.is_empty() {
            let keys: Vec<String> = token_ids.iter().map(|id| Self::key(id)).collect();
            let keys_refs: Vec<&str> = keys.iter().map(String::as_str).collect();
            self.pool.delete_many(&keys_refs).await?;
        }

        conn.del::<_, ()>(&user_set_key).await?;

        tracing::debug!(user_id = %user_id, count = count, "Revoked all refresh tokens");

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_token_key() {
        assert_eq!(
            RefreshTokenStore::key("abc123"),
            "refresh_token:abc123"
        );
    }

    #[test]
    fn test_refresh_token_data_roundtrip() {
        let data = RefreshTokenData::new(Snowflake::from(42i64));
        let json = serde_json::to_string(&data).unwrap();
        let parsed: RefreshTokenData = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.user_id, data.user_id);
        assert_eq!(parsed.created_at, data.created_at);
    }
}
