//! Fixed-window rate limit counters in Redis.
//!
//! Each window is a single key incremented with INCR. The TTL is set when the
//! counter is first created, so the window expires as a whole.

use crate::pool::{RedisPool, RedisResult};
use moim_core::Snowflake;
use redis::AsyncCommands;

/// A named rate limit window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateWindow {
    /// Key namespace (e.g., "login", "email", "chat")
    pub name: &'static str,
    /// Maximum allowed hits per window
    pub limit: u32,
    /// Window length in seconds
    pub window_secs: u64,
}

impl RateWindow {
    /// Login attempts per account
    #[must_use]
    pub const fn login(limit: u32) -> Self {
        Self {
            name: "login",
            limit,
            window_secs: 60,
        }
    }

    /// Verification emails per address
    #[must_use]
    pub const fn email(limit: u32) -> Self {
        Self {
            name: "email",
            limit,
            window_secs: 3600,
        }
    }

    /// Chat messages per user
    #[must_use]
    pub const fn chat(limit: u32, window_secs: u64) -> Self {
        Self {
            name: "chat",
            limit,
            window_secs,
        }
    }
}

/// Outcome of a rate limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    /// The hit was counted and is within the limit
    Allowed { remaining: u32 },
    /// The limit is exhausted for this window
    Limited { retry_after_secs: u64 },
}

impl RateLimitDecision {
    /// Whether the request may proceed
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }
}

/// Redis-backed fixed-window rate limiter
#[derive(Clone)]
pub struct RateLimiter {
    pool: RedisPool,
}

impl RateLimiter {
    /// Create a new rate limiter
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    fn key(window: &RateWindow, subject: &str) -> String {
        format!("rate:{}:{}", window.name, subject)
    }

    /// Count a hit against the window for an arbitrary subject key.
    pub async fn hit(&self, window: &RateWindow, subject: &str) -> RedisResult<RateLimitDecision> {
        let key = Self::key(window, subject);
        let mut conn = self.pool.get().await?;

        let count: u32 = conn.incr(&key, 1u32).await?;
        if count == 1 {
            conn.expire::<_, ()>(&key, window.window_secs as i64).await?;
        }

        if count > window.limit {
            let ttl: i64 = conn.ttl(&key).await?;
            let retry_after_secs = if ttl > 0 {
                ttl as u64
            } else {
                window.window_secs
            };

            tracing::debug!(
                window = window.name,
                subject = %subject,
                count = count,
                "Rate limit exceeded"
            );

            return Ok(RateLimitDecision::Limited { retry_after_secs });
        }

        Ok(RateLimitDecision::Allowed {
            remaining: window.limit - count,
        })
    }

    /// Count a hit keyed by user ID.
    pub async fn hit_user(
        &self,
        window: &RateWindow,
        user_id: Snowflake,
    ) -> RedisResult<RateLimitDecision> {
        self.hit(window, &user_id.to_string()).await
    }

    /// Clear the window for a subject (e.g., after a successful login).
    pub async fn reset(&self, window: &RateWindow, subject: &str) -> RedisResult<()> {
        let key = Self::key(window, subject);
        self.pool.delete(&key).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_constructors() {
        let login = RateWindow::login(5);
        assert_eq!(login.limit, 5);
        assert_eq!(login.window_secs, 60);

        let email = RateWindow::email(3);
        assert_eq!(email.window_secs, 3600);

        let chat = RateWindow::chat(10, 10);
        assert_eq!(chat.limit, 10);
        assert_eq!(chat.window_secs, 10);
    }

    #[test]
    fn test_key_format() {
        let window = RateWindow::login(5);
        assert_eq!(
            RateLimiter::key(&window, "user@example.com"),
            "rate:login:user@example.com"
        );
    }

    #[test]
    fn test_decision_is_allowed() {
        assert!(RateLimitDecision::Allowed { remaining: 1 }.is_allowed());
        assert!(!RateLimitDecision::Limited {
            retry_after_secs: 30
        }
        .is_allowed());
    }
}
