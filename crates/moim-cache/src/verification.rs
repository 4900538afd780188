//! Email verification codes in Redis.
//!
//! A six-digit code is issued per address with a short TTL. A successful check
//! consumes the code and leaves a verified flag that registration reads.

use crate::pool::{RedisPool, RedisResult};
use rand::Rng;

const CODE_PREFIX: &str = "email_code:";
const VERIFIED_PREFIX: &str = "email_verified:";

/// Code lifetime (5 minutes)
const CODE_TTL_SECS: u64 = 5 * 60;

/// How long a verified address stays usable for registration (1 hour)
const VERIFIED_TTL_SECS: u64 = 60 * 60;

/// Result of checking a verification code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// Code matched; address is now flagged verified
    Verified,
    /// Code did not match or was never issued
    Invalid,
}

/// Store for email verification codes and verified flags
#[derive(Clone)]
pub struct EmailVerificationStore {
    pool: RedisPool,
}

impl EmailVerificationStore {
    /// Create a new verification store
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    fn code_key(email: &str) -> String {
        format!("{CODE_PREFIX}{email}")
    }

    fn verified_key(email: &str) -> String {
        format!("{VERIFIED_PREFIX}{email}")
    }

    /// Generate a six-digit code
    #[must_use]
    pub fn generate_code() -> String {
        let n: u32 = rand::thread_rng().gen_range(0..1_000_000);
        format!("{n:06}")
    }

    /// Issue a code for an address, replacing any previous one.
    ///
    /// Returns the code so the caller can send it.
    pub async fn issue(&self, email: &str) -> RedisResult<String> {
        let code = Self::generate_code();
        self.pool
            .set(&Self::code_key(email), &code, Some(CODE_TTL_SECS))
            .await?;

        tracing::debug!(email = %email, "Issued verification code");

        Ok(code)
    }

    /// Check a code. A match consumes the code and flags the address verified.
    pub async fn check(&self, email: &str, code: &str) -> RedisResult<VerificationOutcome> {
        let stored: Option<String> = self.pool.get_value(&Self::code_key(email)).await?;

        match stored {
            Some(ref s) if s == code => {
                self.pool.delete(&Self::code_key(email)).await?;
                self.pool
                    .set(&Self::verified_key(email), &true, Some(VERIFIED_TTL_SECS))
                    .await?;

                tracing::debug!(email = %email, "Email verified");

                Ok(VerificationOutcome::Verified)
            }
            _ => Ok(VerificationOutcome::Invalid),
        }
    }

    /// Whether the address has a live verified flag.
    pub async fn is_verified(&self, email: &str) -> RedisResult<bool> {
        let flag: Option<bool> = self.pool.get_value(&Self::verified_key(email)).await?;
        Ok(flag.unwrap_or(false))
    }

    /// Drop the verified flag (after registration consumes it).
    pub async fn clear_verified(&self, email: &str) -> RedisResult<()> {
        self.pool.delete(&Self::verified_key(email)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_code_is_six_digits() {
        for _ in 0..100 {
            let code = EmailVerificationStore::generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_key_formats() {
        assert_eq!(
            EmailVerificationStore::code_key("a@b.com"),
            "email_code:a@b.com"
        );
        assert_eq!(
            EmailVerificationStore::verified_key("a@b.com"),
            "email_verified:a@b.com"
        );
    }
}
