//! User entity - represents a platform account

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Platform role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    User,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "user" => Some(Self::User),
            _ => None,
        }
    }
}

/// How the account was created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinedType {
    Normal,
    Kakao,
    Google,
    Naver,
}

impl JoinedType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Kakao => "kakao",
            Self::Google => "google",
            Self::Naver => "naver",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "normal" => Some(Self::Normal),
            "kakao" => Some(Self::Kakao),
            "google" => Some(Self::Google),
            "naver" => Some(Self::Naver),
            _ => None,
        }
    }
}

/// User account entity
///
/// The password hash never lives on the entity; it is written and read
/// through dedicated repository methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Snowflake,
    pub email: String,
    pub username: String,
    pub role: UserRole,
    pub joined_type: JoinedType,
    pub profile: Option<String>,
    pub education_level: Option<String>,
    pub location: Option<String>,
    pub failed_login_attempts: i32,
    pub last_failed_login: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub deletion_scheduled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Maximum consecutive login failures before the account locks
    pub const MAX_LOGIN_FAILURES: i32 = 5;
    /// Failure window / lockout duration in minutes
    pub const LOCKOUT_MINUTES: i64 = 30;
    /// Days between soft delete and hard purge
    pub const PURGE_AFTER_DAYS: i64 = 90;

    /// Create a new active account
    pub fn new(id: Snowflake, email: String, username: String, joined_type: JoinedType) -> Self {
        let now = Utc::now();
        Self {
            id,
            email,
            username,
            role: UserRole::User,
            joined_type,
            profile: None,
            education_level: None,
            location: None,
            failed_login_attempts: 0,
            last_failed_login: None,
            is_active: true,
            is_deleted: false,
            deleted_at: None,
            deletion_scheduled_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Check whether the account is locked out at `now`
    ///
    /// Locked when the failure counter reached the cap and the last failure
    /// is still inside the lockout window.
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        if self.failed_login_attempts < Self::MAX_LOGIN_FAILURES {
            return false;
        }
        match self.last_failed_login {
            Some(last) => now - last < Duration::minutes(Self::LOCKOUT_MINUTES),
            None => false,
        }
    }

    /// Record a failed login attempt
    ///
    /// The counter resets when the previous failure fell outside the window.
    pub fn record_login_failure(&mut self, now: DateTime<Utc>) {
        let window_expired = self
            .last_failed_login
            .is_some_and(|last| now - last >= Duration::minutes(Self::LOCKOUT_MINUTES));
        if window_expired {
            self.failed_login_attempts = 0;
        }
        self.failed_login_attempts += 1;
        self.last_failed_login = Some(now);
        self.updated_at = now;
    }

    /// Clear the failure counter after a successful login
    pub fn reset_login_failures(&mut self) {
        self.failed_login_attempts = 0;
        self.last_failed_login = None;
        self.updated_at = Utc::now();
    }

    /// Soft delete: anonymize identifying fields and schedule the purge
    pub fn soft_delete(&mut self, now: DateTime<Utc>) {
        self.email = format!("deleted_{}@deleted.invalid", self.id);
        self.username = format!("deleted_{}", self.id);
        self.profile = None;
        self.education_level = None;
        self.location = None;
        self.is_active = false;
        self.is_deleted = true;
        self.deleted_at = Some(now);
        self.deletion_scheduled_at = Some(now + Duration::days(Self::PURGE_AFTER_DAYS));
        self.updated_at = now;
    }

    /// Whether the purge date has passed
    pub fn purge_due(&self, now: DateTime<Utc>) -> bool {
        self.is_deleted && self.deletion_scheduled_at.is_some_and(|at| at <= now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User::new(
            Snowflake::new(1),
            "a@example.com".to_string(),
            "alice".to_string(),
            JoinedType::Normal,
        )
    }

    #[test]
    fn test_new_user_defaults() {
        let u = user();
        assert_eq!(u.role, UserRole::User);
        assert!(u.is_active);
        assert!(!u.is_deleted);
        assert_eq!(u.failed_login_attempts, 0);
    }

    #[test]
    fn test_lockout_after_five_failures() {
        let mut u = user();
        let now = Utc::now();
        for _ in 0..4 {
            u.record_login_failure(now);
            assert!(!u.is_locked(now));
        }
        u.record_login_failure(now);
        assert!(u.is_locked(now));
    }

    #[test]
    fn test_lockout_expires_after_window() {
        let mut u = user();
        let now = Utc::now();
        for _ in 0..5 {
            u.record_login_failure(now);
        }
        assert!(u.is_locked(now));
        assert!(!u.is_locked(now + Duration::minutes(31)));
    }

    #[test]
    fn test_failure_counter_resets_after_window() {
        let mut u = user();
        let now = Utc::now();
        for _ in 0..4 {
            u.record_login_failure(now);
        }
        // Fifth failure lands outside the window, so it starts a new count
        u.record_login_failure(now + Duration::minutes(31));
        assert_eq!(u.failed_login_attempts, 1);
    }

    #[test]
    fn test_soft_delete_anonymizes() {
        let mut u = user();
        let now = Utc::now();
        u.soft_delete(now);
        assert!(u.is_deleted);
        assert!(!u.is_active);
        assert!(u.email.starts_with("deleted_"));
        assert!(!u.purge_due(now));
        assert!(u.purge_due(now + Duration::days(91)));
    }

    #[test]
    fn test_role_parse() {
        assert_eq!(UserRole::parse("admin"), Some(UserRole::Admin));
        assert_eq!(UserRole::parse("owner"), None);
        assert_eq!(JoinedType::parse("kakao"), Some(JoinedType::Kakao));
    }
}
