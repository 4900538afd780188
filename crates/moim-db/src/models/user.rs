//! User database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for users table
///
/// `password_hash` is NULL for OAuth-only accounts.
#[derive(Debug, Clone, FromRow)]
pub struct UserModel {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub password_hash: Option<String>,
    pub role: String,
    pub joined_type: String,
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
