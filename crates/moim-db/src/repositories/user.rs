//! PostgreSQL implementation of UserRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use moim_core::entities::User;
use moim_core::error::DomainError;
use moim_core::traits::{RepoResult, UserRepository};
use moim_core::value_objects::Snowflake;

use crate::models::UserModel;

use super::error::{map_db_error, map_unique_violation, user_not_found};

const USER_COLUMNS: &str = "id, email, username, password_hash, role, joined_type, profile, \
     education_level, location, failed_login_attempts, last_failed_login, is_active, \
     is_deleted, deleted_at, deletion_scheduled_at, created_at, updated_at";

/// PostgreSQL implementation of UserRepository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new PgUserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>> {
        let result = sqlx::query_as::<_, UserModel>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(User::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let result = sqlx::query_as::<_, UserModel>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1 AND is_deleted = FALSE"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(User::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 AND is_deleted = FALSE)",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(exists)
    }

    #[instrument(skip(self, password_hash))]
    async fn create(&self, user: &User, password_hash: Option<&str>) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id, email, username, password_hash, role, joined_type,
                profile, education_level, location, failed_login_attempts,
                last_failed_login, is_active, is_deleted, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(user.id.into_inner())
        .bind(&user.email)
        .bind(&user.username)
        .bind(password_hash)
        .bind(user.role.as_str())
        .bind(user.joined_type.as_str())
        .bind(&user.profile)
        .bind(&user.education_level)
        .bind(&user.location)
        .bind(user.failed_login_attempts)
        .bind(user.last_failed_login)
        .bind(user.is_active)
        .bind(user.is_deleted)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::EmailAlreadyExists))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn update(&self, user: &User) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET email = $2, username = $3, profile = $4, education_level = $5,
                location = $6, failed_login_attempts = $7, last_failed_login = $8,
                is_active = $9, is_deleted = $10, deleted_at = $11,
                deletion_scheduled_at = $12, updated_at = $13
            WHERE id = $1
            "#,
        )
        .bind(user.id.into_inner())
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.profile)
        .bind(&user.education_level)
        .bind(&user.location)
        .bind(user.failed_login_attempts)
        .bind(user.last_failed_login)
        .bind(user.is_active)
        .bind(user.is_deleted)
        .bind(user.deleted_at)
        .bind(user.deletion_scheduled_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(user_not_found(user.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>> {
        let hash = sqlx::query_scalar::<_, Option<String>>(
            "SELECT password_hash FROM users WHERE id = $1",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(hash.flatten())
    }

    #[instrument(skip(self, password_hash))]
    async fn update_password(&self, id: Snowflake, password_hash: &str) -> RepoResult<()> {
        let result =
            sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
                .bind(id.into_inner())
                .bind(password_hash)
                .execute(&self.pool)
                .await
                .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(user_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn purge_expired(&self, now: DateTime<Utc>) -> RepoResult<u64> {
        let result = sqlx::query(
            "DELETE FROM users WHERE is_deleted = TRUE AND deletion_scheduled_at <= $1",
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}
