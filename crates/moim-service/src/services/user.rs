//! User service
//!
//! Profile reads and updates, password changes, and account deletion.

use chrono::Utc;
use moim_common::auth::{hash_password, validate_password_strength, verify_password};
use moim_core::{Snowflake, UserRole};
use tracing::{info, instrument, warn};

use crate::dto::{
    ChangePasswordRequest, CurrentUserResponse, DeleteAccountRequest, PublicUserResponse,
    UpdateUserRequest,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// User service
pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    /// Create a new UserService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// View another user's public profile
    #[instrument(skip(self))]
    pub async fn get_user(&self, user_id: Snowflake) -> ServiceResult<PublicUserResponse> {
        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .filter(|u| !u.is_deleted)
            .ok_or_else(|| ServiceError::not_found("User", user_id.to_string()))?;

        Ok(PublicUserResponse::from(&user))
    }

    /// The role of an active account, for permission checks
    #[instrument(skip(self))]
    pub async fn role_of(&self, user_id: Snowflake) -> ServiceResult<UserRole> {
        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .filter(|u| !u.is_deleted && u.is_active)
            .ok_or_else(|| ServiceError::not_found("User", user_id.to_string()))?;

        Ok(user.role)
    }

    /// Update the caller's profile
    #[instrument(skip(self, request))]
    pub async fn update_profile(
        &self,
        user_id: Snowflake,
        request: UpdateUserRequest,
    ) -> ServiceResult<CurrentUserResponse> {
        let mut user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", user_id.to_string()))?;

        if let Some(username) = request.username {
            user.username = username;
        }
        if let Some(profile) = request.profile {
            user.profile = Some(profile);
        }
        if let Some(education_level) = request.education_level {
            user.education_level = Some(education_level);
        }
        if let Some(location) = request.location {
            user.location = Some(location);
        }
        user.updated_at = Utc::now();

        self.ctx.user_repo().update(&user).await?;

        info!(user_id = %user_id, "Profile updated");

        Ok(CurrentUserResponse::from(&user))
    }

    /// Change password after re-checking the current one
    #[instrument(skip(self, request))]
    pub async fn change_password(
        &self,
        user_id: Snowflake,
        request: ChangePasswordRequest,
    ) -> ServiceResult<()> {
        validate_password_strength(&request.new_password).map_err(ServiceError::from)?;

        let current_hash = self
            .ctx
            .user_repo()
            .get_password_hash(user_id)
            .await?
            .ok_or_else(|| {
                // OAuth-only accounts cannot change a password
                ServiceError::validation("Account has no password")
            })?;

        let is_valid = verify_password(&request.current_password, &current_hash)
            .map_err(|e| ServiceError::internal(e.to_string()))?;
        if !is_valid {
            warn!(user_id = %user_id, "Password change failed: wrong current password");
            return Err(ServiceError::App(
                moim_common::AppError::InvalidCredentials,
            ));
        }

        let new_hash = hash_password(&request.new_password)
            .map_err(|e| ServiceError::internal(e.to_string()))?;
        self.ctx
            .user_repo()
            .update_password(user_id, &new_hash)
            .await?;

        // Force re-login everywhere
        self.ctx
            .refresh_token_store()
            .revoke_all_for_user(user_id)
            .await?;

        info!(user_id = %user_id, "Password changed");

        Ok(())
    }

    /// Soft-delete the caller's account
    ///
    /// Identifying fields are anonymized immediately; the row is purged after
    /// the retention period. Password accounts must re-enter their password.
    #[instrument(skip(self, request))]
    pub async fn delete_account(
        &self,
        user_id: Snowflake,
        request: DeleteAccountRequest,
    ) -> ServiceResult<()> {
        let mut user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", user_id.to_string()))?;

        if let Some(hash) = self.ctx.user_repo().get_password_hash(user_id).await? {
            let password = request
                .password
                .ok_or_else(|| ServiceError::validation("Password is required"))?;
            let is_valid = verify_password(&password, &hash)
                .map_err(|e| ServiceError::internal(e.to_string()))?;
            if !is_valid {
                return Err(ServiceError::App(
                    moim_common::AppError::InvalidCredentials,
                ));
            }
        }

        user.soft_delete(Utc::now());
        self.ctx.user_repo().update(&user).await?;

        self.ctx
            .refresh_token_store()
            .revoke_all_for_user(user_id)
            .await?;

        info!(user_id = %user_id, "Account soft-deleted");

        Ok(())
    }

    /// Hard-delete accounts whose purge date has passed
    ///
    /// Called by the background sweep.
    #[instrument(skip(self))]
    pub async fn purge_expired_accounts(&self) -> ServiceResult<u64> {
        let purged = self.ctx.user_repo().purge_expired(Utc::now()).await?;
        if purged > 0 {
            info!(purged = purged, "Purged expired accounts");
        }
        Ok(purged)
    }
}
