//! Authentication service
//!
//! Handles registration, login with lockout, token refresh with rotation,
//! and logout.

use chrono::Utc;
use moim_cache::{RateWindow, RefreshTokenData};
use moim_common::auth::{hash_password, validate_password_strength, verify_password};
use moim_core::entities::{JoinedType, User};
use tracing::{info, instrument, warn};

use crate::dto::{
    AuthResponse, CurrentUserResponse, LoginRequest, LogoutRequest, RefreshTokenRequest,
    RegisterRequest,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a new user
    ///
    /// The email must carry a live verified flag from the verification flow.
    #[instrument(skip(self, request), fields(username = %request.username, email = %request.email))]
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<AuthResponse> {
        validate_password_strength(&request.password).map_err(ServiceError::from)?;

        if !self
            .ctx
            .verification_store()
            .is_verified(&request.email)
            .await?
        {
            return Err(ServiceError::Domain(
                moim_core::DomainError::EmailNotVerified,
            ));
        }

        if self.ctx.user_repo().email_exists(&request.email).await? {
            return Err(ServiceError::Domain(
                moim_core::DomainError::EmailAlreadyExists,
            ));
        }

        let password_hash =
            hash_password(&request.password).map_err(|e| ServiceError::internal(e.to_string()))?;

        let user_id = self.ctx.generate_id();
        let mut user = User::new(
            user_id,
            request.email.clone(),
            request.username,
            JoinedType::Normal,
        );
        user.profile = request.profile;
        user.education_level = request.education_level;
        user.location = request.location;

        self.ctx
            .user_repo()
            .create(&user, Some(&password_hash))
            .await?;

        // The flag is single-use
        self.ctx
            .verification_store()
            .clear_verified(&request.email)
            .await?;

        info!(user_id = %user_id, "User registered successfully");

        self.issue_tokens(&user).await
    }

    /// Login with email and password
    ///
    /// Five failures inside thirty minutes lock the account for the rest of
    /// the window. Failed attempts also count against the login rate limit.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<AuthResponse> {
        let window = RateWindow::login(self.ctx.rate_limit_config().login_per_minute);
        let decision = self.ctx.rate_limiter().hit(&window, &request.email).await?;
        if !decision.is_allowed() {
            warn!(email = %request.email, "Login rate limited");
            return Err(ServiceError::App(
                moim_common::AppError::RateLimitExceeded,
            ));
        }

        let mut user = self
            .ctx
            .user_repo()
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| {
                warn!(email = %request.email, "Login failed: user not found");
                ServiceError::App(moim_common::AppError::InvalidCredentials)
            })?;

        let now = Utc::now();

        if user.is_locked(now) {
            warn!(user_id = %user.id, "Login rejected: account locked");
            return Err(ServiceError::Domain(moim_core::DomainError::AccountLocked));
        }

        if !user.is_active {
            return Err(ServiceError::Domain(
                moim_core::DomainError::AccountDeactivated,
            ));
        }

        let password_hash = self
            .ctx
            .user_repo()
            .get_password_hash(user.id)
            .await?
            .ok_or_else(|| {
                // OAuth-only accounts have no password
                warn!(user_id = %user.id, "Login failed: no password hash");
                ServiceError::App(moim_common::AppError::InvalidCredentials)
            })?;

        let is_valid = verify_password(&request.password, &password_hash)
            .map_err(|e| ServiceError::internal(e.to_string()))?;

        if !is_valid {
            user.record_login_failure(now);
            self.ctx.user_repo().update(&user).await?;

            warn!(
                user_id = %user.id,
                attempts = user.failed_login_attempts,
                "Login failed: invalid password"
            );
            return Err(ServiceError::App(
                moim_common::AppError::InvalidCredentials,
            ));
        }

        if user.failed_login_attempts > 0 {
            user.reset_login_failures();
            self.ctx.user_repo().update(&user).await?;
        }

        info!(user_id = %user.id, "User logged in successfully");

        self.issue_tokens(&user).await
    }

    /// Refresh access token using refresh token
    ///
    /// The presented refresh token is consumed; a replay after rotation fails.
    #[instrument(skip(self, request))]
    pub async fn refresh_tokens(
        &self,
        request: RefreshTokenRequest,
    ) -> ServiceResult<AuthResponse> {
        // Signature and expiry first, then the store
        self.ctx
            .jwt_service()
            .validate_refresh_token(&request.refresh_token)?;

        let refresh_data = self
            .ctx
            .refresh_token_store()
            .consume(&request.refresh_token)
            .await?
            .ok_or(ServiceError::App(moim_common::AppError::InvalidToken))?;

        let user = self
            .ctx
            .user_repo()
            .find_by_id(refresh_data.user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", refresh_data.user_id.to_string()))?;

        if user.is_deleted || !user.is_active {
            return Err(ServiceError::Domain(
                moim_core::DomainError::AccountDeactivated,
            ));
        }

        info!(user_id = %user.id, "Tokens refreshed");

        self.issue_tokens(&user).await
    }

    /// Logout: revoke the presented refresh token
    #[instrument(skip(self, request))]
    pub async fn logout(&self, request: LogoutRequest) -> ServiceResult<()> {
        if let Some(token) = request.refresh_token {
            self.ctx.refresh_token_store().revoke(&token).await?;
        }
        Ok(())
    }

    /// Current authenticated user
    #[instrument(skip(self))]
    pub async fn me(&self, user_id: moim_core::Snowflake) -> ServiceResult<CurrentUserResponse> {
        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", user_id.to_string()))?;

        Ok(CurrentUserResponse::from(&user))
    }

    /// Generate a token pair and persist the refresh token
    pub(crate) async fn issue_tokens(&self, user: &User) -> ServiceResult<AuthResponse> {
        let token_pair = self
            .ctx
            .jwt_service()
            .generate_token_pair(user.id)
            .map_err(|e| ServiceError::internal(e.to_string()))?;

        let refresh_data = RefreshTokenData::new(user.id);
        self.ctx
            .refresh_token_store()
            .store(&token_pair.refresh_token, &refresh_data)
            .await?;

        Ok(AuthResponse::new(
            token_pair.access_token,
            token_pair.refresh_token,
            token_pair.expires_in,
            CurrentUserResponse::from(user),
        ))
    }
}
