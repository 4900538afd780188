//! Kakao OAuth service
//!
//! Exchanges an authorization code for a Kakao access token, fetches the
//! account's email, and signs the user in, creating the account on first
//! login.

use moim_common::KakaoConfig;
use moim_core::entities::{JoinedType, User};
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::dto::{AuthResponse, KakaoLoginRequest};

use super::auth::AuthService;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

const KAKAO_TOKEN_URL: &str = "https://kauth.kakao.com/oauth/token";
const KAKAO_USER_URL: &str = "https://kapi.kakao.com/v2/user/me";

#[derive(Debug, Deserialize)]
struct KakaoTokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct KakaoUserResponse {
    id: i64,
    kakao_account: Option<KakaoAccount>,
}

#[derive(Debug, Deserialize)]
struct KakaoAccount {
    email: Option<String>,
    profile: Option<KakaoProfile>,
}

#[derive(Debug, Deserialize)]
struct KakaoProfile {
    nickname: Option<String>,
}

/// Kakao OAuth service
pub struct OAuthService<'a> {
    ctx: &'a ServiceContext,
    config: &'a KakaoConfig,
    client: reqwest::Client,
}

impl<'a> OAuthService<'a> {
    /// Create a new OAuthService
    pub fn new(ctx: &'a ServiceContext, config: &'a KakaoConfig) -> Self {
        Self {
            ctx,
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Complete the Kakao login flow with an authorization code
    #[instrument(skip(self, request))]
    pub async fn kakao_login(&self, request: KakaoLoginRequest) -> ServiceResult<AuthResponse> {
        if !self.config.is_configured() {
            return Err(ServiceError::App(moim_common::AppError::ExternalService(
                "Kakao OAuth is not configured".to_string(),
            )));
        }

        let access_token = self.exchange_code(&request.code).await?;
        let kakao_user = self.fetch_user(&access_token).await?;

        let account = kakao_user.kakao_account.unwrap_or(KakaoAccount {
            email: None,
            profile: None,
        });
        let email = account.email.ok_or_else(|| {
            warn!(kakao_id = kakao_user.id, "Kakao account has no email");
            ServiceError::validation("Kakao account did not provide an email")
        })?;

        let user = match self.ctx.user_repo().find_by_email(&email).await? {
            Some(user) => {
                if user.is_deleted || !user.is_active {
                    return Err(ServiceError::Domain(
                        moim_core::DomainError::AccountDeactivated,
                    ));
                }
                user
            }
            None => {
                let username = account
                    .profile
                    .and_then(|p| p.nickname)
                    .unwrap_or_else(|| format!("kakao_{}", kakao_user.id));

                let user_id = self.ctx.generate_id();
                let user = User::new(user_id, email.clone(), username, JoinedType::Kakao);

                // OAuth accounts carry no password hash
                self.ctx.user_repo().create(&user, None).await?;

                info!(user_id = %user_id, "Kakao user registered");
                user
            }
        };

        info!(user_id = %user.id, "Kakao login successful");

        AuthService::new(self.ctx).issue_tokens(&user).await
    }

    /// Exchange the authorization code for an access token
    async fn exchange_code(&self, code: &str) -> ServiceResult<String> {
        let params = [
            ("grant_type", "authorization_code"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("code", code),
        ];

        let response = self
            .client
            .post(KAKAO_TOKEN_URL)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                ServiceError::App(moim_common::AppError::ExternalService(e.to_string()))
            })?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "Kakao token exchange failed");
            return Err(ServiceError::App(moim_common::AppError::ExternalService(
                "Kakao token exchange failed".to_string(),
            )));
        }

        let token: KakaoTokenResponse = response.json().await.map_err(|e| {
            ServiceError::App(moim_common::AppError::ExternalService(e.to_string()))
        })?;

        Ok(token.access_token)
    }

    /// Fetch the Kakao account behind an access token
    async fn fetch_user(&self, access_token: &str) -> ServiceResult<KakaoUserResponse> {
        let response = self
            .client
            .get(KAKAO_USER_URL)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| {
                ServiceError::App(moim_common::AppError::ExternalService(e.to_string()))
            })?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "Kakao user fetch failed");
            return Err(ServiceError::App(moim_common::AppError::ExternalService(
                "Kakao user fetch failed".to_string(),
            )));
        }

        response.json().await.map_err(|e| {
            ServiceError::App(moim_common::AppError::ExternalService(e.to_string()))
        })
    }
}
