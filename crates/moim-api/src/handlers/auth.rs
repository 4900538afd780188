//! Authentication handlers
//!
//! Endpoints for signup, login, token refresh, email verification,
//! and Kakao OAuth login.

use axum::{extract::State, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use moim_service::{
    AuthResponse, AuthService, EmailService, KakaoLoginRequest, LoginRequest, LogoutRequest,
    OAuthService, RefreshTokenRequest, RegisterRequest, SendVerificationRequest,
    VerificationSentResponse, VerifyEmailRequest,
};

use crate::extractors::{AuthUser, ValidatedJson, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
use crate::response::{ApiError, ApiResponse, ApiResult};
use crate::state::AppState;

fn auth_cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

/// Attach both token cookies so browser clients stay authenticated
fn with_auth_cookies(jar: CookieJar, response: &AuthResponse) -> CookieJar {
    jar.add(auth_cookie(
        ACCESS_TOKEN_COOKIE,
        response.access_token.clone(),
    ))
    .add(auth_cookie(
        REFRESH_TOKEN_COOKIE,
        response.refresh_token.clone(),
    ))
}

fn without_auth_cookies(jar: CookieJar) -> CookieJar {
    jar.remove(auth_cookie(ACCESS_TOKEN_COOKIE, String::new()))
        .remove(auth_cookie(REFRESH_TOKEN_COOKIE, String::new()))
}

fn refresh_token_cookie(jar: &CookieJar) -> Option<String> {
    jar.get(REFRESH_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
}

/// Register a new account
///
/// POST /auth/signup
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<ApiResponse<AuthResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.register(request).await?;
    Ok(ApiResponse::created("Signup successful", response))
}

/// Login with email and password
///
/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<(CookieJar, ApiResponse<AuthResponse>)> {
    let service = AuthService::new(state.service_context());
    let response = service.login(request).await?;
    let jar = with_auth_cookies(jar, &response);
    Ok((jar, ApiResponse::ok("Login successful", response)))
}

/// Rotate the refresh token and issue a new pair
///
/// POST /auth/refresh
///
/// The token comes from the body or, for browser clients, the
/// `refresh_token` cookie.
pub async fn refresh_token(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Option<Json<RefreshTokenRequest>>,
) -> ApiResult<(CookieJar, ApiResponse<AuthResponse>)> {
    let refresh_token = body
        .map(|b| b.0.refresh_token)
        .or_else(|| refresh_token_cookie(&jar))
        .ok_or(ApiError::MissingAuth)?;

    let service = AuthService::new(state.service_context());
    let response = service
        .refresh_tokens(RefreshTokenRequest { refresh_token })
        .await?;
    let jar = with_auth_cookies(jar, &response);
    Ok((jar, ApiResponse::ok("Token refreshed", response)))
}

/// Logout, revoke the refresh token, and clear the token cookies
///
/// POST /auth/logout
pub async fn logout(
    State(state): State<AppState>,
    _auth: AuthUser,
    jar: CookieJar,
    body: Option<Json<LogoutRequest>>,
) -> ApiResult<(CookieJar, ApiResponse<serde_json::Value>)> {
    let service = AuthService::new(state.service_context());
    let mut request = body.map(|b| b.0).unwrap_or_default();
    if request.refresh_token.is_none() {
        request.refresh_token = refresh_token_cookie(&jar);
    }
    service.logout(request).await?;
    Ok((
        without_auth_cookies(jar),
        ApiResponse::message("Logout successful"),
    ))
}

/// Send a verification code to an email address
///
/// POST /auth/email/request-code
pub async fn request_verification_code(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SendVerificationRequest>,
) -> ApiResult<ApiResponse<VerificationSentResponse>> {
    let service = EmailService::new(state.service_context());
    let response = service.send_verification(request).await?;
    Ok(ApiResponse::ok("Verification code sent", response))
}

/// Verify an emailed code
///
/// POST /auth/email/verify-code
pub async fn verify_code(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<VerifyEmailRequest>,
) -> ApiResult<ApiResponse<serde_json::Value>> {
    let service = EmailService::new(state.service_context());
    service.verify_email(request).await?;
    Ok(ApiResponse::message("Email verified"))
}

/// Login (or register) through Kakao OAuth
///
/// POST /auth/oauth/kakao
pub async fn kakao_login(
    State(state): State<AppState>,
    Json(request): Json<KakaoLoginRequest>,
) -> ApiResult<ApiResponse<AuthResponse>> {
    let service = OAuthService::new(state.service_context(), &state.config().kakao);
    let response = service.kakao_login(request).await?;
    Ok(ApiResponse::ok("Login successful", response))
}
