//! Authentication extractor
//!
//! Extracts and validates JWT access tokens. The token comes from the
//! `Authorization: Bearer` header or, failing that, the `access_token`
//! HttpOnly cookie.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    extract::cookie::CookieJar,
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use moim_core::Snowflake;

use crate::response::ApiError;
use crate::state::AppState;

/// Cookie carrying the access token for browser clients
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
/// Cookie carrying the refresh token for browser clients
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

/// Authenticated user extracted from JWT token
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// User ID from the JWT token
    pub user_id: Snowflake,
}

impl AuthUser {
    /// Create a new AuthUser
    pub fn new(user_id: Snowflake) -> Self {
        Self { user_id }
    }
}

/// Pull the raw access token from the header or cookie
async fn extract_token<S: Send + Sync>(parts: &mut Parts, state: &S) -> Option<String> {
    if let Ok(TypedHeader(Authorization(bearer))) =
        TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state).await
    {
        return Some(bearer.token().to_string());
    }

    CookieJar::from_headers(&parts.headers)
        .get(ACCESS_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
}

fn validate_token(app_state: &AppState, token: &str) -> Result<AuthUser, ApiError> {
    let claims = app_state
        .jwt_service()
        .validate_access_token(token)
        .map_err(|e| {
            tracing::warn!(error = %e, "Invalid access token");
            ApiError::InvalidAuthFormat
        })?;

    let user_id = claims.user_id().map_err(|e| {
        tracing::warn!(error = %e, "Invalid user ID in token");
        ApiError::InvalidAuthFormat
    })?;

    Ok(AuthUser::new(user_id))
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_token(parts, state)
            .await
            .ok_or(ApiError::MissingAuth)?;

        let app_state = AppState::from_ref(state);
        validate_token(&app_state, &token)
    }
}

/// Optional authenticated user
///
/// Returns None if no token is present, or an error if a token is
/// present but invalid.
#[derive(Debug, Clone)]
pub struct OptionalAuthUser(pub Option<AuthUser>);

#[async_trait]
impl<S> FromRequestParts<S> for OptionalAuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match extract_token(parts, state).await {
            Some(token) => {
                let app_state = AppState::from_ref(state);
                let user = validate_token(&app_state, &token)?;
                Ok(OptionalAuthUser(Some(user)))
            }
            None => Ok(OptionalAuthUser(None)),
        }
    }
}
