//! User handlers
//!
//! The caller's own account plus public profile lookups.

use axum::{
    extract::{Path, State},
    Json,
};
use moim_core::MemberRole;
use moim_service::{
    AuthService, ChangePasswordRequest, CurrentUserResponse, DeleteAccountRequest,
    GatheringResponse, GatheringService, PublicUserResponse, UpdateUserRequest, UserService,
};
use serde::Deserialize;

use crate::extractors::{ApiQuery, AuthUser, UserIdPath, ValidatedJson};
use crate::response::{ApiError, ApiResponse, ApiResult};
use crate::state::AppState;

/// Get the current user's profile
///
/// GET /users/me
pub async fn get_current_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<ApiResponse<CurrentUserResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.me(auth.user_id).await?;
    Ok(ApiResponse::ok("Profile", response))
}

/// Update the current user's profile
///
/// PATCH /users/me
pub async fn update_current_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<ApiResponse<CurrentUserResponse>> {
    let service = UserService::new(state.service_context());
    let response = service.update_profile(auth.user_id, request).await?;
    Ok(ApiResponse::ok("Profile updated", response))
}

/// Change the current user's password
///
/// POST /users/me/password
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> ApiResult<ApiResponse<serde_json::Value>> {
    let service = UserService::new(state.service_context());
    service.change_password(auth.user_id, request).await?;
    Ok(ApiResponse::message("Password changed"))
}

/// Soft-delete the current user's account
///
/// DELETE /users/me
pub async fn delete_account(
    State(state): State<AppState>,
    auth: AuthUser,
    body: Option<Json<DeleteAccountRequest>>,
) -> ApiResult<ApiResponse<serde_json::Value>> {
    let service = UserService::new(state.service_context());
    let request = body.map(|b| b.0).unwrap_or_default();
    service.delete_account(auth.user_id, request).await?;
    Ok(ApiResponse::message("Account deleted"))
}

/// Query parameters for the caller's gathering list
#[derive(Debug, Deserialize)]
pub struct MyGatheringsQuery {
    pub role: Option<String>,
}

/// Gatherings the current user belongs to
///
/// GET /users/me/gatherings
pub async fn my_gatherings(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(params): ApiQuery<MyGatheringsQuery>,
) -> ApiResult<ApiResponse<Vec<GatheringResponse>>> {
    let role = match params.role.as_deref() {
        None => None,
        Some("leader") => Some(MemberRole::Leader),
        Some("participant") => Some(MemberRole::Participant),
        Some(other) => {
            return Err(ApiError::invalid_query(format!("Unknown role: {other}")));
        }
    };

    let service = GatheringService::new(state.service_context());
    let response = service.my_gatherings(auth.user_id, role).await?;
    Ok(ApiResponse::ok("My gatherings", response))
}

/// View another user's public profile
///
/// GET /users/:user_id
pub async fn get_user(
    State(state): State<AppState>,
    Path(path): Path<UserIdPath>,
) -> ApiResult<ApiResponse<PublicUserResponse>> {
    let user_id = path.user_id()?;
    let service = UserService::new(state.service_context());
    let response = service.get_user(user_id).await?;
    Ok(ApiResponse::ok("User profile", response))
}
