//! Membership handlers
//!
//! Join requests and the approve/reject/cancel/leave/remove lifecycle.

use axum::extract::{Path, State};
use moim_core::MemberStatus;
use moim_service::{MemberResponse, MemberService, MyMembershipResponse};
use serde::Deserialize;

use crate::extractors::{ApiQuery, AuthUser, GatheringIdPath, GatheringMemberPath};
use crate::response::{ApiError, ApiResponse, ApiResult};
use crate::state::AppState;

/// Request to join a gathering
///
/// POST /gatherings/:gathering_id/members
pub async fn request_join(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<GatheringIdPath>,
) -> ApiResult<ApiResponse<MemberResponse>> {
    let gathering_id = path.gathering_id()?;
    let service = MemberService::new(state.service_context());
    let response = service.request_join(gathering_id, auth.user_id).await?;
    Ok(ApiResponse::created("Join requested", response))
}

/// Query parameters for the member list
#[derive(Debug, Default, Deserialize)]
pub struct MemberListQuery {
    pub status: Option<String>,
}

/// List members of a gathering
///
/// GET /gatherings/:gathering_id/members
pub async fn list_members(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<GatheringIdPath>,
    ApiQuery(params): ApiQuery<MemberListQuery>,
) -> ApiResult<ApiResponse<Vec<MemberResponse>>> {
    let gathering_id = path.gathering_id()?;
    let status = match params.status.as_deref() {
        None => None,
        Some("pending") => Some(MemberStatus::Pending),
        Some("approved") => Some(MemberStatus::Approved),
        Some("rejected") => Some(MemberStatus::Rejected),
        Some(other) => {
            return Err(ApiError::invalid_query(format!("Unknown status: {other}")));
        }
    };

    let service = MemberService::new(state.service_context());
    let response = service.list(gathering_id, auth.user_id, status).await?;
    Ok(ApiResponse::ok("Members", response))
}

/// The caller's own standing in the gathering
///
/// GET /gatherings/:gathering_id/members/me
pub async fn my_membership(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<GatheringIdPath>,
) -> ApiResult<ApiResponse<MyMembershipResponse>> {
    let gathering_id = path.gathering_id()?;
    let service = MemberService::new(state.service_context());
    let response = service.my_membership(gathering_id, auth.user_id).await?;
    Ok(ApiResponse::ok("Membership", response))
}

/// Cancel one's own pending request
///
/// POST /gatherings/:gathering_id/members/me/cancel
pub async fn cancel_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<GatheringIdPath>,
) -> ApiResult<ApiResponse<serde_json::Value>> {
    let gathering_id = path.gathering_id()?;
    let service = MemberService::new(state.service_context());
    service.cancel(gathering_id, auth.user_id).await?;
    Ok(ApiResponse::message("Join request cancelled"))
}

/// Leave a gathering
///
/// DELETE /gatherings/:gathering_id/members/me
pub async fn leave_gathering(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<GatheringIdPath>,
) -> ApiResult<ApiResponse<serde_json::Value>> {
    let gathering_id = path.gathering_id()?;
    let service = MemberService::new(state.service_context());
    service.leave(gathering_id, auth.user_id).await?;
    Ok(ApiResponse::message("Left the gathering"))
}

/// Approve a pending member (owner only)
///
/// POST /gatherings/:gathering_id/members/:member_id/approve
pub async fn approve_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<GatheringMemberPath>,
) -> ApiResult<ApiResponse<MemberResponse>> {
    let gathering_id = path.gathering_id()?;
    let member_id = path.member_id()?;
    let service = MemberService::new(state.service_context());
    let response = service
        .approve(gathering_id, member_id, auth.user_id)
        .await?;
    Ok(ApiResponse::ok("Member approved", response))
}

/// Reject a pending member (owner only)
///
/// POST /gatherings/:gathering_id/members/:member_id/reject
pub async fn reject_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<GatheringMemberPath>,
) -> ApiResult<ApiResponse<MemberResponse>> {
    let gathering_id = path.gathering_id()?;
    let member_id = path.member_id()?;
    let service = MemberService::new(state.service_context());
    let response = service
        .reject(gathering_id, member_id, auth.user_id)
        .await?;
    Ok(ApiResponse::ok("Member rejected", response))
}

/// Remove an approved member (owner only)
///
/// DELETE /gatherings/:gathering_id/members/:member_id
pub async fn remove_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<GatheringMemberPath>,
) -> ApiResult<ApiResponse<serde_json::Value>> {
    let gathering_id = path.gathering_id()?;
    let member_id = path.member_id()?;
    let service = MemberService::new(state.service_context());
    service
        .remove(gathering_id, member_id, auth.user_id)
        .await?;
    Ok(ApiResponse::message("Member removed"))
}
