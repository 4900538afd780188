//! Gathering handlers
//!
//! CRUD, status transitions, and statistics for gatherings.

use axum::{
    extract::{Path, State},
    Json,
};
use moim_service::{
    CreateGatheringRequest, GatheringDetailResponse, GatheringListQuery, GatheringResponse,
    GatheringService, GatheringStatsResponse, PaginatedResponse, UpdateGatheringRequest,
    UpdateGatheringStatusRequest,
};

use crate::extractors::{ApiQuery, AuthUser, GatheringIdPath, OptionalAuthUser, ValidatedJson};
use crate::response::{ApiResponse, ApiResult};
use crate::state::AppState;

/// Create a gathering
///
/// POST /gatherings
pub async fn create_gathering(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateGatheringRequest>,
) -> ApiResult<ApiResponse<GatheringResponse>> {
    let service = GatheringService::new(state.service_context());
    let response = service.create(auth.user_id, request).await?;
    Ok(ApiResponse::created("Gathering created", response))
}

/// List gatherings with filters
///
/// GET /gatherings
pub async fn list_gatherings(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<GatheringListQuery>,
) -> ApiResult<ApiResponse<PaginatedResponse<GatheringResponse>>> {
    let service = GatheringService::new(state.service_context());
    let response = service.list(params).await?;
    Ok(ApiResponse::ok("Gatherings", response))
}

/// Gathering detail with member counts and the viewer's standing
///
/// GET /gatherings/:gathering_id
pub async fn get_gathering(
    State(state): State<AppState>,
    OptionalAuthUser(auth): OptionalAuthUser,
    Path(path): Path<GatheringIdPath>,
) -> ApiResult<ApiResponse<GatheringDetailResponse>> {
    let gathering_id = path.gathering_id()?;
    let viewer = auth.map(|a| a.user_id);
    let service = GatheringService::new(state.service_context());
    let response = service.get_detail(gathering_id, viewer).await?;
    Ok(ApiResponse::ok("Gathering", response))
}

/// Update a gathering (owner only)
///
/// PATCH /gatherings/:gathering_id
pub async fn update_gathering(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<GatheringIdPath>,
    ValidatedJson(request): ValidatedJson<UpdateGatheringRequest>,
) -> ApiResult<ApiResponse<GatheringResponse>> {
    let gathering_id = path.gathering_id()?;
    let service = GatheringService::new(state.service_context());
    let response = service.update(gathering_id, auth.user_id, request).await?;
    Ok(ApiResponse::ok("Gathering updated", response))
}

/// Change gathering status (owner only)
///
/// POST /gatherings/:gathering_id/status
pub async fn update_gathering_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<GatheringIdPath>,
    Json(request): Json<UpdateGatheringStatusRequest>,
) -> ApiResult<ApiResponse<GatheringResponse>> {
    let gathering_id = path.gathering_id()?;
    let service = GatheringService::new(state.service_context());
    let response = service
        .update_status(gathering_id, auth.user_id, request)
        .await?;
    Ok(ApiResponse::ok("Status updated", response))
}

/// Delete a gathering (owner only, no approved members)
///
/// DELETE /gatherings/:gathering_id
pub async fn delete_gathering(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<GatheringIdPath>,
) -> ApiResult<ApiResponse<serde_json::Value>> {
    let gathering_id = path.gathering_id()?;
    let service = GatheringService::new(state.service_context());
    service.delete(gathering_id, auth.user_id).await?;
    Ok(ApiResponse::message("Gathering deleted"))
}

/// Seat and application statistics
///
/// GET /gatherings/:gathering_id/statistics
pub async fn gathering_statistics(
    State(state): State<AppState>,
    Path(path): Path<GatheringIdPath>,
) -> ApiResult<ApiResponse<GatheringStatsResponse>> {
    let gathering_id = path.gathering_id()?;
    let service = GatheringService::new(state.service_context());
    let response = service.statistics(gathering_id).await?;
    Ok(ApiResponse::ok("Statistics", response))
}
