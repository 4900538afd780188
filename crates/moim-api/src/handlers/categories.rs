//! Category handlers
//!
//! Two-level category tree; mutations are admin only.

use axum::extract::{Path, State};
use moim_service::{
    CategoryResponse, CategoryService, CreateCategoryRequest, UpdateCategoryRequest, UserService,
};
use serde::Deserialize;

use crate::extractors::{ApiQuery, AuthUser, CategoryIdPath, ValidatedJson};
use crate::response::{ApiResponse, ApiResult};
use crate::state::AppState;

/// Query parameters for the category list
#[derive(Debug, Default, Deserialize)]
pub struct CategoryListQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

/// List categories
///
/// GET /categories
pub async fn list_categories(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<CategoryListQuery>,
) -> ApiResult<ApiResponse<Vec<CategoryResponse>>> {
    let service = CategoryService::new(state.service_context());
    let response = service.list(params.include_inactive).await?;
    Ok(ApiResponse::ok("Categories", response))
}

/// Get a single category
///
/// GET /categories/:category_id
pub async fn get_category(
    State(state): State<AppState>,
    Path(path): Path<CategoryIdPath>,
) -> ApiResult<ApiResponse<CategoryResponse>> {
    let category_id = path.category_id()?;
    let service = CategoryService::new(state.service_context());
    let response = service.get(category_id).await?;
    Ok(ApiResponse::ok("Category", response))
}

/// Create a category (admin only)
///
/// POST /categories
pub async fn create_category(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateCategoryRequest>,
) -> ApiResult<ApiResponse<CategoryResponse>> {
    let role = UserService::new(state.service_context())
        .role_of(auth.user_id)
        .await?;
    let service = CategoryService::new(state.service_context());
    let response = service.create(role, request).await?;
    Ok(ApiResponse::created("Category created", response))
}

/// Update a category (admin only)
///
/// PATCH /categories/:category_id
pub async fn update_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<CategoryIdPath>,
    ValidatedJson(request): ValidatedJson<UpdateCategoryRequest>,
) -> ApiResult<ApiResponse<CategoryResponse>> {
    let category_id = path.category_id()?;
    let role = UserService::new(state.service_context())
        .role_of(auth.user_id)
        .await?;
    let service = CategoryService::new(state.service_context());
    let response = service.update(role, category_id, request).await?;
    Ok(ApiResponse::ok("Category updated", response))
}

/// Delete a category (admin only)
///
/// DELETE /categories/:category_id
pub async fn delete_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<CategoryIdPath>,
) -> ApiResult<ApiResponse<serde_json::Value>> {
    let category_id = path.category_id()?;
    let role = UserService::new(state.service_context())
        .role_of(auth.user_id)
        .await?;
    let service = CategoryService::new(state.service_context());
    service.delete(role, category_id).await?;
    Ok(ApiResponse::message("Category deleted"))
}
