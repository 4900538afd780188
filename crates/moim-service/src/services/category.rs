//! Category service
//!
//! Category reads are public; writes require the admin role. The tree is one
//! level deep: a category may have a parent only if that parent is a root.

use moim_core::entities::Category;
use moim_core::{Snowflake, UserRole};
use tracing::{info, instrument};

use crate::dto::{CategoryResponse, CreateCategoryRequest, UpdateCategoryRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Category service
pub struct CategoryService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CategoryService<'a> {
    /// Create a new CategoryService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// List categories; non-admin callers see active ones only
    #[instrument(skip(self))]
    pub async fn list(&self, include_inactive: bool) -> ServiceResult<Vec<CategoryResponse>> {
        let categories = self.ctx.category_repo().find_all(!include_inactive).await?;
        Ok(categories.iter().map(CategoryResponse::from).collect())
    }

    /// Get a category by ID
    #[instrument(skip(self))]
    pub async fn get(&self, category_id: Snowflake) -> ServiceResult<CategoryResponse> {
        let category = self.require_category(category_id).await?;
        Ok(CategoryResponse::from(&category))
    }

    /// Create a category (admin only)
    #[instrument(skip(self, request))]
    pub async fn create(
        &self,
        caller_role: UserRole,
        request: CreateCategoryRequest,
    ) -> ServiceResult<CategoryResponse> {
        require_admin(caller_role)?;

        let parent_id = parse_optional_id(request.parent_id.as_deref())?;
        if let Some(pid) = parent_id {
            let parent = self.require_category(pid).await?;
            if !parent.is_root() {
                return Err(ServiceError::Domain(
                    moim_core::DomainError::CategoryTooDeep,
                ));
            }
        }

        let mut category = Category::new(self.ctx.generate_id(), parent_id, request.name);
        category.set_description(request.description);

        self.ctx.category_repo().create(&category).await?;

        info!(category_id = %category.id, "Category created");

        Ok(CategoryResponse::from(&category))
    }

    /// Update a category (admin only)
    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        caller_role: UserRole,
        category_id: Snowflake,
        request: UpdateCategoryRequest,
    ) -> ServiceResult<CategoryResponse> {
        require_admin(caller_role)?;

        let mut category = self.require_category(category_id).await?;

        if let Some(name) = request.name {
            category.set_name(name);
        }
        if let Some(description) = request.description {
            category.set_description(Some(description));
        }
        if let Some(active) = request.is_active {
            category.set_active(active);
        }

        self.ctx.category_repo().update(&category).await?;

        info!(category_id = %category_id, "Category updated");

        Ok(CategoryResponse::from(&category))
    }

    /// Delete a category (admin only); referenced categories cannot go
    #[instrument(skip(self))]
    pub async fn delete(
        &self,
        caller_role: UserRole,
        category_id: Snowflake,
    ) -> ServiceResult<()> {
        require_admin(caller_role)?;

        self.require_category(category_id).await?;

        if self.ctx.category_repo().is_referenced(category_id).await? {
            return Err(ServiceError::Domain(moim_core::DomainError::CategoryInUse));
        }

        self.ctx.category_repo().delete(category_id).await?;

        info!(category_id = %category_id, "Category deleted");

        Ok(())
    }

    async fn require_category(&self, id: Snowflake) -> ServiceResult<Category> {
        self.ctx
            .category_repo()
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Category", id.to_string()))
    }
}

fn require_admin(role: UserRole) -> ServiceResult<()> {
    if role == UserRole::Admin {
        Ok(())
    } else {
        Err(ServiceError::Domain(moim_core::DomainError::AdminRequired))
    }
}

/// Parse an optional Snowflake string from a request
pub(crate) fn parse_optional_id(value: Option<&str>) -> ServiceResult<Option<Snowflake>> {
    match value {
        None => Ok(None),
        Some(s) => s
            .parse::<Snowflake>()
            .map(Some)
            .map_err(|_| ServiceError::validation(format!("Invalid ID: {s}"))),
    }
}

/// Parse a required Snowflake string from a request
pub(crate) fn parse_id(value: &str) -> ServiceResult<Snowflake> {
    value
        .parse::<Snowflake>()
        .map_err(|_| ServiceError::validation(format!("Invalid ID: {value}")))
}
