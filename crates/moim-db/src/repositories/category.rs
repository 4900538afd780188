//! PostgreSQL implementation of CategoryRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use moim_core::entities::Category;
use moim_core::error::DomainError;
use moim_core::traits::{CategoryRepository, RepoResult};
use moim_core::value_objects::Snowflake;

use crate::models::CategoryModel;

use super::error::{category_not_found, map_db_error, map_unique_violation};

const CATEGORY_COLUMNS: &str =
    "id, parent_id, name, description, is_active, created_at, updated_at";

/// PostgreSQL implementation of CategoryRepository
#[derive(Clone)]
pub struct PgCategoryRepository {
    pool: PgPool,
}

impl PgCategoryRepository {
    /// Create a new PgCategoryRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Category>> {
        let result = sqlx::query_as::<_, CategoryModel>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Category::from))
    }

    #[instrument(skip(self))]
    async fn find_all(&self, active_only: bool) -> RepoResult<Vec<Category>> {
        let sql = if active_only {
            format!(
                "SELECT {CATEGORY_COLUMNS} FROM categories WHERE is_active = TRUE \
                 ORDER BY parent_id NULLS FIRST, name"
            )
        } else {
            format!(
                "SELECT {CATEGORY_COLUMNS} FROM categories \
                 ORDER BY parent_id NULLS FIRST, name"
            )
        };

        let models = sqlx::query_as::<_, CategoryModel>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(models.into_iter().map(Category::from).collect())
    }

    #[instrument(skip(self, category))]
    async fn create(&self, category: &Category) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO categories (id, parent_id, name, description, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(category.id.into_inner())
        .bind(category.parent_id.map(Snowflake::into_inner))
        .bind(&category.name)
        .bind(&category.description)
        .bind(category.is_active)
        .bind(category.created_at)
        .bind(category.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, || {
                DomainError::ValidationError("category name already exists".to_string())
            })
        })?;

        Ok(())
    }

    #[instrument(skip(self, category))]
    async fn update(&self, category: &Category) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE categories
            SET name = $2, description = $3, is_active = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(category.id.into_inner())
        .bind(&category.name)
        .bind(&category.description)
        .bind(category.is_active)
        .bind(category.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(category_not_found(category.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(category_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn is_referenced(&self, id: Snowflake) -> RepoResult<bool> {
        let referenced = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM gatherings WHERE category_id = $1)
                OR EXISTS(SELECT 1 FROM questions WHERE category_id = $1)
                OR EXISTS(SELECT 1 FROM categories WHERE parent_id = $1)
            "#,
        )
        .bind(id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(referenced)
    }
}
