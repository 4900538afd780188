//! PostgreSQL implementation of QuestionRepository

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use moim_core::entities::Question;
use moim_core::traits::{QuestionQuery, QuestionRepository, QuestionSort, RepoResult};
use moim_core::value_objects::Snowflake;

use crate::models::QuestionModel;

use super::error::{map_db_error, question_not_found};

const QUESTION_COLUMNS: &str =
    "id, user_id, category_id, title, content, view_count, is_solved, created_at, updated_at";

/// PostgreSQL implementation of QuestionRepository
#[derive(Clone)]
pub struct PgQuestionRepository {
    pool: PgPool,
}

impl PgQuestionRepository {
    /// Create a new PgQuestionRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuestionRepository for PgQuestionRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Question>> {
        let result = sqlx::query_as::<_, QuestionModel>(&format!(
            "SELECT {QUESTION_COLUMNS} FROM questions WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Question::from))
    }

    #[instrument(skip(self))]
    async fn find_all(&self, query: &QuestionQuery) -> RepoResult<Vec<Question>> {
        let limit = query.limit.clamp(1, 100);

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {QUESTION_COLUMNS} FROM questions WHERE 1 = 1"
        ));

        if let Some(category_id) = query.category_id {
            builder
                .push(" AND category_id = ")
                .push_bind(category_id.into_inner());
        }
        if let Some(is_solved) = query.is_solved {
            builder.push(" AND is_solved = ").push_bind(is_solved);
        }
        if let Some(search) = query.search.as_deref() {
            let pattern = format!("%{search}%");
            builder
                .push(" AND (title ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR content ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if let Some(before) = query.before {
            builder.push(" AND id < ").push_bind(before.into_inner());
        }

        match query.sort {
            QuestionSort::Newest => builder.push(" ORDER BY id DESC"),
            QuestionSort::Views => builder.push(" ORDER BY view_count DESC, id DESC"),
        };
        builder.push(" LIMIT ").push_bind(limit);

        let models = builder
            .build_query_as::<QuestionModel>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(models.into_iter().map(Question::from).collect())
    }

    #[instrument(skip(self, question))]
    async fn create(&self, question: &Question) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO questions (
                id, user_id, category_id, title, content,
                view_count, is_solved, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(question.id.into_inner())
        .bind(question.user_id.into_inner())
        .bind(question.category_id.into_inner())
        .bind(&question.title)
        .bind(&question.content)
        .bind(question.view_count)
        .bind(question.is_solved)
        .bind(question.created_at)
        .bind(question.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, question))]
    async fn update(&self, question: &Question) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE questions
            SET category_id = $2, title = $3, content = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(question.id.into_inner())
        .bind(question.category_id.into_inner())
        .bind(&question.title)
        .bind(&question.content)
        .bind(question.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(question_not_found(question.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query("DELETE FROM answers WHERE question_id = $1")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        let result = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(question_not_found(id));
        }

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn increment_view_count(&self, id: Snowflake) -> RepoResult<()> {
        let result =
            sqlx::query("UPDATE questions SET view_count = view_count + 1 WHERE id = $1")
                .bind(id.into_inner())
                .execute(&self.pool)
                .await
                .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(question_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_solved(&self, id: Snowflake, solved: bool) -> RepoResult<()> {
        let result =
            sqlx::query("UPDATE questions SET is_solved = $2, updated_at = NOW() WHERE id = $1")
                .bind(id.into_inner())
                .bind(solved)
                .execute(&self.pool)
                .await
                .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(question_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn answer_count(&self, question_id: Snowflake) -> RepoResult<i64> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM answers WHERE question_id = $1")
                .bind(question_id.into_inner())
                .fetch_one(&self.pool)
                .await
                .map_err(map_db_error)?;

        Ok(count)
    }
}
