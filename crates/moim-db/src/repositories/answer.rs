//! PostgreSQL implementation of AnswerRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use moim_core::entities::Answer;
use moim_core::traits::{AnswerRepository, RepoResult};
use moim_core::value_objects::Snowflake;

use crate::models::AnswerModel;

use super::error::{answer_not_found, map_db_error};

const ANSWER_COLUMNS: &str = "id, question_id, user_id, content, created_at, updated_at";

/// PostgreSQL implementation of AnswerRepository
#[derive(Clone)]
pub struct PgAnswerRepository {
    pool: PgPool,
}

impl PgAnswerRepository {
    /// Create a new PgAnswerRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnswerRepository for PgAnswerRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Answer>> {
        let result = sqlx::query_as::<_, AnswerModel>(&format!(
            "SELECT {ANSWER_COLUMNS} FROM answers WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Answer::from))
    }

    #[instrument(skip(self))]
    async fn find_by_question(&self, question_id: Snowflake) -> RepoResult<Vec<Answer>> {
        let models = sqlx::query_as::<_, AnswerModel>(&format!(
            "SELECT {ANSWER_COLUMNS} FROM answers WHERE question_id = $1 ORDER BY id"
        ))
        .bind(question_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(models.into_iter().map(Answer::from).collect())
    }

    #[instrument(skip(self, answer))]
    async fn create(&self, answer: &Answer) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO answers (id, question_id, user_id, content, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(answer.id.into_inner())
        .bind(answer.question_id.into_inner())
        .bind(answer.user_id.into_inner())
        .bind(&answer.content)
        .bind(answer.created_at)
        .bind(answer.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, answer))]
    async fn update(&self, answer: &Answer) -> RepoResult<()> {
        let result =
            sqlx::query("UPDATE answers SET content = $2, updated_at = $3 WHERE id = $1")
                .bind(answer.id.into_inner())
                .bind(&answer.content)
                .bind(answer.updated_at)
                .execute(&self.pool)
                .await
                .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(answer_not_found(answer.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM answers WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(answer_not_found(id));
        }

        Ok(())
    }
}
