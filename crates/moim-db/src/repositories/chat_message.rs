//! PostgreSQL implementation of ChatMessageRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use moim_core::entities::ChatMessage;
use moim_core::traits::{ChatMessageRepository, MessageQuery, RepoResult};
use moim_core::value_objects::Snowflake;

use crate::models::ChatMessageModel;

use super::error::{map_db_error, message_not_found};

const MESSAGE_COLUMNS: &str = "id, gathering_id, user_id, content, created_at";

/// PostgreSQL implementation of ChatMessageRepository
#[derive(Clone)]
pub struct PgChatMessageRepository {
    pool: PgPool,
}

impl PgChatMessageRepository {
    /// Create a new PgChatMessageRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatMessageRepository for PgChatMessageRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<ChatMessage>> {
        let result = sqlx::query_as::<_, ChatMessageModel>(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM chat_messages WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(ChatMessage::from))
    }

    #[instrument(skip(self))]
    async fn find_by_gathering(
        &self,
        gathering_id: Snowflake,
        query: &MessageQuery,
    ) -> RepoResult<Vec<ChatMessage>> {
        let limit = query.limit.clamp(1, 100);

        let models = match query.before {
            Some(before) => {
                sqlx::query_as::<_, ChatMessageModel>(&format!(
                    "SELECT {MESSAGE_COLUMNS} FROM chat_messages \
                     WHERE gathering_id = $1 AND id < $2 \
                     ORDER BY id DESC LIMIT $3"
                ))
                .bind(gathering_id.into_inner())
                .bind(before.into_inner())
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, ChatMessageModel>(&format!(
                    "SELECT {MESSAGE_COLUMNS} FROM chat_messages \
                     WHERE gathering_id = $1 \
                     ORDER BY id DESC LIMIT $2"
                ))
                .bind(gathering_id.into_inner())
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(map_db_error)?;

        Ok(models.into_iter().map(ChatMessage::from).collect())
    }

    #[instrument(skip(self, message))]
    async fn create(&self, message: &ChatMessage) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO chat_messages (id, gathering_id, user_id, content, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(message.id.into_inner())
        .bind(message.gathering_id.into_inner())
        .bind(message.user_id.into_inner())
        .bind(&message.content)
        .bind(message.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM chat_messages WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(message_not_found(id));
        }

        Ok(())
    }
}
