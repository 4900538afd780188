//! ChatMessage entity <-> model mapper

use moim_core::entities::ChatMessage;
use moim_core::Snowflake;

use crate::models::ChatMessageModel;

impl From<ChatMessageModel> for ChatMessage {
    fn from(model: ChatMessageModel) -> Self {
        ChatMessage {
            id: Snowflake::new(model.id),
            gathering_id: Snowflake::new(model.gathering_id),
            user_id: Snowflake::new(model.user_id),
            content: model.content,
            created_at: model.created_at,
        }
    }
}
